//! List matrices command (--list mode).

use anyhow::{Context, Result};
use colored::Colorize;

use mat5_rs::MatFile;

use crate::cli::Args;
use crate::output;

/// Run the list command.
pub fn run(args: &Args) -> Result<()> {
    output::print_verbose(
        &format!("Opening MAT-file: {}", args.input.display()),
        args.verbose,
    );

    let mat = MatFile::open_with(&args.input, &args.parse_options())
        .with_context(|| format!("Failed to read MAT-file: {}", args.input.display()))?;

    output::print_verbose(&format!("Header: {}", mat.header_text()), args.verbose);

    if mat.is_empty() {
        output::print_warning("No matrices found in MAT-file");
        return Ok(());
    }

    // Print header
    println!("{}", format!("Matrices in '{}':", args.input.display()).bold());
    println!();

    // Calculate column widths
    let max_name = mat.names().map(str::len).max().unwrap_or(4).max(4);

    // Print header row
    println!(
        "  {:<width$}  {:>12}  {:<7}  {:<14}  {:>10}",
        "Name", "Shape", "Storage", "Kind", "Non-zeros",
        width = max_name
    );
    println!(
        "  {:-<width$}  {:->12}  {:-<7}  {:-<14}  {:->10}",
        "", "", "", "", "",
        width = max_name
    );

    for (name, matrix) in &mat {
        // Pad before colorizing so escape codes don't eat the column width.
        let storage = format!("{:<7}", matrix.storage());
        let storage = if matrix.is_sparse() {
            storage.cyan().to_string()
        } else {
            storage
        };
        let marker = if mat.first_name() == Some(name.as_str()) {
            " (first)".dimmed().to_string()
        } else {
            String::new()
        };

        println!(
            "  {:<width$}  {:>12}  {}  {:<14}  {:>10}{}",
            name,
            output::format_shape(matrix),
            storage,
            matrix.kind().to_string(),
            output::format_number(matrix.nnz()),
            marker,
            width = max_name
        );
    }

    // Print summary
    println!();
    output::print_info(&format!("{} matrices found", mat.len()), args.quiet);

    Ok(())
}
