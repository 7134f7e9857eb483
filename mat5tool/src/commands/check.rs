//! Integrity check command (--check mode).

use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use mat5_rs::MatFile;

use crate::cli::Args;
use crate::output;

/// Run the check command.
///
/// Checksums are always verified here, whatever `--no-verify` says.
pub fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let options = args.parse_options().verify_checksum(true);

    let size = std::fs::metadata(&args.input)
        .with_context(|| format!("Failed to stat {}", args.input.display()))?
        .len();

    if !args.quiet {
        output::print_header("MAT-file Check");
        println!();
        output::print_kv("File", &args.input.display().to_string(), 2);
        output::print_kv("Size", &output::format_size(size), 2);
    }

    let mat = match MatFile::open_with(&args.input, &options) {
        Ok(mat) => mat,
        Err(e) => {
            if !args.quiet {
                println!();
                println!("  {} {}", "✗".red(), e);
            }
            return Err(e).with_context(|| format!("Check failed: {}", args.input.display()));
        }
    };

    if !args.quiet {
        output::print_kv("Header", mat.header_text(), 2);
        output::print_header("Matrices");
        println!();
        for (name, matrix) in &mat {
            println!(
                "  {} {} ({} {} {})",
                "✓".green(),
                name,
                output::format_shape(matrix),
                matrix.storage(),
                matrix.kind()
            );
        }
        if mat.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        println!();
    }

    output::print_success(
        &format!(
            "{} matrices decoded in {}",
            mat.len(),
            output::format_duration(start_time.elapsed().as_secs_f64())
        ),
        args.quiet,
    );
    Ok(())
}
