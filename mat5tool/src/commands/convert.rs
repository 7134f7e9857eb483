//! Rewrite command (default mode).

use std::time::Instant;

use anyhow::{bail, Context, Result};

use mat5_rs::MatFile;

use crate::cli::Args;
use crate::output;

/// Run the convert command.
pub fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let Some(output_path) = args.output.as_ref() else {
        bail!("Output file is required");
    };

    output::print_verbose(
        &format!("Opening MAT-file: {}", args.input.display()),
        args.verbose,
    );

    let mat = MatFile::open_with(&args.input, &args.parse_options())
        .with_context(|| format!("Failed to read MAT-file: {}", args.input.display()))?;

    if let Some(ref names) = args.names {
        let missing: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| mat.get(n).is_none())
            .collect();
        if !missing.is_empty() {
            bail!("Matrices not found in input: {}", missing.join(", "));
        }
    }

    if mat.is_empty() {
        output::print_warning("No matrices to write; output will hold only a header");
    }

    for (name, matrix) in &mat {
        output::print_verbose(
            &format!(
                "{}: {} {} {}",
                name,
                output::format_shape(matrix),
                matrix.storage(),
                matrix.kind()
            ),
            args.verbose,
        );
    }

    args.writer()
        .save(output_path, &mat)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    if !args.quiet {
        print_summary(args, &mat, start_time.elapsed().as_secs_f64())?;
    }

    Ok(())
}

fn print_summary(args: &Args, mat: &MatFile, elapsed: f64) -> Result<()> {
    let Some(output_path) = args.output.as_ref() else {
        return Ok(());
    };
    let input_size = std::fs::metadata(&args.input)?.len();
    let output_size = std::fs::metadata(output_path)?.len();

    output::print_success(
        &format!(
            "Wrote {} matrices to {}",
            mat.len(),
            output_path.display()
        ),
        args.quiet,
    );
    println!();
    output::print_kv("Input size", &output::format_size(input_size), 2);
    output::print_kv("Output size", &output::format_size(output_size), 2);
    output::print_kv(
        "Compression",
        if args.uncompressed { "none" } else { "zlib" },
        2,
    );
    output::print_kv("Time", &output::format_duration(elapsed), 2);
    Ok(())
}
