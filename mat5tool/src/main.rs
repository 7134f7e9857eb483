//! mat5tool - Inspect, check and rewrite MATLAB Level-5 MAT-files.
//!
//! Lists the numeric matrices a MAT-file holds, verifies that every element
//! decodes cleanly, or rewrites (a subset of) the file.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::Args;

fn main() {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(&args);

    // Run the appropriate command
    if let Err(e) = run(args) {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Route library logging to stderr. `RUST_LOG` takes precedence.
fn init_logging(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Main dispatch function.
fn run(args: Args) -> Result<()> {
    // Validate arguments
    args.validate().map_err(|e| anyhow::anyhow!("{}", e))?;

    // Dispatch to appropriate command
    if args.list {
        commands::list::run(&args)
    } else if args.check {
        commands::check::run(&args)
    } else {
        commands::convert::run(&args)
    }
}
