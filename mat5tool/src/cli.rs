//! Command-line argument definitions using clap derive macros.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use mat5_rs::{ElementKind, MatWriter, ParseOptions};

/// Inspect, check and rewrite MATLAB Level-5 MAT-files.
///
/// mat5tool reads dense and sparse numeric matrices (double or single,
/// real or complex) from little-endian MAT-files, and writes them back
/// compressed or uncompressed.
#[derive(Parser, Debug)]
#[command(name = "mat5tool")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Args {
    /// Input .mat file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output .mat file (omit for --list and --check)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    // ========================================================================
    // Mode Selection
    // ========================================================================
    /// List matrices in the MAT-file and exit
    #[arg(short, long)]
    pub list: bool,

    /// Decode every element, verifying checksums, and report the result
    #[arg(short, long)]
    pub check: bool,

    // ========================================================================
    // Matrix Selection
    // ========================================================================
    /// Only read these matrices (comma-separated)
    ///
    /// Other matrices are skipped without decoding their data.
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub names: Option<Vec<String>>,

    /// Decode every matrix into this element kind
    ///
    /// A real kind cannot be requested for complex matrices.
    #[arg(short, long, value_enum, value_name = "KIND")]
    pub kind: Option<KindArg>,

    // ========================================================================
    // Parsing
    // ========================================================================
    /// Skip top-level elements of unsupported types instead of failing
    #[arg(long)]
    pub lenient: bool,

    /// Do not verify the checksum of compressed elements
    #[arg(long)]
    pub no_verify: bool,

    // ========================================================================
    // Writing
    // ========================================================================
    /// Write plain matrix elements instead of compressed ones
    #[arg(short, long)]
    pub uncompressed: bool,

    // ========================================================================
    // Output Control
    // ========================================================================
    /// Show detailed progress and information
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Force overwrite of existing output file
    #[arg(long)]
    pub force: bool,
}

/// Element kind to decode matrices into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Real, double precision
    Double,
    /// Real, single precision
    Single,
    /// Complex, double precision
    ComplexDouble,
    /// Complex, single precision
    ComplexSingle,
}

impl From<KindArg> for ElementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Double => ElementKind::Real64,
            KindArg::Single => ElementKind::Real32,
            KindArg::ComplexDouble => ElementKind::Complex64,
            KindArg::ComplexSingle => ElementKind::Complex32,
        }
    }
}

impl Args {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), String> {
        if self.list && self.check {
            return Err("Cannot use both --list and --check".to_string());
        }

        // Quiet and verbose are mutually exclusive
        if self.quiet && self.verbose {
            return Err("Cannot use both --quiet and --verbose".to_string());
        }

        if let Some(ref names) = self.names {
            if names.iter().any(|n| n.trim().is_empty()) {
                return Err("Empty name in --names".to_string());
            }
        }

        // Check input file exists
        if !self.input.exists() {
            return Err(format!("Input file not found: {}", self.input.display()));
        }

        // List and check modes don't need an output file
        if self.list || self.check {
            return Ok(());
        }

        let Some(ref output) = self.output else {
            return Err("Output file is required (or use --list or --check)".to_string());
        };

        if output == &self.input {
            return Err("Output file must differ from input file".to_string());
        }

        // Check output doesn't exist (unless --force)
        if output.exists() && !self.force {
            return Err(format!(
                "Output file already exists: {} (use --force to overwrite)",
                output.display()
            ));
        }

        Ok(())
    }

    /// Parse options selected on the command line.
    pub fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new()
            .verify_checksum(!self.no_verify)
            .skip_unknown_elements(self.lenient);
        if let Some(ref names) = self.names {
            options = options.names(names.iter().map(|n| n.trim().to_string()));
        }
        if let Some(kind) = self.kind {
            options = options.kind(kind.into());
        }
        options
    }

    /// Writer configured from the command line.
    pub fn writer(&self) -> MatWriter {
        MatWriter::new().compress(!self.uncompressed)
    }
}

/// Example usage shown in --help.
const EXAMPLES: &str = r#"
EXAMPLES:
    # List matrices in a MAT-file
    mat5tool --list model.mat

    # Verify every element decodes and every checksum matches
    mat5tool --check model.mat

    # Copy two matrices into a new file
    mat5tool model.mat subset.mat --names W,b

    # Rewrite without compression, overwriting the output
    mat5tool --uncompressed --force model.mat plain.mat

    # Convert everything to single precision
    mat5tool --kind single model.mat small.mat

    # Read a file with unsupported elements and a bad checksum
    mat5tool --lenient --no-verify --list damaged.mat
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str, output: Option<&str>) -> Args {
        Args {
            input: PathBuf::from(input),
            output: output.map(PathBuf::from),
            list: false,
            check: false,
            names: None,
            kind: None,
            lenient: false,
            no_verify: false,
            uncompressed: false,
            verbose: false,
            quiet: false,
            force: false,
        }
    }

    #[test]
    fn test_parse_options_defaults() {
        let options = args("in.mat", Some("out.mat")).parse_options();
        assert!(options.verify_checksum);
        assert!(!options.skip_unknown_elements);
        assert!(options.names.is_none());
        assert!(options.kind.is_none());
    }

    #[test]
    fn test_parse_options_from_flags() {
        let mut a = args("in.mat", Some("out.mat"));
        a.names = Some(vec!["A".to_string(), " B".to_string()]);
        a.kind = Some(KindArg::ComplexSingle);
        a.lenient = true;
        a.no_verify = true;

        let options = a.parse_options();
        assert!(options.wants("A"));
        assert!(options.wants("B"));
        assert!(!options.wants("C"));
        assert_eq!(options.kind, Some(ElementKind::Complex32));
        assert!(options.skip_unknown_elements);
        assert!(!options.verify_checksum);
    }

    #[test]
    fn test_writer_compression() {
        let mut a = args("in.mat", Some("out.mat"));
        assert!(a.writer().compress);
        a.uncompressed = true;
        assert!(!a.writer().compress);
    }

    #[test]
    fn test_conflicting_modes() {
        let mut a = args("in.mat", None);
        a.list = true;
        a.check = true;
        assert!(a.validate().unwrap_err().contains("--list and --check"));
    }

    #[test]
    fn test_parse_names_list() {
        let a = Args::try_parse_from(["mat5tool", "in.mat", "out.mat", "--names", "x,y,z"]).unwrap();
        assert_eq!(a.names.unwrap(), vec!["x", "y", "z"]);
    }
}
