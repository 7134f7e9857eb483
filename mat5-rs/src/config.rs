//! Parse configuration.
//!
//! [`ParseOptions`] is passed explicitly to every parse, so a parse never
//! depends on state left behind by an earlier one.

use std::collections::BTreeSet;

use crate::kind::ElementKind;

/// Options controlling how a MAT-file is parsed.
///
/// # Example
///
/// ```
/// use mat5_rs::ParseOptions;
///
/// let options = ParseOptions::new()
///     .names(["weights", "bias"])
///     .verify_checksum(false);
///
/// assert!(options.wants("bias"));
/// assert!(!options.wants("other"));
/// ```
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Only decode matrices with these names (None = all).
    pub names: Option<BTreeSet<String>>,

    /// Check the Adler-32 trailer of compressed elements.
    pub verify_checksum: bool,

    /// Skip top-level elements of unsupported types instead of failing.
    pub skip_unknown_elements: bool,

    /// Element kind to decode every matrix into (None = as stored).
    pub kind: Option<ElementKind>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            names: None,
            verify_checksum: true,
            skip_unknown_elements: false,
            kind: None,
        }
    }
}

impl ParseOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict decoding to the given matrix names.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable checksum verification.
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    /// Skip unsupported top-level elements instead of failing.
    pub fn skip_unknown_elements(mut self, skip: bool) -> Self {
        self.skip_unknown_elements = skip;
        self
    }

    /// Decode every matrix into this element kind.
    pub fn kind(mut self, kind: ElementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Whether a matrix with this name should be decoded.
    pub fn wants(&self, name: &str) -> bool {
        self.names.as_ref().map_or(true, |names| names.contains(name))
    }
}
