//! Error types for MAT-file operations.
//!
//! This module provides the [`Error`] enum covering every failure mode of
//! the codec, along with a convenient [`Result`] type alias. All errors are
//! terminal for the parse or format call that raised them.

use std::io;
use thiserror::Error;

/// Result type alias for MAT-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing MAT-files.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying stream, including truncated input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The endian indicator of the file header is not the little-endian marker.
    #[error("Unsupported endianness: indicator bytes {found:02X?} (only little-endian 'IM' files are supported)")]
    UnsupportedEndianness {
        /// The two indicator bytes found at offset 126.
        found: [u8; 2],
    },

    /// The header carries a version other than `0x0100`.
    #[error("Unsupported MAT-file version 0x{version:04X}")]
    UnsupportedVersion {
        /// Version field found at offset 124.
        version: u16,
    },

    /// The array declares a dimension count other than two.
    #[error("Unsupported dimensionality: {dims} dimensions (only 2-D arrays are supported)")]
    UnsupportedDimensionality {
        /// Number of declared dimensions.
        dims: usize,
    },

    /// The array class is not dense double, dense single or sparse.
    #[error("Unsupported array class: {class}")]
    UnsupportedArrayClass {
        /// Human-readable class name.
        class: String,
    },

    /// A top-level or inner element has a type this codec does not handle.
    #[error("Unsupported element type {code}")]
    UnsupportedElementType {
        /// Raw type code from the element tag.
        code: u32,
    },

    /// The requested element kind conflicts with how the matrix is stored.
    #[error("Type mismatch for '{name}': {reason}")]
    TypeMismatch {
        /// Matrix name.
        name: String,
        /// What went wrong.
        reason: &'static str,
    },

    /// Sparse index arrays are inconsistent with each other or the header.
    #[error("Malformed sparse layout: {reason}")]
    MalformedSparseLayout {
        /// Description of the inconsistency.
        reason: String,
    },

    /// The Adler-32 trailer of a compressed element does not match its content.
    #[error("Checksum mismatch: trailer 0x{expected:08X}, computed 0x{computed:08X}")]
    ChecksumMismatch {
        /// Value stored in the trailer.
        expected: u32,
        /// Value computed over the decompressed bytes.
        computed: u32,
    },

    /// A requested matrix name is absent from the file.
    #[error("Matrix '{name}' not found")]
    NameNotFound {
        /// The missing name.
        name: String,
    },

    /// A matrix name cannot be written to a MAT-file.
    #[error("Invalid matrix name: '{name}' (must be non-empty ASCII without spaces)")]
    InvalidMatrixName {
        /// The rejected name.
        name: String,
    },

    /// Any other structural violation of the file format.
    #[error("Invalid MAT-file format: {reason}")]
    InvalidFormat {
        /// Description of the format error.
        reason: String,
    },

    /// Matrix dimensions do not match the supplied data, or exceed the format limits.
    #[error("Invalid matrix dimensions: {rows}x{cols}")]
    InvalidDimensions {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A cell index lies outside the matrix.
    #[error("Index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
}

impl Error {
    /// Create an InvalidFormat error with the given reason.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormat { reason: reason.into() }
    }

    /// Create a MalformedSparseLayout error with the given reason.
    pub fn malformed_sparse(reason: impl Into<String>) -> Self {
        Self::MalformedSparseLayout { reason: reason.into() }
    }

    /// Create an UnsupportedArrayClass error.
    pub fn unsupported_class(class: impl Into<String>) -> Self {
        Self::UnsupportedArrayClass { class: class.into() }
    }

    /// Create a TypeMismatch error.
    pub fn type_mismatch(name: impl Into<String>, reason: &'static str) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            reason,
        }
    }

    /// Create a NameNotFound error.
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::NameNotFound { name: name.into() }
    }

    /// Create an InvalidMatrixName error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidMatrixName { name: name.into() }
    }

    /// Whether this error was caused by the input ending early.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
