//! # mat5-rs
//!
//! Reading and writing MATLAB Level-5 MAT-files holding two-dimensional
//! numeric matrices.
//!
//! Dense and sparse matrices are supported in four element kinds: real or
//! complex, double or single precision. Files are little-endian, and
//! matrices are written as zlib-compressed elements by default.
//!
//! ## Quick Start
//!
//! ### Writing
//!
//! ```
//! use mat5_rs::{write_mat, Matrix, SparseMatrix};
//! use ndarray::array;
//!
//! let dense: Matrix = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into();
//! let sparse: Matrix = SparseMatrix::from_real_triplets(3, 3, [(0, 0, 1.0), (2, 1, -4.0)])?.into();
//!
//! let mut bytes = Vec::new();
//! write_mat(&mut bytes, [("D", &dense), ("S", &sparse)])?;
//! # Ok::<(), mat5_rs::Error>(())
//! ```
//!
//! ### Reading
//!
//! ```
//! use mat5_rs::{write_mat, MatFile, Matrix, ParseOptions};
//! use ndarray::array;
//! # let m: Matrix = array![[1.0]].into();
//! # let mut bytes = Vec::new();
//! # write_mat(&mut bytes, [("D", &m), ("S", &m)])?;
//!
//! // Everything in the file
//! let file = MatFile::parse(&bytes[..])?;
//! for (name, matrix) in &file {
//!     println!("{}: {}x{} {}", name, matrix.rows(), matrix.cols(), matrix.kind());
//! }
//!
//! // Only the matrices asked for
//! let file = MatFile::parse_with(&bytes[..], &ParseOptions::new().names(["S"]))?;
//! assert_eq!(file.len(), 1);
//! # Ok::<(), mat5_rs::Error>(())
//! ```
//!
//! ## Supported Array Classes
//!
//! | Class | Code | Storage |
//! |-------|------|---------|
//! | double | 6 | [`DenseMatrix`] |
//! | single | 7 | [`DenseMatrix`] |
//! | sparse | 5 | [`SparseMatrix`] |
//!
//! Cell, struct, object, char, integer, function and opaque arrays are
//! rejected with [`Error::UnsupportedArrayClass`]. On-wire values of any
//! numeric type are accepted and converted to `f64`.

#![deny(missing_docs)]

// Modules
pub mod checksum;
pub mod codec;
mod config;
mod data_type;
pub mod element;
mod error;
mod file;
pub mod file_header;
mod kind;
mod matrix;
mod writer;

// Public exports
pub use codec::ArrayClass;
pub use config::ParseOptions;
pub use data_type::DataType;
pub use error::{Error, Result};
pub use file::{read_matrix, MatFile};
pub use kind::ElementKind;
pub use matrix::{DenseMatrix, Matrix, SparseMatrix};
pub use writer::{write_mat, MatWriter};

pub use ndarray;
pub use num_complex;
