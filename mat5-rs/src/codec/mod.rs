//! Matrix element codecs.
//!
//! A matrix element payload is an [`ArrayHeader`] followed by either a
//! dense payload ([`dense`]) or a sparse payload ([`sparse`]).
//! [`compression`] wraps whole elements for storage at the top level.

pub mod compression;
pub mod dense;
pub mod header;
pub mod sparse;

use std::io::Read;

pub use header::{ArrayClass, ArrayHeader};

use crate::error::{Error, Result};
use crate::kind::ElementKind;
use crate::matrix::Matrix;

/// Check that `name` can be stored as a MAT-file variable name.
///
/// # Errors
///
/// Returns [`Error::InvalidMatrixName`] for empty names, names containing
/// a space and non-ASCII names.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(' ') || !name.is_ascii() {
        return Err(Error::invalid_name(name));
    }
    Ok(())
}

/// Serialize everything that follows the matrix element tag.
pub fn encode_matrix(name: &str, matrix: &Matrix) -> Result<Vec<u8>> {
    validate_name(name)?;

    let (class, nzmax) = match matrix {
        Matrix::Dense(m) if m.kind().is_double() => (ArrayClass::Double, 0),
        Matrix::Dense(_) => (ArrayClass::Single, 0),
        Matrix::Sparse(m) => {
            let nzmax = u32::try_from(m.nnz())
                .map_err(|_| Error::invalid_format("too many non-zeros for a sparse array"))?;
            (ArrayClass::Sparse, nzmax)
        }
    };
    let header = ArrayHeader {
        class,
        complex: matrix.is_complex(),
        nzmax,
        rows: matrix.rows(),
        cols: matrix.cols(),
        name: name.to_string(),
    };

    let mut out = Vec::new();
    header.write(&mut out)?;
    match matrix {
        Matrix::Dense(m) => dense::write_dense(&mut out, m)?,
        Matrix::Sparse(m) => sparse::write_sparse(&mut out, m)?,
    }
    Ok(out)
}

/// Decode the payload that follows an already-read `header`.
pub fn decode_matrix<R: Read>(
    reader: &mut R,
    header: &ArrayHeader,
    requested: Option<ElementKind>,
) -> Result<Matrix> {
    match header.class {
        ArrayClass::Sparse => sparse::read_sparse(reader, header, requested).map(Matrix::Sparse),
        ArrayClass::Double | ArrayClass::Single => {
            dense::read_dense(reader, header, requested).map(Matrix::Dense)
        }
        other => Err(Error::unsupported_class(other.to_string())),
    }
}

/// Choose the element kind of a decoded matrix.
///
/// Without a request the stored kind is used. A complex request for real
/// data is honoured with a zero imaginary part; the reverse is an error.
pub(crate) fn resolve_kind(
    header: &ArrayHeader,
    stored_double: bool,
    requested: Option<ElementKind>,
) -> Result<ElementKind> {
    match requested {
        Some(kind) if header.complex && !kind.is_complex() => Err(Error::type_mismatch(
            header.name.as_str(),
            "real type requested for complex-stored matrix",
        )),
        Some(kind) => Ok(kind),
        None => Ok(ElementKind::new(header.complex, stored_double)),
    }
}
