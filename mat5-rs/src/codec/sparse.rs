//! Sparse array payloads.
//!
//! MAT-files store sparse arrays column-compressed:
//!
//! ```text
//! | int32 ir[nzmax]    | row index of each stored value         |
//! | int32 jc[cols + 1] | start of each column in ir, jc[cols] = nnz |
//! | pr[nnz]            | real values                            |
//! | pi[nnz]            | imaginary values (complex only)        |
//! ```
//!
//! [`SparseMatrix`] is row-compressed, so writing transposes first and
//! reading transposes back: the CSR arrays of `Aᵀ` are the CSC arrays of `A`.

use std::io::{Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::codec::dense::{read_values, write_values};
use crate::codec::header::ArrayHeader;
use crate::codec::resolve_kind;
use crate::data_type::DataType;
use crate::element::Tag;
use crate::error::{Error, Result};
use crate::kind::ElementKind;
use crate::matrix::SparseMatrix;

/// Write the index and value elements of a sparse matrix.
pub fn write_sparse<W: Write>(writer: &mut W, matrix: &SparseMatrix) -> Result<()> {
    let csc = matrix.transpose();

    write_indices(writer, csc.column_indices())?;
    write_indices(writer, csc.row_pointers())?;

    let wire = matrix.kind().wire_type();
    write_values(writer, wire, csc.real_values().iter().copied())?;
    if let Some(im) = csc.imag_values() {
        write_values(writer, wire, im.iter().copied())?;
    }
    Ok(())
}

/// Largest row count a sparse matrix may declare.
///
/// Row-compressed storage costs one pointer per row regardless of how many
/// values are stored, so the header alone decides the allocation.
pub const MAX_SPARSE_ROWS: usize = 1 << 26;

/// Read the index and value elements of the sparse matrix described by `header`.
///
/// Memory use is proportional to `header.rows` plus the number of stored
/// values, even for a matrix with a single non-zero.
///
/// # Errors
///
/// - [`Error::InvalidDimensions`] if the header declares more than
///   [`MAX_SPARSE_ROWS`] rows
/// - [`Error::MalformedSparseLayout`] if the index arrays are inconsistent
/// - [`Error::TypeMismatch`] if a real kind is requested for complex data
pub fn read_sparse<R: Read>(
    reader: &mut R,
    header: &ArrayHeader,
    requested: Option<ElementKind>,
) -> Result<SparseMatrix> {
    let (rows, cols) = (header.rows, header.cols);
    if rows > MAX_SPARSE_ROWS {
        return Err(Error::InvalidDimensions { rows, cols });
    }

    let tag = Tag::read(reader)?;
    let mut row_indices = read_indices(reader, &tag)?;

    let tag = Tag::read(reader)?;
    if tag.length as usize / 4 != cols + 1 {
        return Err(Error::malformed_sparse(format!(
            "column-pointer element holds {} bytes, expected {} entries",
            tag.length,
            cols + 1
        )));
    }
    let col_ptr = read_indices(reader, &tag)?;
    if col_ptr.len() != cols + 1 {
        return Err(Error::malformed_sparse(format!(
            "{} column pointers for {} columns",
            col_ptr.len(),
            cols
        )));
    }
    let nnz = col_ptr[cols];
    if nnz > row_indices.len() {
        return Err(Error::malformed_sparse(format!(
            "{} non-zeros but only {} row indices",
            nnz,
            row_indices.len()
        )));
    }
    row_indices.truncate(nnz);

    let tag = Tag::read(reader)?;
    let stored_double = tag.data_type() != Some(DataType::Single);
    let kind = resolve_kind(header, stored_double, requested)?;
    let re = read_nonzeros(reader, &tag, nnz)?;

    let im = if header.complex {
        let tag = Tag::read(reader)?;
        let values = read_nonzeros(reader, &tag, nnz)?;
        let mut im = vec![0.0; nnz];
        for (dst, v) in im.iter_mut().zip(values) {
            *dst += v;
        }
        Some(im)
    } else {
        None
    };

    let transposed = SparseMatrix::from_csr_parts(cols, rows, kind, col_ptr, row_indices, re, im)?;
    Ok(transposed.transpose())
}

fn read_nonzeros<R: Read>(reader: &mut R, tag: &Tag, nnz: usize) -> Result<Vec<f64>> {
    let mut values = read_values(reader, tag)?;
    if values.len() < nnz {
        return Err(Error::malformed_sparse(format!(
            "{} non-zeros but only {} values",
            nnz,
            values.len()
        )));
    }
    values.truncate(nnz);
    Ok(values)
}

fn write_indices<W: Write>(writer: &mut W, indices: &[usize]) -> Result<()> {
    let tag = Tag::write(writer, DataType::Int32, indices.len() * 4)?;
    for &index in indices {
        let index = i32::try_from(index)
            .map_err(|_| Error::invalid_format(format!("sparse index {} exceeds int32", index)))?;
        writer.write_i32::<LittleEndian>(index)?;
    }
    tag.write_padding(writer)
}

fn read_indices<R: Read>(reader: &mut R, tag: &Tag) -> Result<Vec<usize>> {
    read_values(reader, tag)?
        .into_iter()
        .map(|v| {
            if v >= 0.0 && v.fract() == 0.0 {
                Ok(v as usize)
            } else {
                Err(Error::malformed_sparse(format!("invalid index {}", v)))
            }
        })
        .collect()
}
