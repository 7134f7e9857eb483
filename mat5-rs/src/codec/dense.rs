//! Dense numeric array payloads.
//!
//! The real part is one numeric element holding `rows * cols` values in
//! column-major order; a complex array follows it with a second element of
//! the same type for the imaginary part.

use std::io::{Read, Write};

use crate::codec::header::{ArrayClass, ArrayHeader};
use crate::codec::resolve_kind;
use crate::data_type::DataType;
use crate::element::Tag;
use crate::error::{Error, Result};
use crate::kind::ElementKind;
use crate::matrix::{column_major, DenseMatrix};

/// Write the value element(s) of a dense matrix.
pub fn write_dense<W: Write>(writer: &mut W, matrix: &DenseMatrix) -> Result<()> {
    let wire = matrix.kind().wire_type();
    write_values(writer, wire, column_major(matrix.real()))?;
    if let Some(im) = matrix.imag() {
        write_values(writer, wire, column_major(im))?;
    }
    Ok(())
}

/// Read the value element(s) of a dense matrix described by `header`.
///
/// # Errors
///
/// - [`Error::TypeMismatch`] if a real kind is requested for complex data
/// - [`Error::InvalidFormat`] if an element does not hold `rows * cols` values
pub fn read_dense<R: Read>(
    reader: &mut R,
    header: &ArrayHeader,
    requested: Option<ElementKind>,
) -> Result<DenseMatrix> {
    let kind = resolve_kind(header, header.class == ArrayClass::Double, requested)?;
    let count = header
        .rows
        .checked_mul(header.cols)
        .ok_or(Error::InvalidDimensions {
            rows: header.rows,
            cols: header.cols,
        })?;

    let re = read_plane(reader, count, "real")?;
    let im = if header.complex {
        Some(read_plane(reader, count, "imaginary")?)
    } else {
        None
    };

    DenseMatrix::from_column_major(header.rows, header.cols, kind, re, im)
}

fn read_plane<R: Read>(reader: &mut R, count: usize, part: &str) -> Result<Vec<f64>> {
    let tag = Tag::read(reader)?;
    let values = read_values(reader, &tag)?;
    if values.len() != count {
        return Err(Error::invalid_format(format!(
            "{} part holds {} values, expected {}",
            part,
            values.len(),
            count
        )));
    }
    Ok(values)
}

/// Write one numeric element of `wire` type, including its padding.
pub(crate) fn write_values<W, I>(writer: &mut W, wire: DataType, values: I) -> Result<()>
where
    W: Write,
    I: ExactSizeIterator<Item = f64>,
{
    let tag = Tag::write(writer, wire, values.len() * wire.size_bytes())?;
    for value in values {
        wire.write_f64(writer, value)?;
    }
    tag.write_padding(writer)
}

/// Read every value of the numeric element introduced by `tag`, then its padding.
///
/// Any numeric on-wire type is accepted and widened to `f64`.
pub(crate) fn read_values<R: Read>(reader: &mut R, tag: &Tag) -> Result<Vec<f64>> {
    let wire = tag.require_type()?;
    if !wire.is_numeric() {
        return Err(Error::invalid_format(format!(
            "expected numeric data, found {} element",
            wire
        )));
    }
    let length = tag.length as usize;
    if length % wire.size_bytes() != 0 {
        return Err(Error::invalid_format(format!(
            "{} element of {} bytes is not a whole number of values",
            wire, length
        )));
    }

    let count = length / wire.size_bytes();
    let mut values = Vec::with_capacity(count.min(1 << 17));
    for _ in 0..count {
        values.push(wire.read_f64(reader)?);
    }
    tag.skip_padding(reader)?;
    Ok(values)
}
