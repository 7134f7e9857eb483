//! MAT-file formatter.
//!
//! [`MatWriter`] writes the 128-byte header followed by one top-level
//! element per matrix. By default every element is compressed; with
//! [`MatWriter::compress`] set to `false` plain matrix elements are written
//! instead (the layout MATLAB uses for `-v6`).
//!
//! # Example
//!
//! ```
//! use mat5_rs::{MatFile, MatWriter, Matrix};
//! use ndarray::array;
//!
//! let a: Matrix = array![[1.0, 2.0], [3.0, 4.0]].into();
//!
//! let mut bytes = Vec::new();
//! MatWriter::new()
//!     .header_text("example")
//!     .write(&mut bytes, [("A", &a)])?;
//!
//! let file = MatFile::parse(&bytes[..])?;
//! assert_eq!(file.require("A")?, &a);
//! # Ok::<(), mat5_rs::Error>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::{compression, encode_matrix, validate_name};
use crate::data_type::DataType;
use crate::element::Tag;
use crate::error::Result;
use crate::file_header::FileHeader;
use crate::matrix::Matrix;

/// Builder-style formatter for MAT-files.
#[derive(Debug, Clone)]
pub struct MatWriter {
    /// Wrap each matrix in a compressed element.
    pub compress: bool,

    /// Header text (None = timestamped default).
    pub header_text: Option<String>,
}

impl Default for MatWriter {
    fn default() -> Self {
        MatWriter {
            compress: true,
            header_text: None,
        }
    }
}

impl MatWriter {
    /// Create a writer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable compression of top-level elements.
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Replace the default header text.
    pub fn header_text(mut self, text: impl Into<String>) -> Self {
        self.header_text = Some(text.into());
        self
    }

    /// Write a complete MAT-file holding `matrices`, in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatrixName`](crate::Error::InvalidMatrixName)
    /// before anything is written if any name is unusable, or
    /// [`Error::Io`](crate::Error::Io) if the writer fails.
    pub fn write<'a, W, I, N>(&self, writer: &mut W, matrices: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = (N, &'a Matrix)>,
        N: AsRef<str>,
    {
        let matrices: Vec<(N, &Matrix)> = matrices.into_iter().collect();
        for (name, _) in &matrices {
            validate_name(name.as_ref())?;
        }

        let text = self
            .header_text
            .clone()
            .unwrap_or_else(FileHeader::default_text);
        FileHeader::new(text).write(writer)?;

        for (name, matrix) in &matrices {
            self.write_element(writer, name.as_ref(), matrix)?;
        }
        log::debug!(
            "wrote {} matrices ({})",
            matrices.len(),
            if self.compress { "compressed" } else { "uncompressed" }
        );
        Ok(())
    }

    /// Create (or truncate) a file at `path` and write `matrices` to it.
    pub fn save<'a, P, I, N>(&self, path: P, matrices: I) -> Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (N, &'a Matrix)>,
        N: AsRef<str>,
    {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write(&mut writer, matrices)?;
        writer.flush()?;
        Ok(())
    }

    fn write_element<W: Write>(&self, writer: &mut W, name: &str, matrix: &Matrix) -> Result<()> {
        let payload = encode_matrix(name, matrix)?;

        if self.compress {
            let body = compression::compress(DataType::Matrix.code(), &payload)?;
            Tag::write_long(writer, DataType::Compressed, body.len())?;
            writer.write_all(&body)?;
            log::debug!(
                "'{}': {} {} {}x{}, {} bytes compressed to {}",
                name,
                matrix.storage(),
                matrix.kind(),
                matrix.rows(),
                matrix.cols(),
                payload.len(),
                body.len()
            );
        } else {
            let tag = Tag::write_long(writer, DataType::Matrix, payload.len())?;
            writer.write_all(&payload)?;
            tag.write_padding(writer)?;
            log::debug!(
                "'{}': {} {} {}x{}, {} bytes",
                name,
                matrix.storage(),
                matrix.kind(),
                matrix.rows(),
                matrix.cols(),
                payload.len()
            );
        }
        Ok(())
    }
}

/// Write `matrices` with default settings.
///
/// Shorthand for `MatWriter::new().write(writer, matrices)`.
pub fn write_mat<'a, W, I, N>(writer: &mut W, matrices: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (N, &'a Matrix)>,
    N: AsRef<str>,
{
    MatWriter::new().write(writer, matrices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::file_header::HEADER_LEN;
    use ndarray::array;

    fn sample() -> Matrix {
        array![[1.0, 0.0, 3.0]].into()
    }

    #[test]
    fn test_compressed_layout() {
        let m = sample();
        let mut out = Vec::new();
        MatWriter::new().header_text("t").write(&mut out, [("x", &m)]).unwrap();

        let tag = &out[HEADER_LEN..HEADER_LEN + 8];
        assert_eq!(&tag[..4], &15u32.to_le_bytes());
        let length = u32::from_le_bytes([tag[4], tag[5], tag[6], tag[7]]) as usize;
        assert_eq!(out.len(), HEADER_LEN + 8 + length);
        assert_eq!(&out[HEADER_LEN + 8..HEADER_LEN + 10], &compression::STREAM_MARKER);
    }

    #[test]
    fn test_uncompressed_layout() {
        let m = sample();
        let mut out = Vec::new();
        MatWriter::new()
            .compress(false)
            .header_text("t")
            .write(&mut out, [("x", &m)])
            .unwrap();

        assert_eq!(&out[HEADER_LEN..HEADER_LEN + 4], &14u32.to_le_bytes());
        assert_eq!((out.len() - HEADER_LEN) % 8, 0);
    }

    #[test]
    fn test_names_validated_before_writing() {
        let m = sample();
        let mut out = Vec::new();
        let err = write_mat(&mut out, [("ok", &m), ("not ok", &m)]).unwrap_err();
        assert!(matches!(err, Error::InvalidMatrixName { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_file_is_header_only() {
        let mut out = Vec::new();
        write_mat::<_, _, &str>(&mut out, []).unwrap();
        assert_eq!(out.len(), HEADER_LEN);
        assert!(out.starts_with(b"MATLAB 5.0 MAT-file"));
    }
}
