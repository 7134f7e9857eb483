//! MAT-file parsing.
//!
//! This module provides [`MatFile`], the named collection of matrices read
//! from (or about to be written to) a MAT-file.
//!
//! # Example
//!
//! ```no_run
//! use mat5_rs::{MatFile, ParseOptions};
//!
//! let file = MatFile::open_with("model.mat", &ParseOptions::new().names(["W"]))?;
//! let w = file.require("W")?;
//! println!("W is {}x{}", w.rows(), w.cols());
//! # Ok::<(), mat5_rs::Error>(())
//! ```

use std::collections::btree_map::{self, BTreeMap};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Write};
use std::path::Path;

use crate::codec::{compression, decode_matrix, validate_name, ArrayHeader};
use crate::config::ParseOptions;
use crate::data_type::DataType;
use crate::element::{read_exact_vec, Tag};
use crate::error::{Error, Result};
use crate::file_header::FileHeader;
use crate::matrix::Matrix;
use crate::writer::MatWriter;

/// Matrices of a MAT-file, keyed by name.
///
/// A parse builds a fresh `MatFile`; nothing is shared between parses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatFile {
    matrices: BTreeMap<String, Matrix>,
    first_name: Option<String>,
    header_text: String,
}

impl MatFile {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete MAT-file with default options.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        Self::parse_with(reader, &ParseOptions::default())
    }

    /// Parse a complete MAT-file.
    ///
    /// Reads the header, then every top-level element until the stream ends.
    /// Matrices excluded by [`ParseOptions::names`] are skipped after their
    /// array header, without decoding their data.
    ///
    /// # Errors
    ///
    /// Any error aborts the parse and no partial result is returned:
    ///
    /// - [`Error::UnsupportedEndianness`] / [`Error::UnsupportedVersion`] for a foreign header
    /// - [`Error::UnsupportedElementType`] for an unknown top-level element (unless skipped)
    /// - [`Error::ChecksumMismatch`] for a corrupt compressed element (unless unverified)
    /// - [`Error::Io`] for truncated input
    pub fn parse_with<R: Read>(mut reader: R, options: &ParseOptions) -> Result<Self> {
        let header = FileHeader::read(&mut reader)?;
        log::debug!("header: {:?}", header.text());

        let mut file = MatFile {
            header_text: header.text().to_string(),
            ..Self::default()
        };

        let mut index = 0usize;
        while let Some(tag) = Tag::read_optional(&mut reader)? {
            log::debug!("element {}: type={} length={}", index, tag.code, tag.length);
            match tag.data_type() {
                Some(DataType::Compressed) => {
                    let body = read_exact_vec(&mut reader, tag.length as usize)?;
                    let (inner, payload) = compression::decompress(&body, options.verify_checksum)?;
                    if inner == DataType::Matrix.code() {
                        file.decode_element(&payload, options)?;
                    } else {
                        skip_unknown(inner, options)?;
                    }
                }
                Some(DataType::Matrix) => {
                    let payload = tag.read_payload(&mut reader)?;
                    file.decode_element(&payload, options)?;
                }
                _ => {
                    skip_unknown(tag.code, options)?;
                    tag.read_payload(&mut reader)?;
                }
            }
            index += 1;
        }

        log::debug!("parsed {} elements, kept {} matrices", index, file.len());
        Ok(file)
    }

    /// Open and parse the file at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, &ParseOptions::default())
    }

    /// Open and parse the file at `path`.
    pub fn open_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::parse_with(BufReader::new(file), options)
    }

    fn decode_element(&mut self, payload: &[u8], options: &ParseOptions) -> Result<()> {
        let mut cursor = Cursor::new(payload);
        let header = ArrayHeader::read(&mut cursor)?;
        if !options.wants(&header.name) {
            log::trace!("skipping '{}' (not requested)", header.name);
            return Ok(());
        }

        let matrix = decode_matrix(&mut cursor, &header, options.kind)?;
        log::debug!(
            "'{}': {} {} {}x{} nnz={}",
            header.name,
            matrix.storage(),
            matrix.kind(),
            matrix.rows(),
            matrix.cols(),
            matrix.nnz()
        );
        self.register(header.name, matrix);
        Ok(())
    }

    fn register(&mut self, name: String, matrix: Matrix) {
        if self.first_name.is_none() {
            self.first_name = Some(name.clone());
        }
        if self.matrices.insert(name.clone(), matrix).is_some() {
            log::warn!("duplicate matrix '{}' replaces an earlier one", name);
        }
    }

    /// Add a matrix, returning the one it replaces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMatrixName`] if `name` cannot be written.
    pub fn insert(&mut self, name: impl Into<String>, matrix: impl Into<Matrix>) -> Result<Option<Matrix>> {
        let name = name.into();
        validate_name(&name)?;
        if self.first_name.is_none() {
            self.first_name = Some(name.clone());
        }
        Ok(self.matrices.insert(name, matrix.into()))
    }

    /// Look up a matrix by name.
    pub fn get(&self, name: &str) -> Option<&Matrix> {
        self.matrices.get(name)
    }

    /// Look up a matrix by name, failing with [`Error::NameNotFound`].
    pub fn require(&self, name: &str) -> Result<&Matrix> {
        self.get(name).ok_or_else(|| Error::name_not_found(name))
    }

    /// The first matrix registered, with its name.
    pub fn first(&self) -> Option<(&str, &Matrix)> {
        let name = self.first_name.as_deref()?;
        self.matrices.get(name).map(|m| (name, m))
    }

    /// Name of the first matrix registered.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Matrix names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.matrices.keys().map(String::as_str)
    }

    /// Iterate over `(name, matrix)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Matrix> {
        self.matrices.iter()
    }

    /// Number of matrices.
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    /// Whether the collection holds no matrices.
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Text of the file header (empty for a collection not read from a file).
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Write every matrix using `writer_options`.
    pub fn write_to<W: Write>(&self, writer: &mut W, writer_options: &MatWriter) -> Result<()> {
        writer_options.write(writer, self.iter())
    }

    fn take(mut self, name: &str) -> Result<Matrix> {
        self.matrices
            .remove(name)
            .ok_or_else(|| Error::name_not_found(name))
    }
}

impl IntoIterator for MatFile {
    type Item = (String, Matrix);
    type IntoIter = btree_map::IntoIter<String, Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.matrices.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatFile {
    type Item = (&'a String, &'a Matrix);
    type IntoIter = btree_map::Iter<'a, String, Matrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.matrices.iter()
    }
}

fn skip_unknown(code: u32, options: &ParseOptions) -> Result<()> {
    if options.skip_unknown_elements {
        log::warn!("skipping element of unsupported type {}", code);
        Ok(())
    } else {
        Err(Error::UnsupportedElementType { code })
    }
}

/// Read a single matrix by name, decoding nothing else.
///
/// # Errors
///
/// Returns [`Error::NameNotFound`] if the file holds no matrix called `name`.
pub fn read_matrix<R: Read>(reader: R, name: &str) -> Result<Matrix> {
    let options = ParseOptions::new().names([name]);
    MatFile::parse_with(reader, &options)?.take(name)
}
