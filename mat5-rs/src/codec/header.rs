//! Array flags, dimensions and name sub-elements.
//!
//! Every matrix element opens with the same three sub-elements:
//!
//! ```text
//! | uint32 tag, 8 | class | flags | 0 0 | nzmax   |
//! | int32 tag, 8  | rows          | cols          |
//! | int8 tag, n   | name bytes ... | pad          |
//! ```

use std::fmt;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::data_type::DataType;
use crate::element::Tag;
use crate::error::{Error, Result};

/// Complex bit of the array flags byte.
const FLAG_COMPLEX: u8 = 0x08;

/// MATLAB array class codes (`mxCELL_CLASS` … `mxOPAQUE_CLASS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArrayClass {
    /// Cell array
    Cell = 1,
    /// Structure
    Struct = 2,
    /// Object
    Object = 3,
    /// Character array
    Char = 4,
    /// Sparse array
    Sparse = 5,
    /// Double-precision array
    Double = 6,
    /// Single-precision array
    Single = 7,
    /// 8-bit signed integer array
    Int8 = 8,
    /// 8-bit unsigned integer array
    UInt8 = 9,
    /// 16-bit signed integer array
    Int16 = 10,
    /// 16-bit unsigned integer array
    UInt16 = 11,
    /// 32-bit signed integer array
    Int32 = 12,
    /// 32-bit unsigned integer array
    UInt32 = 13,
    /// 64-bit signed integer array
    Int64 = 14,
    /// 64-bit unsigned integer array
    UInt64 = 15,
    /// Function handle
    Function = 16,
    /// Opaque object
    Opaque = 17,
}

impl ArrayClass {
    /// Look up a class from its code.
    pub fn from_code(code: u8) -> Option<Self> {
        let class = match code {
            1 => ArrayClass::Cell,
            2 => ArrayClass::Struct,
            3 => ArrayClass::Object,
            4 => ArrayClass::Char,
            5 => ArrayClass::Sparse,
            6 => ArrayClass::Double,
            7 => ArrayClass::Single,
            8 => ArrayClass::Int8,
            9 => ArrayClass::UInt8,
            10 => ArrayClass::Int16,
            11 => ArrayClass::UInt16,
            12 => ArrayClass::Int32,
            13 => ArrayClass::UInt32,
            14 => ArrayClass::Int64,
            15 => ArrayClass::UInt64,
            16 => ArrayClass::Function,
            17 => ArrayClass::Opaque,
            _ => return None,
        };
        Some(class)
    }

    /// Whether this codec can decode arrays of this class.
    pub const fn is_supported(self) -> bool {
        matches!(self, ArrayClass::Double | ArrayClass::Single | ArrayClass::Sparse)
    }
}

impl fmt::Display for ArrayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayClass::Cell => "cell",
            ArrayClass::Struct => "struct",
            ArrayClass::Object => "object",
            ArrayClass::Char => "char",
            ArrayClass::Sparse => "sparse",
            ArrayClass::Double => "double",
            ArrayClass::Single => "single",
            ArrayClass::Int8 => "int8",
            ArrayClass::UInt8 => "uint8",
            ArrayClass::Int16 => "int16",
            ArrayClass::UInt16 => "uint16",
            ArrayClass::Int32 => "int32",
            ArrayClass::UInt32 => "uint32",
            ArrayClass::Int64 => "int64",
            ArrayClass::UInt64 => "uint64",
            ArrayClass::Function => "function handle",
            ArrayClass::Opaque => "opaque",
        };
        f.write_str(name)
    }
}

/// Decoded array header of a matrix element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayHeader {
    /// Array class; always a supported one after [`read`](Self::read).
    pub class: ArrayClass,
    /// Whether an imaginary part follows the real part.
    pub complex: bool,
    /// Maximum non-zero count (sparse only, 0 for dense).
    pub nzmax: u32,
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Variable name.
    pub name: String,
}

impl ArrayHeader {
    /// Write the three header sub-elements.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let rows = dimension(self.rows, self.rows, self.cols)?;
        let cols = dimension(self.cols, self.rows, self.cols)?;

        let flags = if self.complex { FLAG_COMPLEX } else { 0 };
        let tag = Tag::write(writer, DataType::UInt32, 8)?;
        writer.write_u32::<LittleEndian>(u32::from(self.class as u8) | (u32::from(flags) << 8))?;
        writer.write_u32::<LittleEndian>(self.nzmax)?;
        tag.write_padding(writer)?;

        let tag = Tag::write(writer, DataType::Int32, 8)?;
        writer.write_i32::<LittleEndian>(rows)?;
        writer.write_i32::<LittleEndian>(cols)?;
        tag.write_padding(writer)?;

        let tag = Tag::write(writer, DataType::Int8, self.name.len())?;
        writer.write_all(self.name.as_bytes())?;
        tag.write_padding(writer)?;

        Ok(())
    }

    /// Read the three header sub-elements.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedArrayClass`] for any class but double, single, sparse
    /// - [`Error::UnsupportedDimensionality`] unless exactly two dimensions are declared
    /// - [`Error::InvalidFormat`] for malformed sub-elements
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = Tag::read(reader)?;
        if tag.length != 8 {
            return Err(Error::invalid_format(format!(
                "array flags element holds {} bytes, expected 8",
                tag.length
            )));
        }
        let flags = reader.read_u32::<LittleEndian>()?;
        let nzmax = reader.read_u32::<LittleEndian>()?;
        tag.skip_padding(reader)?;

        let code = (flags & 0xFF) as u8;
        let class = match ArrayClass::from_code(code) {
            Some(class) if class.is_supported() => class,
            Some(class) => return Err(Error::unsupported_class(class.to_string())),
            None => return Err(Error::unsupported_class(format!("unknown ({})", code))),
        };
        let complex = ((flags >> 8) as u8 & FLAG_COMPLEX) != 0;

        let tag = Tag::read(reader)?;
        if tag.length % 4 != 0 {
            return Err(Error::invalid_format(format!(
                "dimensions element holds {} bytes",
                tag.length
            )));
        }
        let dims = tag.length as usize / 4;
        if dims != 2 {
            return Err(Error::UnsupportedDimensionality { dims });
        }
        let rows = reader.read_i32::<LittleEndian>()?;
        let cols = reader.read_i32::<LittleEndian>()?;
        tag.skip_padding(reader)?;
        if rows < 0 || cols < 0 {
            return Err(Error::invalid_format(format!(
                "negative dimensions {}x{}",
                rows, cols
            )));
        }

        let tag = Tag::read(reader)?;
        let bytes = tag.read_payload(reader)?;
        let name = String::from_utf8(bytes)
            .map_err(|_| Error::invalid_format("array name is not valid text"))?;

        Ok(ArrayHeader {
            class,
            complex,
            nzmax,
            rows: rows as usize,
            cols: cols as usize,
            name,
        })
    }
}

fn dimension(value: usize, rows: usize, cols: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidDimensions { rows, cols })
}
