//! MAT-file data element types.
//!
//! Every data element starts with a tag naming one of these types. Numeric
//! types double as the on-wire representation of matrix values; MATLAB is
//! free to store a double-valued matrix with a narrower integer type when
//! all values fit, so readers must convert any numeric type to `f64`.

use std::fmt;
use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, Result};

/// Data element type codes (`miINT8` … `miUTF32`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataType {
    /// 8-bit signed integer
    Int8 = 1,

    /// 8-bit unsigned integer
    UInt8 = 2,

    /// 16-bit signed integer
    Int16 = 3,

    /// 16-bit unsigned integer
    UInt16 = 4,

    /// 32-bit signed integer
    Int32 = 5,

    /// 32-bit unsigned integer
    UInt32 = 6,

    /// 32-bit IEEE float
    Single = 7,

    /// 64-bit IEEE float
    Double = 9,

    /// 64-bit signed integer
    Int64 = 12,

    /// 64-bit unsigned integer
    UInt64 = 13,

    /// Array (matrix) element
    Matrix = 14,

    /// zlib-compressed element
    Compressed = 15,

    /// UTF-8 text
    Utf8 = 16,

    /// UTF-16 text
    Utf16 = 17,

    /// UTF-32 text
    Utf32 = 18,
}

impl DataType {
    /// Look up a type from its raw tag value.
    ///
    /// Returns `None` for reserved or unknown codes.
    pub fn from_raw(value: u32) -> Option<Self> {
        let data_type = match value {
            1 => DataType::Int8,
            2 => DataType::UInt8,
            3 => DataType::Int16,
            4 => DataType::UInt16,
            5 => DataType::Int32,
            6 => DataType::UInt32,
            7 => DataType::Single,
            9 => DataType::Double,
            12 => DataType::Int64,
            13 => DataType::UInt64,
            14 => DataType::Matrix,
            15 => DataType::Compressed,
            16 => DataType::Utf8,
            17 => DataType::Utf16,
            18 => DataType::Utf32,
            _ => return None,
        };
        Some(data_type)
    }

    /// Raw tag value.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Size in bytes of one value, or 0 for non-numeric types.
    pub const fn size_bytes(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Single => 4,
            DataType::Int64 | DataType::UInt64 | DataType::Double => 8,
            DataType::Matrix
            | DataType::Compressed
            | DataType::Utf8
            | DataType::Utf16
            | DataType::Utf32 => 0,
        }
    }

    /// Check if values of this type can populate a numeric matrix.
    pub const fn is_numeric(self) -> bool {
        self.size_bytes() > 0
    }

    /// Check if this type is a floating-point type.
    pub const fn is_float(self) -> bool {
        matches!(self, DataType::Single | DataType::Double)
    }

    /// Read one value of this type and widen it to `f64`.
    ///
    /// 64-bit integers beyond 2^53 lose precision, as they do in MATLAB
    /// when converted to double.
    pub fn read_f64<R: Read>(self, reader: &mut R) -> Result<f64> {
        let value = match self {
            DataType::Int8 => f64::from(reader.read_i8()?),
            DataType::UInt8 => f64::from(reader.read_u8()?),
            DataType::Int16 => f64::from(reader.read_i16::<LittleEndian>()?),
            DataType::UInt16 => f64::from(reader.read_u16::<LittleEndian>()?),
            DataType::Int32 => f64::from(reader.read_i32::<LittleEndian>()?),
            DataType::UInt32 => f64::from(reader.read_u32::<LittleEndian>()?),
            DataType::Single => f64::from(reader.read_f32::<LittleEndian>()?),
            DataType::Double => reader.read_f64::<LittleEndian>()?,
            DataType::Int64 => reader.read_i64::<LittleEndian>()? as f64,
            DataType::UInt64 => reader.read_u64::<LittleEndian>()? as f64,
            other => {
                return Err(Error::invalid_format(format!(
                    "{} element cannot hold numeric values",
                    other
                )))
            }
        };
        Ok(value)
    }

    /// Write one value in this type.
    ///
    /// Only the floating-point types are produced by the writer.
    pub fn write_f64<W: Write>(self, writer: &mut W, value: f64) -> Result<()> {
        match self {
            DataType::Double => writer.write_f64::<LittleEndian>(value)?,
            DataType::Single => writer.write_f32::<LittleEndian>(value as f32)?,
            other => {
                return Err(Error::invalid_format(format!(
                    "cannot write values as {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Single => "single",
            DataType::Double => "double",
            DataType::Int64 => "int64",
            DataType::UInt64 => "uint64",
            DataType::Matrix => "matrix",
            DataType::Compressed => "compressed",
            DataType::Utf8 => "utf8",
            DataType::Utf16 => "utf16",
            DataType::Utf32 => "utf32",
        };
        f.write_str(name)
    }
}
