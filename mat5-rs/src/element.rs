//! Data element tags and padding.
//!
//! A data element is a `(type, length)` tag followed by `length` payload
//! bytes and zero padding. Two tag layouts exist:
//!
//! ```text
//! long form:   | type: u32 | length: u32 | payload ... | pad to 8 |
//! short form:  | type: u16 | length: u16 | payload (<= 4) | pad to 4 |
//! ```
//!
//! Both are little-endian. A short-form tag is recognised by a non-zero
//! upper half of the first 32-bit word, since long-form type codes all fit
//! in 16 bits.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Payloads up to this many bytes use the short form.
pub const SHORT_FORM_MAX: u32 = 4;

const ZEROS: [u8; 8] = [0; 8];

/// A decoded element tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Raw type code.
    pub code: u32,
    /// Payload length in bytes, excluding padding.
    pub length: u32,
    /// Whether the tag used the packed 2+2 byte layout.
    pub short: bool,
}

impl Tag {
    /// Write a tag, choosing the short form for payloads of 1 to 4 bytes.
    ///
    /// An empty payload is always written in long form: a packed word with
    /// a zero length would read back as a long-form type code.
    pub fn write<W: Write>(writer: &mut W, data_type: DataType, length: usize) -> Result<Tag> {
        let length = checked_length(length)?;
        if length > 0 && length <= SHORT_FORM_MAX {
            writer.write_u32::<LittleEndian>(data_type.code() | (length << 16))?;
            Ok(Tag {
                code: data_type.code(),
                length,
                short: true,
            })
        } else {
            Self::write_long_raw(writer, data_type.code(), length)
        }
    }

    /// Write a long-form tag regardless of length.
    pub fn write_long<W: Write>(writer: &mut W, data_type: DataType, length: usize) -> Result<Tag> {
        Self::write_long_raw(writer, data_type.code(), checked_length(length)?)
    }

    fn write_long_raw<W: Write>(writer: &mut W, code: u32, length: u32) -> Result<Tag> {
        writer.write_u32::<LittleEndian>(code)?;
        writer.write_u32::<LittleEndian>(length)?;
        Ok(Tag {
            code,
            length,
            short: false,
        })
    }

    /// Read a tag in either form.
    pub fn read<R: Read>(reader: &mut R) -> Result<Tag> {
        let word = reader.read_u32::<LittleEndian>()?;
        Self::read_after_first_word(reader, word)
    }

    /// Read a tag, or `None` if the stream ends cleanly before its first byte.
    ///
    /// A stream ending partway through the tag is a truncation error.
    pub fn read_optional<R: Read>(reader: &mut R) -> Result<Option<Tag>> {
        let mut first = [0u8; 4];
        let mut filled = 0;
        while filled < first.len() {
            match reader.read(&mut first[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => Ok(None),
            4 => Self::read_after_first_word(reader, u32::from_le_bytes(first)).map(Some),
            _ => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended inside an element tag",
            )
            .into()),
        }
    }

    fn read_after_first_word<R: Read>(reader: &mut R, word: u32) -> Result<Tag> {
        let packed_length = word >> 16;
        if packed_length > SHORT_FORM_MAX {
            return Err(Error::invalid_format(format!(
                "short-form tag packs {} bytes, at most {} fit",
                packed_length, SHORT_FORM_MAX
            )));
        }
        let tag = if packed_length != 0 {
            Tag {
                code: word & 0xFFFF,
                length: packed_length,
                short: true,
            }
        } else {
            Tag {
                code: word,
                length: reader.read_u32::<LittleEndian>()?,
                short: false,
            }
        };
        log::trace!(
            "tag type={} length={} short={}",
            tag.code,
            tag.length,
            tag.short
        );
        Ok(tag)
    }

    /// The element type, if the code is known.
    pub fn data_type(&self) -> Option<DataType> {
        DataType::from_raw(self.code)
    }

    /// Require a known type, mapping unknown codes to an error.
    pub fn require_type(&self) -> Result<DataType> {
        self.data_type()
            .ok_or(Error::UnsupportedElementType { code: self.code })
    }

    /// Alignment of the payload: 4 bytes for short form, 8 for long form.
    pub const fn block_size(&self) -> usize {
        if self.short {
            4
        } else {
            8
        }
    }

    /// Size of the tag itself.
    pub const fn header_size(&self) -> usize {
        if self.short {
            4
        } else {
            8
        }
    }

    /// Number of zero bytes following the payload.
    pub const fn padding(&self) -> usize {
        padding_for(self.length as usize, self.block_size())
    }

    /// Tag, payload and padding together.
    pub const fn total_size(&self) -> usize {
        self.header_size() + self.length as usize + self.padding()
    }

    /// Emit the zero padding after a payload.
    pub fn write_padding<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&ZEROS[..self.padding()])?;
        Ok(())
    }

    /// Skip the padding after a payload.
    pub fn skip_padding<R: Read>(&self, reader: &mut R) -> Result<()> {
        let mut pad = [0u8; 8];
        reader.read_exact(&mut pad[..self.padding()])?;
        Ok(())
    }

    /// Read the whole payload into memory and skip its padding.
    pub fn read_payload<R: Read>(&self, reader: &mut R) -> Result<Vec<u8>> {
        let payload = read_exact_vec(reader, self.length as usize)?;
        self.skip_padding(reader)?;
        Ok(payload)
    }
}

/// Padding length for a payload of `length` bytes.
pub const fn padding_for(length: usize, block_size: usize) -> usize {
    (block_size - length % block_size) % block_size
}

/// Read exactly `len` bytes without trusting `len` for the allocation up front.
pub(crate) fn read_exact_vec<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(1 << 20));
    let read = reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if read != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, stream ended after {}", len, read),
        )
        .into());
    }
    Ok(buf)
}

fn checked_length(length: usize) -> Result<u32> {
    u32::try_from(length)
        .map_err(|_| Error::invalid_format(format!("element of {} bytes exceeds 4 GiB", length)))
}
