//! The 128-byte file header.
//!
//! ```text
//! 0    116  descriptive text, zero padded
//! 116  8    subsystem data offset (zero)
//! 124  2    version 0x0100
//! 126  2    endian indicator "IM"
//! ```

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Size of the file header.
pub const HEADER_LEN: usize = 128;

/// Size of the descriptive text field.
pub const TEXT_LEN: usize = 116;

/// Level-5 format version.
pub const VERSION: u16 = 0x0100;

/// Endian indicator as written by a little-endian producer.
pub const ENDIAN_INDICATOR: [u8; 2] = *b"IM";

/// Descriptive text of the file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    text: String,
}

impl FileHeader {
    /// Create a header with the given text.
    ///
    /// Non-ASCII characters are replaced by `?` and the text is cut to
    /// 116 bytes when written.
    pub fn new(text: impl Into<String>) -> Self {
        FileHeader { text: text.into() }
    }

    /// Text in the style MATLAB writes, stamped with the current local time.
    pub fn default_text() -> String {
        format!(
            "MATLAB 5.0 MAT-file, Platform: {}, Created on: {}",
            std::env::consts::OS,
            chrono::Local::now().format("%a %b %e %H:%M:%S %Y")
        )
    }

    /// The descriptive text, without trailing padding.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Write the full 128-byte header.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut bytes = [0u8; HEADER_LEN];
        for (dst, ch) in bytes[..TEXT_LEN].iter_mut().zip(self.text.chars()) {
            *dst = if ch.is_ascii() { ch as u8 } else { b'?' };
        }
        LittleEndian::write_u16(&mut bytes[124..126], VERSION);
        bytes[126..128].copy_from_slice(&ENDIAN_INDICATOR);
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Read and validate a 128-byte header.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedEndianness`] unless the indicator is `"IM"`
    /// - [`Error::UnsupportedVersion`] unless the version is `0x0100`
    /// - [`Error::Io`] if fewer than 128 bytes are available
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; HEADER_LEN];
        reader.read_exact(&mut bytes)?;

        let indicator = [bytes[126], bytes[127]];
        if indicator != ENDIAN_INDICATOR {
            return Err(Error::UnsupportedEndianness { found: indicator });
        }
        let version = LittleEndian::read_u16(&bytes[124..126]);
        if version != VERSION {
            return Err(Error::UnsupportedVersion { version });
        }

        let text = String::from_utf8_lossy(&bytes[..TEXT_LEN])
            .trim_end_matches(|c| c == '\0' || c == ' ')
            .to_string();
        Ok(FileHeader { text })
    }
}
