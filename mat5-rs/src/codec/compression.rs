//! zlib-wrapped elements (`miCOMPRESSED`).
//!
//! A compressed element's body is a complete zlib stream around one inner
//! element:
//!
//! ```text
//! | 0x78 0x9C | deflate(inner type: u32 | inner length: u32 | payload) | adler32 (big-endian) |
//! ```
//!
//! The two-byte marker and the trailer are handled here; the deflate
//! stream itself is raw, through `flate2`.

use std::io::Write;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::checksum::Adler32;
use crate::element::read_exact_vec;
use crate::error::{Error, Result};

/// zlib header for deflate with a 32 KiB window at the default level.
pub const STREAM_MARKER: [u8; 2] = [0x78, 0x9C];

const TRAILER_LEN: usize = 4;

/// Compress one inner element into the body of a compressed element.
pub fn compress(inner_type: u32, payload: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len())
        .map_err(|_| Error::invalid_format("inner element exceeds 4 GiB"))?;
    let mut tag = [0u8; 8];
    LittleEndian::write_u32(&mut tag[..4], inner_type);
    LittleEndian::write_u32(&mut tag[4..], length);

    let mut checksum = Adler32::new();
    checksum.update(&tag);
    checksum.update(payload);

    let mut body = Vec::with_capacity(payload.len() / 2 + 16);
    body.extend_from_slice(&STREAM_MARKER);

    let mut encoder = DeflateEncoder::new(body, Compression::default());
    encoder.write_all(&tag)?;
    encoder.write_all(payload)?;
    let mut body = encoder.finish()?;

    body.write_u32::<BigEndian>(checksum.finish())?;
    Ok(body)
}

/// Recover the inner element from the body of a compressed element.
///
/// Returns the inner type code and payload. With `verify` set, the trailer
/// must match the Adler-32 of the decompressed bytes.
///
/// # Errors
///
/// - [`Error::InvalidFormat`] if the body is too short to hold marker and trailer
/// - [`Error::ChecksumMismatch`] if verification fails
/// - [`Error::Io`] if the deflate stream is corrupt or ends early
pub fn decompress(body: &[u8], verify: bool) -> Result<(u32, Vec<u8>)> {
    if body.len() < STREAM_MARKER.len() + TRAILER_LEN {
        return Err(Error::invalid_format(format!(
            "compressed element of {} bytes is too short",
            body.len()
        )));
    }
    let stream = &body[STREAM_MARKER.len()..body.len() - TRAILER_LEN];
    let mut decoder = DeflateDecoder::new(stream);

    let inner_type = decoder.read_u32::<LittleEndian>()?;
    let length = decoder.read_u32::<LittleEndian>()?;
    let payload = read_exact_vec(&mut decoder, length as usize)?;

    if verify {
        let expected = BigEndian::read_u32(&body[body.len() - TRAILER_LEN..]);
        let mut checksum = Adler32::new();
        checksum.update(&inner_type.to_le_bytes());
        checksum.update(&length.to_le_bytes());
        checksum.update(&payload);
        let computed = checksum.finish();
        if computed != expected {
            return Err(Error::ChecksumMismatch { expected, computed });
        }
    }

    log::trace!(
        "decompressed {} bytes into inner element type={} length={}",
        body.len(),
        inner_type,
        length
    );
    Ok((inner_type, payload))
}
