//! Adler-32 checksum.
//!
//! Compressed MAT-file elements carry the Adler-32 of their uncompressed
//! content as a trailer, exactly like a zlib stream.
//!
//! # Example
//!
//! ```
//! use mat5_rs::checksum::adler32;
//!
//! assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
//! ```

/// Largest prime smaller than 2^16.
const BASE: u32 = 65521;

/// Largest `n` such that `255·n·(n+1)/2 + (n+1)·(BASE-1) <= 2^32-1`.
///
/// Sums can be accumulated over this many bytes before reducing.
const NMAX: usize = 5552;

/// Incremental Adler-32 hasher.
///
/// Feeding the input in any number of pieces yields the same value as
/// [`adler32`] over the concatenation.
#[derive(Debug, Clone, Copy)]
pub struct Adler32 {
    low: u32,
    high: u32,
}

impl Adler32 {
    /// Create a hasher for the empty input.
    pub const fn new() -> Self {
        Adler32 { low: 1, high: 0 }
    }

    /// Feed more bytes.
    pub fn update(&mut self, data: &[u8]) {
        for chunk in data.chunks(NMAX) {
            for &byte in chunk {
                self.low += u32::from(byte);
                self.high += self.low;
            }
            self.low %= BASE;
            self.high %= BASE;
        }
    }

    /// Get the checksum of everything fed so far.
    pub const fn finish(&self) -> u32 {
        self.low | (self.high << 16)
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the Adler-32 checksum of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.update(data);
    hasher.finish()
}
