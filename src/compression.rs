//! The compression seam.
//!
//! The marshaling core treats compressed payloads as opaque: it only ever
//! reads already-inflated bytes or hands finished buffers to a deflation
//! stage. This module defines that boundary, the [`Compressor`] trait,
//! plus a pass-through implementation and, behind the `flate2` feature
//! (enabled by default), a zlib adapter. The compression routines themselves
//! live entirely in the codec crate.

use std::borrow::Cow;

use crate::error::Result;
#[cfg(feature = "flate2")]
use crate::error::RelicError;

/// An opaque byte-buffer transform.
///
/// Implementors turn raw buffers into compressed ones and back. `compress`
/// and `decompress` return `Cow` so a pass-through implementation can
/// borrow its input.
pub trait Compressor: Send + Sync + std::fmt::Debug {
    /// Compresses the data.
    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>>;

    /// Decompresses the data.
    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>>;
}

/// A compressor that performs no compression (pass-through).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompression;

impl Compressor for NoCompression {
    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        Ok(Cow::Borrowed(data))
    }

    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        Ok(Cow::Borrowed(data))
    }
}

/// A zlib-stream compressor backed by `flate2`.
///
/// Matches the convention of legacy asset containers: a bare zlib stream
/// with no extra framing; the surrounding format records the inflated
/// length where it needs it.
#[cfg(feature = "flate2")]
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: u32,
}

#[cfg(feature = "flate2")]
impl ZlibCompressor {
    /// A compressor at the given zlib level; values outside `0..=9` fall
    /// back to the codec default.
    pub fn new(level: u32) -> Self {
        let level = if level <= 9 { level } else { 6 };
        Self { level }
    }
}

#[cfg(feature = "flate2")]
impl Default for ZlibCompressor {
    fn default() -> Self {
        Self { level: 6 }
    }
}

#[cfg(feature = "flate2")]
impl Compressor for ZlibCompressor {
    fn compress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        use std::io::Write;
        let mut encoder = flate2::write::ZlibEncoder::new(
            Vec::new(),
            flate2::Compression::new(self.level),
        );
        encoder
            .write_all(data)
            .map_err(|e| RelicError::Compression(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| RelicError::Compression(e.to_string()))?;
        Ok(Cow::Owned(compressed))
    }

    fn decompress<'a>(&self, data: &'a [u8]) -> Result<Cow<'a, [u8]>> {
        use std::io::Read;
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .map_err(|e| RelicError::Compression(e.to_string()))?;
        Ok(Cow::Owned(inflated))
    }
}
