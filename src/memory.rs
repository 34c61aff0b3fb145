//! In-memory stream implementations.
//!
//! [`MemoryReader`] wraps a byte buffer, typically a whole asset pulled
//! from an archive or the output of a decompression stage, and
//! [`MemoryWriter`] builds one, typically destined for a file or a
//! deflation stage. Both implement the full stream contract, so record code
//! is oblivious to whether it is marshaling against a file or a buffer.

use crate::compression::Compressor;
use crate::error::{RelicError, Result};
use crate::stream::{Endian, SeekOrigin, StreamReader, StreamWriter};

/// A [`StreamReader`] over an owned byte buffer.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    data: Vec<u8>,
    offset: usize,
    endian: Endian,
}

impl MemoryReader {
    /// Wraps `data`, positioned at the start, little-endian.
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_endian(data, Endian::Little)
    }

    /// Wraps `data` with an explicit initial byte order.
    pub fn with_endian(data: Vec<u8>, endian: Endian) -> Self {
        Self {
            data,
            offset: 0,
            endian,
        }
    }

    /// Copies `data` into a new reader.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    /// Inflates an opaque compressed buffer through the compression seam
    /// and wraps the result.
    ///
    /// This is the entry point for the external compression stage: the
    /// marshaling core only ever reads already-inflated bytes.
    pub fn from_compressed(data: &[u8], compressor: &dyn Compressor) -> Result<Self> {
        let inflated = compressor.decompress(data)?;
        Ok(Self::new(inflated.into_owned()))
    }

    /// The wrapped bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl StreamReader for MemoryReader {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<usize> {
        let remaining = self.data.len().saturating_sub(self.offset);
        let n = dst.len().min(remaining);
        dst[..n].copy_from_slice(&self.data[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }

    fn seek(&mut self, pos: i64, origin: SeekOrigin) -> Result<()> {
        let len = self.data.len() as i128;
        let target: i128 = match origin {
            SeekOrigin::Begin => pos as i128,
            SeekOrigin::Current => self.offset as i128 + pos as i128,
            SeekOrigin::End => len - pos as i128,
        };
        if target < 0 || target > len {
            return Err(RelicError::SeekOutOfRange {
                target: target.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                length: self.data.len() as u64,
            });
        }
        self.offset = target as usize;
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.offset as u64)
    }

    fn length(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }
}

/// A [`StreamWriter`] over a growable byte buffer.
///
/// Writes at the logical offset overwrite existing bytes and extend the
/// buffer past its end; seeking is confined to the written extent.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Vec<u8>,
    offset: usize,
    endian: Endian,
}

impl MemoryWriter {
    /// An empty little-endian writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty writer with an explicit initial byte order.
    pub fn with_endian(endian: Endian) -> Self {
        Self {
            buf: Vec::new(),
            offset: 0,
            endian,
        }
    }

    /// An empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            offset: 0,
            endian: Endian::Little,
        }
    }

    /// The bytes produced so far.
    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the writer, returning the produced buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl StreamWriter for MemoryWriter {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    fn write_bytes(&mut self, src: &[u8]) -> Result<()> {
        let end = self.offset + src.len();
        if end <= self.buf.len() {
            self.buf[self.offset..end].copy_from_slice(src);
        } else {
            let overlap = self.buf.len() - self.offset;
            self.buf[self.offset..].copy_from_slice(&src[..overlap]);
            self.buf.extend_from_slice(&src[overlap..]);
        }
        self.offset = end;
        Ok(())
    }

    fn seek(&mut self, pos: i64, origin: SeekOrigin) -> Result<()> {
        let len = self.buf.len() as i128;
        let target: i128 = match origin {
            SeekOrigin::Begin => pos as i128,
            SeekOrigin::Current => self.offset as i128 + pos as i128,
            SeekOrigin::End => len - pos as i128,
        };
        if target < 0 || target > len {
            return Err(RelicError::SeekOutOfRange {
                target: target.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                length: self.buf.len() as u64,
            });
        }
        self.offset = target as usize;
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        Ok(self.offset as u64)
    }

    fn length(&self) -> Result<u64> {
        Ok(self.buf.len() as u64)
    }
}
