//! Self-serializing typed field wrappers.
//!
//! Each wrapper is a plain value (it holds its payload, compares like it,
//! derefs to it) and separately knows how to marshal itself against the
//! stream contract, parameterized by an [`Extent`] and, for
//! [`WStringField`], a per-field byte order. Record bodies treat every
//! field, scalar or composite, uniformly as "has read/write".
//!
//! ```rust
//! use relic::{MemoryReader, MemoryWriter, StringField};
//!
//! let mut name = StringField::fixed(8);
//! name.set("HERO");
//!
//! let mut out = MemoryWriter::new();
//! name.write(&mut out)?;
//! assert_eq!(out.data().len(), 8); // zero-padded to the extent
//!
//! let mut back = StringField::fixed(8);
//! back.read(&mut MemoryReader::new(out.into_inner()))?;
//! assert_eq!(back, name);
//! # Ok::<(), relic::RelicError>(())
//! ```

use std::ops::Deref;

use crate::error::{RelicError, Result};
use crate::stream::{Endian, Extent, StreamReader, StreamWriter};

/// A fixed-size raw byte payload.
///
/// A read allocates exactly the declared number of bytes and fills them from
/// the stream; exhausting the stream first leaves the payload partially
/// filled and surfaces [`RelicError::ShortRead`]. A write emits the payload
/// verbatim and insists the payload length still matches the declared size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferField {
    size: usize,
    data: Vec<u8>,
}

impl BufferField {
    /// A zero-filled buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            data: vec![0u8; size],
        }
    }

    /// A buffer whose declared size is taken from `data`.
    pub fn with_value(data: Vec<u8>) -> Self {
        Self {
            size: data.len(),
            data,
        }
    }

    /// The declared on-disk size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the payload bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Replaces the payload in full. The replacement must match the declared
    /// size, else [`RelicError::Size`].
    pub fn set(&mut self, data: Vec<u8>) -> Result<()> {
        if data.len() != self.size {
            return Err(RelicError::Size {
                expected: self.size as u64,
                actual: data.len() as u64,
            });
        }
        self.data = data;
        Ok(())
    }

    /// Fills the payload with exactly `size` bytes from the stream.
    pub fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.data = vec![0u8; self.size];
        reader.read_exact(&mut self.data)
    }

    /// Emits the payload verbatim.
    pub fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        if self.data.len() != self.size {
            return Err(RelicError::Size {
                expected: self.size as u64,
                actual: self.data.len() as u64,
            });
        }
        writer.write_bytes(&self.data)
    }
}

impl Deref for BufferField {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialEq<[u8]> for BufferField {
    fn eq(&self, other: &[u8]) -> bool {
        self.data == other
    }
}

impl PartialEq<&[u8]> for BufferField {
    fn eq(&self, other: &&[u8]) -> bool {
        self.data == *other
    }
}

/// A narrow string with a fixed or terminator-delimited extent.
///
/// Follows the stream's narrow-string convention: a fixed extent occupies
/// exactly that many bytes on disk (truncating on read, zero-padding on
/// write at the boundary); the variable extent is NUL-terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringField {
    extent: Extent,
    value: String,
}

impl StringField {
    /// A string field occupying exactly `n` bytes on disk.
    pub fn fixed(n: usize) -> Self {
        Self {
            extent: Extent::Fixed(n),
            value: String::new(),
        }
    }

    /// A NUL-terminated string field.
    pub fn variable() -> Self {
        Self {
            extent: Extent::Variable,
            value: String::new(),
        }
    }

    /// The field's size descriptor.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The in-memory value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value in full (no partial append semantics).
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Reads the value per the field's extent.
    pub fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.value = reader.read_string(self.extent)?;
        Ok(())
    }

    /// Writes the value per the field's extent.
    pub fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_string(&self.value, self.extent)
    }
}

impl Deref for StringField {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for StringField {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for StringField {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

/// A wide (UTF-16 code unit) string with its own byte order.
///
/// Forces the stream's endianness to the field's configured endianness
/// before each read or write and leaves it there; the caller restores the
/// order if subsequent fields need a different one. This is a deliberate
/// per-field override permitting mixed-endian records, not a record-wide
/// setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WStringField {
    extent: Extent,
    endian: Endian,
    value: Vec<u16>,
}

impl WStringField {
    /// A wide string occupying exactly `n` code units on disk.
    pub fn fixed(n: usize, endian: Endian) -> Self {
        Self {
            extent: Extent::Fixed(n),
            endian,
            value: Vec::new(),
        }
    }

    /// A zero-terminated wide string.
    pub fn variable(endian: Endian) -> Self {
        Self {
            extent: Extent::Variable,
            endian,
            value: Vec::new(),
        }
    }

    /// The field's size descriptor, counted in code units.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The field's configured byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The raw code units.
    pub fn units(&self) -> &[u16] {
        &self.value
    }

    /// Replaces the code units in full.
    pub fn set_units(&mut self, units: Vec<u16>) {
        self.value = units;
    }

    /// Replaces the value with the UTF-16 encoding of `s`.
    pub fn set(&mut self, s: &str) {
        self.value = s.encode_utf16().collect();
    }

    /// Decodes the code units as UTF-16.
    pub fn decode(&self) -> Result<String> {
        String::from_utf16(&self.value).map_err(|e| RelicError::Encoding(e.to_string()))
    }

    /// Reads the value, first switching the stream to this field's byte
    /// order.
    pub fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        reader.set_endian(self.endian);
        self.value = reader.read_wide_string(self.extent)?;
        Ok(())
    }

    /// Writes the value, first switching the stream to this field's byte
    /// order.
    pub fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.set_endian(self.endian);
        writer.write_wide_string(&self.value, self.extent)
    }
}

impl Deref for WStringField {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.value
    }
}

/// Wide-encoded text materialized as a narrow string in memory.
///
/// Reads perform a code-unit narrowing conversion (`u16 as u8`), writes the
/// widening inverse. Exists because many legacy formats store UTF-16-ish
/// text but callers prefer narrow strings in memory. Unlike
/// [`WStringField`] this wrapper does not touch the stream's endianness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WStringAsStringField {
    extent: Extent,
    value: String,
}

impl WStringAsStringField {
    /// A field occupying exactly `n` code units on disk.
    pub fn fixed(n: usize) -> Self {
        Self {
            extent: Extent::Fixed(n),
            value: String::new(),
        }
    }

    /// A zero-terminated field.
    pub fn variable() -> Self {
        Self {
            extent: Extent::Variable,
            value: String::new(),
        }
    }

    /// The field's size descriptor, counted in code units.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The in-memory narrow value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value in full.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Reads wide units and narrows them into the value.
    pub fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.value = reader.read_wide_string_as_string(self.extent)?;
        Ok(())
    }

    /// Widens the value back to wide units and writes them.
    pub fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_string_as_wide_string(&self.value, self.extent)
    }
}

impl Deref for WStringAsStringField {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for WStringAsStringField {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for WStringAsStringField {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}
