//! The polymorphic base for structured record types.
//!
//! A record is an ordered sequence of fields (plain scalars, nested
//! records, or typed field wrappers) serialized in declaration order
//! against the stream contract. The wire format has no field tags, so order
//! *is* the format: a `read` or `write` body must touch fields in exactly
//! the order they are declared.
//!
//! Bodies are hand-written or emitted by an external generation step. Either
//! way they can be driven by a declaration table: [`FieldSpec`] entries are
//! pure metadata (no payload state) that double as a machine-consumable
//! specification of the layout: the generator inspects them to emit
//! per-field calls, a hand-written body can consult them to skip or size
//! fields it does not care about.

use crate::error::Result;
use crate::stream::{Endian, Extent, SeekOrigin, StreamReader, StreamWriter};

/// The per-record marshaling obligation.
///
/// Implementations must populate or emit every field in declaration order; a
/// `write` followed by a `read` into a fresh instance reproduces an
/// equivalent value for every field. A record never owns a stream; it
/// borrows one for the duration of the call.
pub trait Record {
    /// Populates all fields from the stream in declaration order.
    fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()>;

    /// Serializes all fields to the stream in declaration order.
    fn write(&self, writer: &mut dyn StreamWriter) -> Result<()>;

    /// The record's declared field table, when one is exposed.
    ///
    /// Defaults to the empty table; records with generated or
    /// layout-checked bodies override this.
    fn layout() -> &'static [FieldSpec]
    where
        Self: Sized,
    {
        &[]
    }

    /// Reads a fresh instance from the stream.
    fn from_stream(reader: &mut dyn StreamReader) -> Result<Self>
    where
        Self: Default + Sized,
    {
        let mut record = Self::default();
        record.read(reader)?;
        Ok(record)
    }
}

/// The kind of one declared field: the typed-alias vocabulary a record uses
/// to mark a field's on-disk encoding.
///
/// `endian: None` means "the record's declared byte order" (whatever the
/// stream is set to when the field is reached); `Some(e)` declares a
/// per-field override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A plain scalar of `size` bytes.
    Value {
        /// Encoded width in bytes.
        size: usize,
        /// Per-field byte order override.
        endian: Option<Endian>,
    },
    /// A fixed-count sequence of scalars.
    Vector {
        /// Encoded width of one element in bytes.
        elem_size: usize,
        /// Number of elements.
        count: usize,
        /// Per-field byte order override.
        endian: Option<Endian>,
    },
    /// A fixed-size raw byte buffer.
    Buffer {
        /// Buffer size in bytes.
        size: usize,
    },
    /// A narrow string.
    Str {
        /// Size descriptor in bytes.
        extent: Extent,
    },
    /// A wide string with its own byte order.
    WStr {
        /// Size descriptor in code units.
        extent: Extent,
        /// Per-field byte order override.
        endian: Option<Endian>,
    },
    /// Wide-encoded text materialized narrow in memory.
    WStrAsStr {
        /// Size descriptor in code units.
        extent: Extent,
    },
    /// A stream-position adjustment before or after a field.
    Seek {
        /// Seek distance.
        offset: i64,
        /// Seek reference point.
        origin: SeekOrigin,
    },
    /// An alignment pad: advance to the next multiple of `boundary` bytes.
    Align {
        /// Alignment boundary in bytes.
        boundary: usize,
    },
}

impl FieldKind {
    /// The statically-known on-disk extent of this field in bytes, or `None`
    /// when the extent depends on the data (variable strings) or on the
    /// stream position (seeks and alignment pads).
    pub fn wire_size(&self) -> Option<u64> {
        match *self {
            Self::Value { size, .. } => Some(size as u64),
            Self::Vector {
                elem_size, count, ..
            } => Some((elem_size * count) as u64),
            Self::Buffer { size } => Some(size as u64),
            Self::Str {
                extent: Extent::Fixed(n),
            } => Some(n as u64),
            Self::WStr {
                extent: Extent::Fixed(n),
                ..
            }
            | Self::WStrAsStr {
                extent: Extent::Fixed(n),
            } => Some(2 * n as u64),
            Self::Str {
                extent: Extent::Variable,
            }
            | Self::WStr {
                extent: Extent::Variable,
                ..
            }
            | Self::WStrAsStr {
                extent: Extent::Variable,
            } => None,
            Self::Seek { .. } | Self::Align { .. } => None,
        }
    }
}

/// One entry of a record's declared field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, for diagnostics and generated code.
    pub name: &'static str,
    /// The field's on-disk encoding.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Advances the reader past the field this entry declares without
    /// materializing it.
    ///
    /// Fixed extents seek; variable strings are read and discarded (the
    /// terminator position is data-dependent); `Seek` and `Align` apply
    /// their adjustment. Skipping never alters the stream's endianness,
    /// even for fields that would override it when actually read.
    pub fn skip(&self, reader: &mut dyn StreamReader) -> Result<()> {
        match self.kind {
            FieldKind::Value { size, .. } | FieldKind::Buffer { size } => {
                reader.seek(size as i64, SeekOrigin::Current)
            }
            FieldKind::Vector {
                elem_size, count, ..
            } => reader.seek((elem_size * count) as i64, SeekOrigin::Current),
            FieldKind::Str { extent } => match extent {
                Extent::Fixed(n) => reader.seek(n as i64, SeekOrigin::Current),
                // Consume raw bytes up to the terminator; skipped content is
                // never decoded.
                Extent::Variable => loop {
                    let mut byte = [0u8; 1];
                    if reader.read_bytes(&mut byte)? == 0 || byte[0] == 0 {
                        break Ok(());
                    }
                },
            },
            FieldKind::WStr { extent, .. } | FieldKind::WStrAsStr { extent } => match extent {
                Extent::Fixed(n) => reader.seek((2 * n) as i64, SeekOrigin::Current),
                Extent::Variable => loop {
                    let mut unit = [0u8; 2];
                    let n = reader.read_bytes(&mut unit)?;
                    if n < 2 || unit == [0, 0] {
                        break Ok(());
                    }
                },
            },
            FieldKind::Seek { offset, origin } => reader.seek(offset, origin),
            FieldKind::Align { boundary } => reader.align_to(boundary),
        }
    }
}

/// The statically-known on-disk size of a whole field table, or `None` if
/// any entry is variable or position-dependent.
pub fn layout_size(layout: &[FieldSpec]) -> Option<u64> {
    layout
        .iter()
        .map(|f| f.kind.wire_size())
        .try_fold(0u64, |acc, s| s.map(|s| acc + s))
}
