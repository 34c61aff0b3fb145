//! # Relic
//!
//! An endian-aware binary marshaling layer for structured game-asset file
//! formats: typed records read and written against byte streams, with
//! explicit per-field byte-order control and a declarative field-typing
//! vocabulary.
//!
//! ## Overview
//!
//! Legacy asset formats are positional: there are no field tags on the
//! wire, so the declaration order of a record's fields *is* the format.
//! Relic gives structure authors three layers to express that:
//!
//! *   **The stream contract** ([`StreamReader`]/[`StreamWriter`]): the
//!     minimal capability set every byte source or sink implements
//!     (endianness state, raw transfer, positioning) with every typed
//!     primitive (scalars of both byte orders, string conventions, wide
//!     strings, alignment) layered on top as provided methods.
//! *   **Typed field wrappers** ([`BufferField`], [`StringField`],
//!     [`WStringField`], [`WStringAsStringField`]): self-serializing
//!     values that know their own on-disk size descriptor and, where it
//!     matters, their own byte order. A record body treats every field
//!     uniformly as "has read/write".
//! *   **The record base** ([`Record`]): the per-record read/write
//!     obligation plus the [`FieldSpec`] declaration vocabulary that lets a
//!     field table double as a machine-consumable layout specification for
//!     an external code generator.
//!
//! Concrete streams come in two flavors: [`MemoryReader`]/[`MemoryWriter`]
//! over byte buffers, and [`FileReader`], a file-backed stream with an
//! optional single-block read cache that turns runs of small clustered
//! reads into one file I/O per block while behaving byte-identically to an
//! unbuffered stream.
//!
//! ## Usage
//!
//! ```rust
//! use relic::{MemoryReader, MemoryWriter, Record, Result};
//! use relic::{StreamReader, StreamWriter, StringField};
//!
//! struct ActorTag {
//!     name: StringField,
//!     hit_points: u16,
//! }
//!
//! impl ActorTag {
//!     fn new() -> Self {
//!         Self { name: StringField::fixed(4), hit_points: 0 }
//!     }
//! }
//!
//! impl Record for ActorTag {
//!     fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
//!         self.name.read(reader)?;
//!         self.hit_points = reader.read_u16()?;
//!         Ok(())
//!     }
//!
//!     fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
//!         self.name.write(writer)?;
//!         writer.write_u16(self.hit_points)
//!     }
//! }
//!
//! let mut tag = ActorTag::new();
//! tag.name.set("HERO");
//! tag.hit_points = 300;
//!
//! let mut out = MemoryWriter::new();
//! tag.write(&mut out)?;
//!
//! let mut back = ActorTag::new();
//! back.read(&mut MemoryReader::new(out.into_inner()))?;
//! assert_eq!(back.name, "HERO");
//! assert_eq!(back.hit_points, 300);
//! # Ok::<(), relic::RelicError>(())
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns the crate-wide [`Result`]; errors are
//! cloneable [`RelicError`] values. File streams additionally carry a
//! sticky error flag and a constructor-injected [`ErrorPolicy`] choosing
//! between propagate-and-inspect and fail-loud escalation. See [`error`].
//!
//! ## Safety
//!
//! *   No `unsafe` code (`#![deny(unsafe_code)]`).
//! *   No `unwrap()`/`expect()` in library code; the single `panic!` is the
//!     documented [`ErrorPolicy::Fatal`] escalation site.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod compression;
pub mod error;
pub mod fields;
pub mod file;
pub mod memory;
pub mod record;
pub mod stream;

pub use compression::{Compressor, NoCompression};
#[cfg(feature = "flate2")]
pub use compression::ZlibCompressor;

pub use error::{ErrorPolicy, RelicError, Result};
pub use fields::{BufferField, StringField, WStringAsStringField, WStringField};
pub use file::FileReader;
pub use memory::{MemoryReader, MemoryWriter};
pub use record::{FieldKind, FieldSpec, Record, layout_size};
pub use stream::{Endian, Extent, SeekOrigin, StreamReader, StreamWriter};

/// Constants used throughout the library.
pub mod constants {
    /// The default cache block size for buffered file streams.
    pub const DEFAULT_BLOCK_SIZE: usize = 8 * 1024;
}
