//! Centralized error handling for Relic.
//!
//! All stream and marshaling failures are represented as [`RelicError`]
//! values propagated through the crate-wide [`Result`] alias; the library
//! itself never panics through the propagating path (enforced by
//! `#![deny(clippy::unwrap_used)]` and `#![deny(clippy::panic)]`).
//!
//! ## Design Philosophy
//!
//! 1. **Two escalation policies:** every file-backed stream is constructed
//!    with an [`ErrorPolicy`]. Under [`ErrorPolicy::Propagate`] a failure is
//!    returned to the caller, who inspects and decides: the right choice for
//!    optional or probed asset files. Under [`ErrorPolicy::Fatal`] the stream
//!    treats any failure as unrecoverable: the error is logged and the
//!    process is taken down, the right choice for an asset the caller
//!    asserted must exist.
//!
//! 2. **Cloneable Errors:** [`RelicError`] is `Clone`; the I/O variant wraps
//!    its `std::io::Error` in an `Arc` so errors can be stored or re-reported
//!    without copying.
//!
//! 3. **Error Chaining:** the underlying cause is preserved through
//!    `source()` where one exists.
//!
//! ## Usage
//!
//! ```rust
//! use relic::{MemoryReader, RelicError, StreamReader};
//!
//! let mut reader = MemoryReader::new(vec![0xAB]);
//! match reader.read_u32() {
//!     Err(RelicError::ShortRead { requested, read }) => {
//!         assert_eq!((requested, read), (4, 1));
//!     }
//!     other => panic!("expected a short read, got {other:?}"),
//! }
//! ```

use std::fmt;
use std::io;
use std::sync::Arc;

/// A specialized `Result` type for Relic operations.
pub type Result<T> = std::result::Result<T, RelicError>;

/// How a stream reacts to its own failures.
///
/// The policy is injected at stream construction and applies to every
/// operation on that instance. It renders the "required asset vs. probed
/// asset" split: a loader that cannot continue without a file opens it
/// `Fatal`; a loader probing for optional content opens it `Propagate` and
/// inspects the returned errors (or the stream's sticky error flag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Return errors to the caller and set the stream's sticky error flag.
    #[default]
    Propagate,
    /// Log the error and abort execution at the failure site.
    Fatal,
}

/// The master error enum covering all failure domains in Relic.
///
/// ## Variants
///
/// - **Io:** low-level file system failures (file missing, permissions, ...)
/// - **NotOpen:** an operation was issued against a closed stream
/// - **SeekOutOfRange:** a seek target fell outside the medium
/// - **ShortRead:** fewer bytes were available than a typed read required
/// - **Size:** a fixed-extent field's payload does not match its extent
/// - **Encoding:** narrow text on the wire was not valid UTF-8
/// - **Compression:** the compression seam reported a failure
#[derive(Debug, Clone)]
pub enum RelicError {
    /// Low-level I/O failure, wrapped in an `Arc` to keep the error `Clone`.
    Io(Arc<io::Error>),

    /// The stream is not open for the named operation.
    ///
    /// Raised both for reads/seeks on a closed stream and for closing a
    /// stream that was never opened.
    NotOpen {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// A seek computed a target offset outside `0..=length`.
    SeekOutOfRange {
        /// The computed target offset.
        target: i64,
        /// Total length of the medium.
        length: u64,
    },

    /// A typed read needed more bytes than the medium had left.
    ///
    /// Raw [`read_bytes`](crate::StreamReader::read_bytes) never produces
    /// this: it reports a short transfer through its return count. The typed
    /// primitives and [`BufferField`](crate::BufferField) convert a short
    /// transfer into this error because a partially-filled scalar or buffer
    /// is never meaningful.
    ShortRead {
        /// Bytes the operation required.
        requested: u64,
        /// Bytes actually obtained.
        read: u64,
    },

    /// A fixed-extent field was asked to write a payload of the wrong length.
    Size {
        /// The field's declared extent in bytes.
        expected: u64,
        /// The payload's actual length in bytes.
        actual: u64,
    },

    /// Narrow text read from the wire was not valid UTF-8.
    Encoding(String),

    /// Compression or decompression failed in the seam.
    Compression(String),
}

impl fmt::Display for RelicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotOpen { operation } => {
                write!(f, "stream not open for {operation}")
            }
            Self::SeekOutOfRange { target, length } => {
                write!(f, "seek target {target} outside stream of length {length}")
            }
            Self::ShortRead { requested, read } => {
                write!(f, "short read: requested {requested} bytes, got {read}")
            }
            Self::Size { expected, actual } => {
                write!(f, "payload length {actual} does not match fixed extent {expected}")
            }
            Self::Encoding(s) => write!(f, "encoding error: {s}"),
            Self::Compression(s) => write!(f, "compression error: {s}"),
        }
    }
}

impl std::error::Error for RelicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for RelicError {
    fn from(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}
