//! The block-cached file-backed stream.
//!
//! Structured-format readers issue many small, clustered reads near the same
//! file offset, a record's fields one after another. [`FileReader`] can
//! keep a single fixed-size block of the file cached in memory, turning a
//! run of small reads into one file I/O per block instead of one per read.
//! The cost is re-reading a block when the access pattern jumps around; this
//! is an explicit trade-off, not a general-purpose multi-block cache.
//!
//! Buffered and unbuffered modes are observationally identical: reading any
//! byte range through any block size yields the same bytes as reading it
//! with caching disabled.
//!
//! ```rust,no_run
//! use relic::{ErrorPolicy, FileReader, StreamReader};
//!
//! // A required asset: any stream failure is fatal.
//! let mut stream = FileReader::open_with("assets/world.pak", 8192, ErrorPolicy::Fatal)?;
//! let version = stream.read_u32()?;
//! assert!(version >= 1);
//! # Ok::<(), relic::RelicError>(())
//! ```

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_BLOCK_SIZE;
use crate::error::{ErrorPolicy, RelicError, Result};
use crate::stream::{Endian, SeekOrigin, StreamReader};

/// A read-only binary file stream with an optional single-block cache.
///
/// States: *closed*, *open-unbuffered* (block size 0, every read is a
/// pass-through), *open-buffered* (block size > 0, at most one block cached
/// at a time). The file's total length is captured at open time and treated
/// as immutable for the stream's lifetime.
///
/// The stream carries a sticky error flag alongside `Result` propagation:
/// after any failed operation [`has_error`](FileReader::has_error) reports
/// `true` until [`clear_error`](FileReader::clear_error). Streams opened
/// with [`ErrorPolicy::Fatal`] instead escalate every failure into a logged
/// panic: the fail-loud policy for an asset the caller asserted must exist.
#[derive(Debug)]
pub struct FileReader {
    path: PathBuf,
    file: Option<File>,
    file_size: u64,
    /// Logical offset; authoritative in buffered mode.
    offset: u64,
    /// 0 = unbuffered pass-through.
    block_size: usize,
    cache: Box<[u8]>,
    /// `None` until the first refill.
    cur_block: Option<u64>,
    refills: u64,
    endian: Endian,
    policy: ErrorPolicy,
    has_error: bool,
}

impl FileReader {
    /// Opens `path` unbuffered with the default [`ErrorPolicy::Propagate`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, 0, ErrorPolicy::default())
    }

    /// Opens `path` with the default block size and error policy.
    pub fn open_buffered<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DEFAULT_BLOCK_SIZE, ErrorPolicy::default())
    }

    /// Opens `path` for binary reading with an explicit cache size and
    /// error policy.
    ///
    /// `cache_size` is clamped to the file length; 0 disables caching.
    pub fn open_with<P: AsRef<Path>>(
        path: P,
        cache_size: usize,
        policy: ErrorPolicy,
    ) -> Result<Self> {
        let mut stream = Self {
            path: path.as_ref().to_path_buf(),
            file: None,
            file_size: 0,
            offset: 0,
            block_size: 0,
            cache: Box::default(),
            cur_block: None,
            refills: 0,
            endian: Endian::default(),
            policy,
            has_error: false,
        };

        let file = match File::open(&stream.path) {
            Ok(f) => f,
            Err(e) => return Err(stream.fail(e.into())),
        };
        stream.file_size = match file.metadata() {
            Ok(m) => m.len(),
            Err(e) => return Err(stream.fail(e.into())),
        };
        stream.file = Some(file);
        stream.set_cache_size(cache_size)?;
        Ok(stream)
    }

    /// The path this stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the stream is open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Whether any operation has failed since the last
    /// [`clear_error`](FileReader::clear_error).
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// Clears the sticky error flag.
    pub fn clear_error(&mut self) {
        self.has_error = false;
    }

    /// The current cache block size; 0 when unbuffered.
    pub fn cache_size(&self) -> usize {
        self.block_size
    }

    /// How many times the cache block has been refilled from the file.
    pub fn cache_refills(&self) -> u64 {
        self.refills
    }

    /// Reconfigures the cache.
    ///
    /// `size` is clamped to the file's total length; the cached-block index
    /// resets to "none", so the next buffered read refills. Passing 0
    /// switches to unbuffered pass-through and re-synchronizes the OS file
    /// cursor with the logical offset.
    pub fn set_cache_size(&mut self, size: usize) -> Result<()> {
        if self.file.is_none() {
            return Err(self.fail(RelicError::NotOpen {
                operation: "set_cache_size",
            }));
        }
        let was_buffered = self.block_size > 0;
        if !was_buffered {
            // Adopt the OS cursor as the logical offset before switching.
            self.offset = match self.os_position() {
                Ok(p) => p,
                Err(e) => return Err(self.fail(e)),
            };
        }

        let clamped = (size as u64).min(self.file_size) as usize;
        self.block_size = clamped;
        self.cur_block = None;
        if clamped > 0 {
            self.cache = vec![0u8; clamped].into_boxed_slice();
        } else {
            self.cache = Box::default();
            let res = {
                let Some(file) = self.file.as_mut() else {
                    return Err(RelicError::NotOpen {
                        operation: "set_cache_size",
                    });
                };
                file.seek(SeekFrom::Start(self.offset))
            };
            if let Err(e) = res {
                return Err(self.fail(e.into()));
            }
        }
        Ok(())
    }

    /// Closes the stream. Closing an unopened stream is an error.
    pub fn close(&mut self) -> Result<()> {
        if self.file.is_none() {
            return Err(self.fail(RelicError::NotOpen { operation: "close" }));
        }
        self.file = None;
        Ok(())
    }

    fn os_position(&self) -> Result<u64> {
        let Some(file) = self.file.as_ref() else {
            return Err(RelicError::NotOpen {
                operation: "position",
            });
        };
        let mut handle = file;
        handle.stream_position().map_err(RelicError::from)
    }

    fn read_direct(&mut self, dst: &mut [u8]) -> Result<usize> {
        // Loop so the transfer is only short at true end-of-file.
        let mut total = 0;
        while total < dst.len() {
            let res = {
                let Some(file) = self.file.as_mut() else {
                    return Err(RelicError::NotOpen { operation: "read" });
                };
                file.read(&mut dst[total..])
            };
            match res {
                Ok(0) => break,
                Ok(n) => total += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.fail(e.into())),
            }
        }
        Ok(total)
    }

    /// One file seek + one block read.
    fn refill(&mut self, block: u64) -> io::Result<()> {
        let start = block * self.block_size as u64;
        let Some(file) = self.file.as_mut() else {
            return Err(io::Error::other("stream closed"));
        };
        file.seek(SeekFrom::Start(start))?;
        let mut filled = 0;
        while filled < self.cache.len() {
            match file.read(&mut self.cache[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        self.cur_block = Some(block);
        self.refills += 1;
        Ok(())
    }

    /// Marks the sticky flag, escalates under `Fatal`, and hands the error
    /// back for propagation.
    fn fail(&mut self, err: RelicError) -> RelicError {
        self.has_error = true;
        self.escalate(&err);
        err
    }

    /// The fail-loud half of the dual error policy.
    #[allow(clippy::panic)]
    fn escalate(&self, err: &RelicError) {
        if self.policy == ErrorPolicy::Fatal {
            log::error!("fatal stream error on '{}': {err}", self.path.display());
            panic!("fatal stream error on '{}': {err}", self.path.display());
        }
    }

    /// Escalation without the sticky flag, for `&self` accessors.
    fn report(&self, err: RelicError) -> RelicError {
        self.escalate(&err);
        err
    }
}

impl StreamReader for FileReader {
    fn endian(&self) -> Endian {
        self.endian
    }

    fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<usize> {
        if self.file.is_none() {
            return Err(self.fail(RelicError::NotOpen { operation: "read" }));
        }
        if self.block_size == 0 {
            return self.read_direct(dst);
        }

        if self.offset >= self.file_size {
            return Ok(0);
        }
        // Clamp so the read never crosses the file's true end.
        let len = (dst.len() as u64).min(self.file_size - self.offset) as usize;

        let bs = self.block_size as u64;
        let mut copied = 0;
        let mut block = self.offset / bs;
        let mut cache_off = (self.offset % bs) as usize;
        while copied < len {
            if self.cur_block != Some(block) {
                if let Err(e) = self.refill(block) {
                    return Err(self.fail(e.into()));
                }
            }
            let take = (len - copied).min(self.block_size - cache_off);
            dst[copied..copied + take].copy_from_slice(&self.cache[cache_off..cache_off + take]);
            copied += take;
            cache_off = 0;
            block += 1;
        }
        self.offset += len as u64;
        Ok(len)
    }

    fn seek(&mut self, pos: i64, origin: SeekOrigin) -> Result<()> {
        if self.file.is_none() {
            return Err(self.fail(RelicError::NotOpen { operation: "seek" }));
        }
        let current = if self.block_size > 0 {
            self.offset
        } else {
            match self.os_position() {
                Ok(p) => p,
                Err(e) => return Err(self.fail(e)),
            }
        };
        let target: i128 = match origin {
            SeekOrigin::Begin => pos as i128,
            SeekOrigin::Current => current as i128 + pos as i128,
            SeekOrigin::End => self.file_size as i128 - pos as i128,
        };
        // Seeking exactly to end-of-file is valid; it lands a subsequent
        // zero-length read.
        if target < 0 || target > self.file_size as i128 {
            return Err(self.fail(RelicError::SeekOutOfRange {
                target: target.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
                length: self.file_size,
            }));
        }
        let target = target as u64;

        if self.block_size > 0 {
            // Only the logical offset moves; the cache refills lazily on the
            // next read if the target falls in a different block.
            self.offset = target;
        } else {
            let res = {
                let Some(file) = self.file.as_mut() else {
                    return Err(RelicError::NotOpen { operation: "seek" });
                };
                file.seek(SeekFrom::Start(target))
            };
            if let Err(e) = res {
                return Err(self.fail(e.into()));
            }
        }
        Ok(())
    }

    fn position(&self) -> Result<u64> {
        if self.file.is_none() {
            return Err(self.report(RelicError::NotOpen {
                operation: "position",
            }));
        }
        if self.block_size > 0 {
            Ok(self.offset)
        } else {
            self.os_position().map_err(|e| self.report(e))
        }
    }

    fn length(&self) -> Result<u64> {
        if self.file.is_none() {
            return Err(self.report(RelicError::NotOpen {
                operation: "length",
            }));
        }
        Ok(self.file_size)
    }
}
