//! The stream contract: the capability set every byte source or sink
//! implements, plus the endianness state typed reads and writes consult.
//!
//! Byte order is *stream state*, not a per-call parameter: a run of fields
//! sharing one byte order pays for the choice once, and a field that needs a
//! different order sets it explicitly (and its caller restores it). The
//! typed primitives ([`StreamReader::read_u32`],
//! [`StreamWriter::write_f64`], the string conventions, ...) are provided
//! methods layered over the three raw capabilities (endianness, byte
//! transfer, and positioning), so a concrete stream only implements those.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{RelicError, Result};

/// Byte order used to encode multi-byte scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// Most-significant byte first.
    Big,
    /// Least-significant byte first.
    #[default]
    Little,
}

impl Endian {
    pub(crate) fn get_u16(self, buf: &[u8]) -> u16 {
        match self {
            Self::Big => BigEndian::read_u16(buf),
            Self::Little => LittleEndian::read_u16(buf),
        }
    }

    pub(crate) fn get_u32(self, buf: &[u8]) -> u32 {
        match self {
            Self::Big => BigEndian::read_u32(buf),
            Self::Little => LittleEndian::read_u32(buf),
        }
    }

    pub(crate) fn get_u64(self, buf: &[u8]) -> u64 {
        match self {
            Self::Big => BigEndian::read_u64(buf),
            Self::Little => LittleEndian::read_u64(buf),
        }
    }

    pub(crate) fn get_f32(self, buf: &[u8]) -> f32 {
        match self {
            Self::Big => BigEndian::read_f32(buf),
            Self::Little => LittleEndian::read_f32(buf),
        }
    }

    pub(crate) fn get_f64(self, buf: &[u8]) -> f64 {
        match self {
            Self::Big => BigEndian::read_f64(buf),
            Self::Little => LittleEndian::read_f64(buf),
        }
    }

    pub(crate) fn put_u16(self, buf: &mut [u8], v: u16) {
        match self {
            Self::Big => BigEndian::write_u16(buf, v),
            Self::Little => LittleEndian::write_u16(buf, v),
        }
    }

    pub(crate) fn put_u32(self, buf: &mut [u8], v: u32) {
        match self {
            Self::Big => BigEndian::write_u32(buf, v),
            Self::Little => LittleEndian::write_u32(buf, v),
        }
    }

    pub(crate) fn put_u64(self, buf: &mut [u8], v: u64) {
        match self {
            Self::Big => BigEndian::write_u64(buf, v),
            Self::Little => LittleEndian::write_u64(buf, v),
        }
    }

    pub(crate) fn put_f32(self, buf: &mut [u8], v: f32) {
        match self {
            Self::Big => BigEndian::write_f32(buf, v),
            Self::Little => LittleEndian::write_f32(buf, v),
        }
    }

    pub(crate) fn put_f64(self, buf: &mut [u8], v: f64) {
        match self {
            Self::Big => BigEndian::write_f64(buf, v),
            Self::Little => LittleEndian::write_f64(buf, v),
        }
    }
}

/// Reference point for a [`seek`](StreamReader::seek).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset from the start of the medium.
    Begin,
    /// Offset relative to the current position.
    Current,
    /// Offset stepping back from the end: `End` with `pos` lands at
    /// `length - pos`.
    End,
}

/// Size descriptor of a string or wide-string field.
///
/// `Variable` is the sentinel meaning "length is not fixed; determine it
/// from the data itself"; in the conventions of this crate, a NUL
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Exactly this many narrow bytes (or wide code units).
    Fixed(usize),
    /// Terminator-delimited.
    Variable,
}

/// The read half of the stream contract.
///
/// Implementors supply endianness state, raw byte transfer, and positioning;
/// everything else (endian-aware scalars, string conventions, alignment)
/// is layered on top as provided methods. Record bodies call these provided
/// primitives in field declaration order, because the wire format has no
/// field tags: order *is* the format.
///
/// `read_bytes` is the only transfer primitive and it never reads past the
/// end of the medium; exhaustion reports `Ok(0)` rather than blocking or
/// failing. The typed primitives convert a short transfer into
/// [`RelicError::ShortRead`].
pub trait StreamReader {
    /// Current byte order for multi-byte reads.
    fn endian(&self) -> Endian;

    /// Sets the byte order for subsequent multi-byte reads.
    ///
    /// The setting is sticky; a caller needing a one-off order must set it
    /// and restore it explicitly.
    fn set_endian(&mut self, endian: Endian);

    /// Transfers up to `dst.len()` bytes into `dst`, returning the count
    /// actually transferred. Returns `Ok(0)` at end-of-data.
    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<usize>;

    /// Moves the logical position. Targets outside `0..=length` are
    /// [`RelicError::SeekOutOfRange`]; seeking exactly to the end is valid
    /// and lands a subsequent zero-length read.
    fn seek(&mut self, pos: i64, origin: SeekOrigin) -> Result<()>;

    /// Current logical offset from the start of the medium.
    fn position(&self) -> Result<u64>;

    /// Total length of the medium.
    fn length(&self) -> Result<u64>;

    /// Fills `dst` completely or fails with [`RelicError::ShortRead`].
    fn read_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        let n = self.read_bytes(dst)?;
        if n < dst.len() {
            return Err(RelicError::ShortRead {
                requested: dst.len() as u64,
                read: n as u64,
            });
        }
        Ok(())
    }

    /// Advances to the next multiple of `boundary` bytes; no-op when already
    /// aligned or when `boundary < 2`.
    fn align_to(&mut self, boundary: usize) -> Result<()> {
        if boundary < 2 {
            return Ok(());
        }
        let pos = self.position()?;
        let rem = pos % boundary as u64;
        if rem != 0 {
            self.seek((boundary as u64 - rem) as i64, SeekOrigin::Current)?;
        }
        Ok(())
    }

    /// Reads one byte.
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads one signed byte.
    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Reads one byte, interpreting any non-zero value as `true`.
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a `u16` in the stream's current byte order.
    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(self.endian().get_u16(&buf))
    }

    /// Reads an `i16` in the stream's current byte order.
    fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads a `u32` in the stream's current byte order.
    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(self.endian().get_u32(&buf))
    }

    /// Reads an `i32` in the stream's current byte order.
    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a `u64` in the stream's current byte order.
    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(self.endian().get_u64(&buf))
    }

    /// Reads an `i64` in the stream's current byte order.
    fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reads an `f32` in the stream's current byte order.
    fn read_f32(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(self.endian().get_f32(&buf))
    }

    /// Reads an `f64` in the stream's current byte order.
    fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(self.endian().get_f64(&buf))
    }

    /// Reads a narrow string.
    ///
    /// `Extent::Variable` reads up to a NUL terminator (consumed) or the end
    /// of the data. `Extent::Fixed(n)` consumes exactly `n` bytes and
    /// truncates the value at the first NUL; fewer than `n` bytes available
    /// is a [`RelicError::ShortRead`].
    fn read_string(&mut self, extent: Extent) -> Result<String> {
        let bytes = match extent {
            Extent::Fixed(n) => {
                let mut buf = vec![0u8; n];
                self.read_exact(&mut buf)?;
                let end = buf.iter().position(|&b| b == 0).unwrap_or(n);
                buf.truncate(end);
                buf
            }
            Extent::Variable => {
                let mut buf = Vec::new();
                let mut byte = [0u8; 1];
                loop {
                    if self.read_bytes(&mut byte)? == 0 || byte[0] == 0 {
                        break;
                    }
                    buf.push(byte[0]);
                }
                buf
            }
        };
        String::from_utf8(bytes).map_err(|e| RelicError::Encoding(e.to_string()))
    }

    /// Reads a wide string as raw UTF-16 code units in the stream's current
    /// byte order.
    ///
    /// `Extent::Fixed(n)` counts code units, not bytes, and truncates the
    /// value at the first zero unit; `Extent::Variable` reads up to a zero
    /// unit (consumed) or the end of the data.
    fn read_wide_string(&mut self, extent: Extent) -> Result<Vec<u16>> {
        match extent {
            Extent::Fixed(n) => {
                let mut units = Vec::with_capacity(n);
                let mut terminated = false;
                for _ in 0..n {
                    let unit = self.read_u16()?;
                    if unit == 0 {
                        terminated = true;
                    }
                    if !terminated {
                        units.push(unit);
                    }
                }
                Ok(units)
            }
            Extent::Variable => {
                let mut units = Vec::new();
                let mut buf = [0u8; 2];
                loop {
                    let n = self.read_bytes(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    if n < 2 {
                        return Err(RelicError::ShortRead {
                            requested: 2,
                            read: n as u64,
                        });
                    }
                    let unit = self.endian().get_u16(&buf);
                    if unit == 0 {
                        break;
                    }
                    units.push(unit);
                }
                Ok(units)
            }
        }
    }

    /// Reads wide-encoded text but materializes it as a narrow string,
    /// narrowing each code unit (`u16 as u8`).
    ///
    /// Many legacy formats store UTF-16-ish text whose repertoire fits in a
    /// byte; callers that know this prefer narrow strings in memory.
    fn read_wide_string_as_string(&mut self, extent: Extent) -> Result<String> {
        let units = self.read_wide_string(extent)?;
        let bytes: Vec<u8> = units.iter().map(|&u| u as u8).collect();
        String::from_utf8(bytes).map_err(|e| RelicError::Encoding(e.to_string()))
    }
}

/// The write half of the stream contract.
///
/// The mirror of [`StreamReader`]: implementors supply endianness state, raw
/// byte transfer, and positioning; typed scalars and string conventions are
/// provided on top. `write_bytes` extends the medium when the sink supports
/// growth.
pub trait StreamWriter {
    /// Current byte order for multi-byte writes.
    fn endian(&self) -> Endian;

    /// Sets the byte order for subsequent multi-byte writes. Sticky, as on
    /// the read side.
    fn set_endian(&mut self, endian: Endian);

    /// Transfers all of `src` into the medium, extending it if the sink
    /// supports growth.
    fn write_bytes(&mut self, src: &[u8]) -> Result<()>;

    /// Moves the logical position; same bounds rules as the read side.
    fn seek(&mut self, pos: i64, origin: SeekOrigin) -> Result<()>;

    /// Current logical offset from the start of the medium.
    fn position(&self) -> Result<u64>;

    /// Total length of the medium.
    fn length(&self) -> Result<u64>;

    /// Zero-pads to the next multiple of `boundary` bytes; no-op when
    /// already aligned or when `boundary < 2`.
    fn align_to(&mut self, boundary: usize) -> Result<()> {
        if boundary < 2 {
            return Ok(());
        }
        let pos = self.position()?;
        let rem = (pos % boundary as u64) as usize;
        if rem != 0 {
            let pad = vec![0u8; boundary - rem];
            self.write_bytes(&pad)?;
        }
        Ok(())
    }

    /// Writes one byte.
    fn write_u8(&mut self, v: u8) -> Result<()> {
        self.write_bytes(&[v])
    }

    /// Writes one signed byte.
    fn write_i8(&mut self, v: i8) -> Result<()> {
        self.write_u8(v as u8)
    }

    /// Writes a bool as one byte, `true` as 1.
    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(u8::from(v))
    }

    /// Writes a `u16` in the stream's current byte order.
    fn write_u16(&mut self, v: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        self.endian().put_u16(&mut buf, v);
        self.write_bytes(&buf)
    }

    /// Writes an `i16` in the stream's current byte order.
    fn write_i16(&mut self, v: i16) -> Result<()> {
        self.write_u16(v as u16)
    }

    /// Writes a `u32` in the stream's current byte order.
    fn write_u32(&mut self, v: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        self.endian().put_u32(&mut buf, v);
        self.write_bytes(&buf)
    }

    /// Writes an `i32` in the stream's current byte order.
    fn write_i32(&mut self, v: i32) -> Result<()> {
        self.write_u32(v as u32)
    }

    /// Writes a `u64` in the stream's current byte order.
    fn write_u64(&mut self, v: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        self.endian().put_u64(&mut buf, v);
        self.write_bytes(&buf)
    }

    /// Writes an `i64` in the stream's current byte order.
    fn write_i64(&mut self, v: i64) -> Result<()> {
        self.write_u64(v as u64)
    }

    /// Writes an `f32` in the stream's current byte order.
    fn write_f32(&mut self, v: f32) -> Result<()> {
        let mut buf = [0u8; 4];
        self.endian().put_f32(&mut buf, v);
        self.write_bytes(&buf)
    }

    /// Writes an `f64` in the stream's current byte order.
    fn write_f64(&mut self, v: f64) -> Result<()> {
        let mut buf = [0u8; 8];
        self.endian().put_f64(&mut buf, v);
        self.write_bytes(&buf)
    }

    /// Writes a narrow string.
    ///
    /// `Extent::Fixed(n)` emits exactly `n` bytes, truncating a longer value
    /// at the boundary and zero-padding a shorter one. `Extent::Variable`
    /// emits the bytes followed by a NUL terminator.
    fn write_string(&mut self, s: &str, extent: Extent) -> Result<()> {
        let bytes = s.as_bytes();
        match extent {
            Extent::Fixed(n) => {
                let take = bytes.len().min(n);
                self.write_bytes(&bytes[..take])?;
                if take < n {
                    let pad = vec![0u8; n - take];
                    self.write_bytes(&pad)?;
                }
                Ok(())
            }
            Extent::Variable => {
                self.write_bytes(bytes)?;
                self.write_u8(0)
            }
        }
    }

    /// Writes a wide string from raw UTF-16 code units in the stream's
    /// current byte order; `Extent::Fixed(n)` counts code units.
    fn write_wide_string(&mut self, units: &[u16], extent: Extent) -> Result<()> {
        match extent {
            Extent::Fixed(n) => {
                let take = units.len().min(n);
                for &unit in &units[..take] {
                    self.write_u16(unit)?;
                }
                for _ in take..n {
                    self.write_u16(0)?;
                }
                Ok(())
            }
            Extent::Variable => {
                for &unit in units {
                    self.write_u16(unit)?;
                }
                self.write_u16(0)
            }
        }
    }

    /// Writes a narrow string as wide-encoded text, widening each byte
    /// (`u8 as u16`). The inverse of
    /// [`read_wide_string_as_string`](StreamReader::read_wide_string_as_string).
    fn write_string_as_wide_string(&mut self, s: &str, extent: Extent) -> Result<()> {
        let units: Vec<u16> = s.bytes().map(u16::from).collect();
        self.write_wide_string(&units, extent)
    }
}
