//! Contract tests for the in-memory streams: typed primitives, endianness
//! state, string conventions, positioning.

use relic::{
    Endian, Extent, MemoryReader, MemoryWriter, RelicError, Result, SeekOrigin, StreamReader,
    StreamWriter,
};

#[test]
fn typed_scalars_round_trip_both_endians() -> Result<()> {
    for endian in [Endian::Big, Endian::Little] {
        let mut w = MemoryWriter::with_endian(endian);
        w.write_u8(0xAB)?;
        w.write_i8(-5)?;
        w.write_bool(true)?;
        w.write_u16(0xBEEF)?;
        w.write_i16(-300)?;
        w.write_u32(0xDEAD_BEEF)?;
        w.write_i32(-70_000)?;
        w.write_u64(0x0123_4567_89AB_CDEF)?;
        w.write_i64(-1)?;
        w.write_f32(1.5)?;
        w.write_f64(-2.25)?;

        let mut r = MemoryReader::with_endian(w.into_inner(), endian);
        assert_eq!(r.read_u8()?, 0xAB);
        assert_eq!(r.read_i8()?, -5);
        assert!(r.read_bool()?);
        assert_eq!(r.read_u16()?, 0xBEEF);
        assert_eq!(r.read_i16()?, -300);
        assert_eq!(r.read_u32()?, 0xDEAD_BEEF);
        assert_eq!(r.read_i32()?, -70_000);
        assert_eq!(r.read_u64()?, 0x0123_4567_89AB_CDEF);
        assert_eq!(r.read_i64()?, -1);
        assert_eq!(r.read_f32()?, 1.5);
        assert_eq!(r.read_f64()?, -2.25);
        assert_eq!(r.position()?, r.length()?);
    }
    Ok(())
}

#[test]
fn endianness_is_sticky_stream_state() -> Result<()> {
    let mut w = MemoryWriter::with_endian(Endian::Big);
    w.write_u16(0x0102)?;
    w.set_endian(Endian::Little);
    w.write_u16(0x0304)?;
    // Big-endian bytes for the first value, little-endian for the second.
    assert_eq!(w.data(), &[0x01, 0x02, 0x04, 0x03][..]);

    let mut r = MemoryReader::with_endian(w.into_inner(), Endian::Big);
    assert_eq!(r.read_u16()?, 0x0102);
    // The order persists until changed; reading the second value with the
    // wrong order proves nothing was restored behind the caller's back.
    assert_eq!(r.read_u16()?, 0x0403);
    Ok(())
}

#[test]
fn short_typed_read_reports_counts() {
    let mut r = MemoryReader::new(vec![1, 2, 3]);
    match r.read_u32() {
        Err(RelicError::ShortRead { requested, read }) => {
            assert_eq!(requested, 4);
            assert_eq!(read, 3);
        }
        other => panic!("expected ShortRead, got {other:?}"),
    }
}

#[test]
fn read_bytes_truncates_at_end_of_data() -> Result<()> {
    let mut r = MemoryReader::new(vec![10, 20, 30, 40, 50]);
    let mut buf = [0u8; 8];
    assert_eq!(r.read_bytes(&mut buf)?, 5);
    assert_eq!(&buf[..5], &[10, 20, 30, 40, 50]);
    assert_eq!(r.position()?, 5);
    // Exhausted: zero bytes, no error.
    assert_eq!(r.read_bytes(&mut buf)?, 0);
    Ok(())
}

#[test]
fn seek_origins_and_bounds() -> Result<()> {
    let mut r = MemoryReader::new((0u8..10).collect());

    r.seek(4, SeekOrigin::Begin)?;
    assert_eq!(r.position()?, 4);
    r.seek(3, SeekOrigin::Current)?;
    assert_eq!(r.position()?, 7);
    r.seek(-5, SeekOrigin::Current)?;
    assert_eq!(r.position()?, 2);
    // End steps back from the end.
    r.seek(3, SeekOrigin::End)?;
    assert_eq!(r.position()?, 7);

    // Exactly end-of-data is a valid target and lands a zero-length read.
    r.seek(0, SeekOrigin::End)?;
    assert_eq!(r.position()?, 10);
    let mut buf = [0u8; 1];
    assert_eq!(r.read_bytes(&mut buf)?, 0);

    assert!(matches!(
        r.seek(11, SeekOrigin::Begin),
        Err(RelicError::SeekOutOfRange { target: 11, length: 10 })
    ));
    r.seek(0, SeekOrigin::Begin)?;
    assert!(matches!(
        r.seek(-1, SeekOrigin::Current),
        Err(RelicError::SeekOutOfRange { target: -1, .. })
    ));
    Ok(())
}

#[test]
fn writer_overwrites_then_extends() -> Result<()> {
    let mut w = MemoryWriter::new();
    w.write_bytes(&[1, 2, 3, 4])?;
    w.seek(2, SeekOrigin::Begin)?;
    // Spans the existing tail and grows past it.
    w.write_bytes(&[9, 9, 9])?;
    assert_eq!(w.data(), &[1, 2, 9, 9, 9][..]);
    assert_eq!(w.position()?, 5);
    assert_eq!(w.length()?, 5);
    Ok(())
}

#[test]
fn fixed_string_pads_and_truncates_at_boundary() -> Result<()> {
    let mut w = MemoryWriter::new();
    w.write_string("ABCDEF", Extent::Fixed(4))?;
    w.write_string("AB", Extent::Fixed(4))?;
    assert_eq!(w.data(), b"ABCDAB\0\0");

    let mut r = MemoryReader::new(w.into_inner());
    assert_eq!(r.read_string(Extent::Fixed(4))?, "ABCD");
    assert_eq!(r.read_string(Extent::Fixed(4))?, "AB");
    // The padding was consumed along with the value.
    assert_eq!(r.position()?, 8);
    Ok(())
}

#[test]
fn variable_string_is_nul_terminated() -> Result<()> {
    let mut w = MemoryWriter::new();
    w.write_string("keese", Extent::Variable)?;
    w.write_u8(0x7F)?;
    assert_eq!(w.data(), b"keese\0\x7F");

    let mut r = MemoryReader::new(w.into_inner());
    assert_eq!(r.read_string(Extent::Variable)?, "keese");
    // The terminator was consumed; the next byte is payload.
    assert_eq!(r.read_u8()?, 0x7F);
    Ok(())
}

#[test]
fn unterminated_variable_string_ends_at_end_of_data() -> Result<()> {
    let mut r = MemoryReader::new(b"tail".to_vec());
    assert_eq!(r.read_string(Extent::Variable)?, "tail");
    assert_eq!(r.position()?, 4);
    Ok(())
}

#[test]
fn wide_string_bytes_follow_stream_endianness() -> Result<()> {
    let mut w = MemoryWriter::with_endian(Endian::Big);
    w.write_wide_string(&[0x0041, 0x0042], Extent::Variable)?;
    assert_eq!(w.data(), &[0x00, 0x41, 0x00, 0x42, 0x00, 0x00][..]);

    let mut w = MemoryWriter::with_endian(Endian::Little);
    w.write_wide_string(&[0x0041], Extent::Fixed(2))?;
    assert_eq!(w.data(), &[0x41, 0x00, 0x00, 0x00][..]);

    let mut r = MemoryReader::with_endian(w.into_inner(), Endian::Little);
    assert_eq!(r.read_wide_string(Extent::Fixed(2))?, vec![0x0041]);
    Ok(())
}

#[test]
fn wide_as_narrow_round_trip() -> Result<()> {
    let mut w = MemoryWriter::with_endian(Endian::Big);
    w.write_string_as_wide_string("GANON", Extent::Variable)?;
    // Widened code units: one u16 per byte.
    assert_eq!(w.length()?, 12);

    let mut r = MemoryReader::with_endian(w.into_inner(), Endian::Big);
    assert_eq!(r.read_wide_string_as_string(Extent::Variable)?, "GANON");
    Ok(())
}

#[test]
fn align_to_skips_on_read_and_pads_on_write() -> Result<()> {
    let mut w = MemoryWriter::new();
    w.write_bytes(&[1, 2, 3])?;
    w.align_to(4)?;
    assert_eq!(w.data(), &[1, 2, 3, 0][..]);
    w.align_to(4)?; // already aligned: no-op
    assert_eq!(w.length()?, 4);
    w.write_u8(5)?;

    let mut r = MemoryReader::new(w.into_inner());
    let mut buf = [0u8; 3];
    r.read_exact(&mut buf)?;
    r.align_to(4)?;
    assert_eq!(r.position()?, 4);
    assert_eq!(r.read_u8()?, 5);
    Ok(())
}
