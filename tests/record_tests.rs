//! Record-level tests: typed field wrappers, declaration-order round-trips,
//! per-field endian overrides, and the layout vocabulary.

use relic::{
    BufferField, Endian, Extent, FieldKind, FieldSpec, MemoryReader, MemoryWriter, Record,
    RelicError, Result, SeekOrigin, StreamReader, StreamWriter, StringField,
    WStringAsStringField, WStringField, layout_size,
};

// --- MOCK RECORD ---

/// One sprite sheet entry, mixing every wrapper kind and a per-field
/// endian override. Declared little-endian overall; `title` is big-endian
/// on disk.
#[derive(Debug, Clone, PartialEq)]
struct SpriteEntry {
    tag: StringField,                // fixed 4
    frame_count: u16,
    anchor_x: f32,
    anchor_y: f32,
    palette: BufferField,            // fixed 8
    title: WStringField,             // variable, big-endian
    author: WStringAsStringField,    // variable
    comment: StringField,            // variable
}

impl SpriteEntry {
    fn new() -> Self {
        Self {
            tag: StringField::fixed(4),
            frame_count: 0,
            anchor_x: 0.0,
            anchor_y: 0.0,
            palette: BufferField::new(8),
            title: WStringField::variable(Endian::Big),
            author: WStringAsStringField::variable(),
            comment: StringField::variable(),
        }
    }
}

impl Default for SpriteEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for SpriteEntry {
    fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        reader.set_endian(Endian::Little);
        self.tag.read(reader)?;
        self.frame_count = reader.read_u16()?;
        self.anchor_x = reader.read_f32()?;
        self.anchor_y = reader.read_f32()?;
        self.palette.read(reader)?;
        self.title.read(reader)?; // switches the stream to big-endian
        reader.set_endian(Endian::Little); // restore for the remaining fields
        self.author.read(reader)?;
        self.comment.read(reader)?;
        Ok(())
    }

    fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.set_endian(Endian::Little);
        self.tag.write(writer)?;
        writer.write_u16(self.frame_count)?;
        writer.write_f32(self.anchor_x)?;
        writer.write_f32(self.anchor_y)?;
        self.palette.write(writer)?;
        self.title.write(writer)?;
        writer.set_endian(Endian::Little);
        self.author.write(writer)?;
        self.comment.write(writer)
    }
}

// --- TESTS ---

#[test]
fn record_round_trip_reproduces_every_field() -> Result<()> {
    let mut entry = SpriteEntry::new();
    entry.tag.set("OCTO");
    entry.frame_count = 12;
    entry.anchor_x = 0.5;
    entry.anchor_y = -3.75;
    entry.palette.set(vec![1, 2, 3, 4, 5, 6, 7, 8])?;
    entry.title.set("Octorok");
    entry.author.set("workshop");
    entry.comment.set("spits rocks");

    let mut out = MemoryWriter::new();
    entry.write(&mut out)?;

    let mut back = SpriteEntry::from_stream(&mut MemoryReader::new(out.into_inner()))?;
    assert_eq!(back, entry);
    assert_eq!(back.title.decode()?, "Octorok");
    // Re-serialize: byte-identical output.
    let mut again = MemoryWriter::new();
    back.write(&mut again)?;
    let mut first = MemoryWriter::new();
    entry.write(&mut first)?;
    assert_eq!(again.data(), first.data());
    Ok(())
}

#[test]
fn per_field_endian_override_does_not_leak() -> Result<()> {
    let mut title = WStringField::fixed(2, Endian::Big);
    title.set("AB");

    let mut w = MemoryWriter::with_endian(Endian::Little);
    title.write(&mut w)?;
    // The override is sticky: the field left the stream big-endian, and the
    // caller is responsible for restoring the order it wants next.
    assert_eq!(w.endian(), Endian::Big);
    w.set_endian(Endian::Little);
    w.write_u16(300)?;

    // Big-endian bytes for the wide string, little-endian for the scalar.
    assert_eq!(w.data(), &[0x00, 0x41, 0x00, 0x42, 0x2C, 0x01][..]);

    let mut r = MemoryReader::with_endian(w.into_inner(), Endian::Little);
    let mut back = WStringField::fixed(2, Endian::Big);
    back.read(&mut r)?;
    r.set_endian(Endian::Little);
    assert_eq!(back.units(), &[0x0041, 0x0042]);
    assert_eq!(r.read_u16()?, 300);
    Ok(())
}

#[test]
fn wide_string_fields_of_both_endiannesses_coexist() -> Result<()> {
    let mut big = WStringField::fixed(2, Endian::Big);
    big.set("AB");
    let mut little = WStringField::fixed(2, Endian::Little);
    little.set("CD");

    let mut w = MemoryWriter::new();
    big.write(&mut w)?;
    little.write(&mut w)?;
    assert_eq!(w.data(), &[0x00, 0x41, 0x00, 0x42, 0x43, 0x00, 0x44, 0x00][..]);

    let mut r = MemoryReader::new(w.into_inner());
    let mut big_back = WStringField::fixed(2, Endian::Big);
    let mut little_back = WStringField::fixed(2, Endian::Little);
    big_back.read(&mut r)?;
    little_back.read(&mut r)?;
    assert_eq!(big_back, big);
    assert_eq!(little_back, little);
    Ok(())
}

// --- NESTED RECORDS ---

#[derive(Debug, Default, Clone, PartialEq)]
struct FramePoint {
    x: f32,
    y: f32,
}

impl Record for FramePoint {
    fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.x = reader.read_f32()?;
        self.y = reader.read_f32()?;
        Ok(())
    }

    fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_f32(self.x)?;
        writer.write_f32(self.y)
    }
}

/// A record holding a fixed-count vector of nested records.
#[derive(Debug, Default, Clone, PartialEq)]
struct FrameTrack {
    id: u8,
    points: Vec<FramePoint>, // always 3 on disk
}

impl Record for FrameTrack {
    fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.id = reader.read_u8()?;
        self.points.clear();
        for _ in 0..3 {
            self.points.push(FramePoint::from_stream(reader)?);
        }
        Ok(())
    }

    fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_u8(self.id)?;
        for point in &self.points {
            point.write(writer)?;
        }
        Ok(())
    }

    fn layout() -> &'static [FieldSpec] {
        &[
            FieldSpec {
                name: "id",
                kind: FieldKind::Value {
                    size: 1,
                    endian: None,
                },
            },
            FieldSpec {
                name: "points",
                kind: FieldKind::Vector {
                    elem_size: 8,
                    count: 3,
                    endian: None,
                },
            },
        ]
    }
}

#[test]
fn nested_records_round_trip_in_declaration_order() -> Result<()> {
    let track = FrameTrack {
        id: 7,
        points: vec![
            FramePoint { x: 0.0, y: 1.0 },
            FramePoint { x: -2.5, y: 8.25 },
            FramePoint { x: 16.0, y: -0.125 },
        ],
    };

    let mut out = MemoryWriter::new();
    track.write(&mut out)?;
    assert_eq!(out.length()?, layout_size(FrameTrack::layout()).unwrap());

    let back = FrameTrack::from_stream(&mut MemoryReader::new(out.into_inner()))?;
    assert_eq!(back, track);
    Ok(())
}

#[test]
fn buffer_field_surfaces_incomplete_reads() {
    let mut buf = BufferField::new(8);
    let mut r = MemoryReader::new(vec![1, 2, 3]);
    match buf.read(&mut r) {
        Err(RelicError::ShortRead { requested, read }) => {
            assert_eq!(requested, 8);
            assert_eq!(read, 3);
        }
        other => panic!("expected ShortRead, got {other:?}"),
    }
    // The partial payload was filled as far as the data went.
    assert_eq!(&buf.data()[..3], &[1, 2, 3]);
}

#[test]
fn buffer_field_rejects_mismatched_payload() {
    let mut buf = BufferField::new(4);
    match buf.set(vec![1, 2]) {
        Err(RelicError::Size { expected, actual }) => {
            assert_eq!((expected, actual), (4, 2));
        }
        other => panic!("expected Size error, got {other:?}"),
    }
}

#[test]
fn string_assignment_replaces_payload_in_full() -> Result<()> {
    let mut field = StringField::variable();
    field.set("first");
    field.set("second");
    assert_eq!(field, "second");

    let mut out = MemoryWriter::new();
    field.write(&mut out)?;
    assert_eq!(out.data(), b"second\0");
    Ok(())
}

// --- LAYOUT VOCABULARY ---

/// The 10-byte tag record: a 4-byte fixed string, a 2-byte scalar, and a
/// 4-byte buffer.
#[derive(Debug, Default, Clone, PartialEq)]
struct TagRecord {
    tag: String,
    value: u16,
    padding: Vec<u8>,
}

const TAG_LAYOUT: &[FieldSpec] = &[
    FieldSpec {
        name: "tag",
        kind: FieldKind::Str {
            extent: Extent::Fixed(4),
        },
    },
    FieldSpec {
        name: "value",
        kind: FieldKind::Value {
            size: 2,
            endian: None,
        },
    },
    FieldSpec {
        name: "padding",
        kind: FieldKind::Buffer { size: 4 },
    },
];

impl Record for TagRecord {
    fn read(&mut self, reader: &mut dyn StreamReader) -> Result<()> {
        self.tag = reader.read_string(Extent::Fixed(4))?;
        self.value = reader.read_u16()?;
        let mut padding = vec![0u8; 4];
        reader.read_exact(&mut padding)?;
        self.padding = padding;
        Ok(())
    }

    fn write(&self, writer: &mut dyn StreamWriter) -> Result<()> {
        writer.write_string(&self.tag, Extent::Fixed(4))?;
        writer.write_u16(self.value)?;
        writer.write_bytes(&self.padding)
    }

    fn layout() -> &'static [FieldSpec] {
        TAG_LAYOUT
    }
}

#[test]
fn layout_agrees_with_the_hand_written_body() -> Result<()> {
    let record = TagRecord {
        tag: "ABCD".into(),
        value: 300,
        padding: vec![0xDE, 0xAD, 0xBE, 0xEF],
    };
    let mut out = MemoryWriter::new();
    record.write(&mut out)?;

    // The declared table knows the record's full wire size statically.
    assert_eq!(layout_size(TagRecord::layout()), Some(10));
    assert_eq!(out.length()?, 10);
    Ok(())
}

#[test]
fn field_specs_skip_what_bodies_would_read() -> Result<()> {
    let record = TagRecord {
        tag: "ABCD".into(),
        value: 300,
        padding: vec![1, 2, 3, 4],
    };
    let mut out = MemoryWriter::new();
    record.write(&mut out)?;
    let mut r = MemoryReader::new(out.into_inner());

    // Skip the first two declared fields, then read the third directly.
    TagRecord::layout()[0].skip(&mut r)?;
    TagRecord::layout()[1].skip(&mut r)?;
    assert_eq!(r.position()?, 6);
    let mut padding = [0u8; 4];
    r.read_exact(&mut padding)?;
    assert_eq!(padding, [1, 2, 3, 4]);
    Ok(())
}

#[test]
fn variable_and_positional_entries_have_no_static_size() -> Result<()> {
    let layout = &[
        FieldSpec {
            name: "name",
            kind: FieldKind::Str {
                extent: Extent::Variable,
            },
        },
        FieldSpec {
            name: "flags",
            kind: FieldKind::Value {
                size: 4,
                endian: Some(Endian::Big),
            },
        },
    ];
    assert_eq!(layout_size(layout), None);
    assert_eq!(layout[1].kind.wire_size(), Some(4));

    // Skipping a variable string consumes through its terminator.
    let mut r = MemoryReader::new(b"moblin\0\x01\x02\x03\x04".to_vec());
    layout[0].skip(&mut r)?;
    assert_eq!(r.position()?, 7);
    Ok(())
}

#[test]
fn seek_and_align_markers_adjust_the_stream() -> Result<()> {
    let layout = &[
        FieldSpec {
            name: "skip_header",
            kind: FieldKind::Seek {
                offset: 4,
                origin: SeekOrigin::Begin,
            },
        },
        FieldSpec {
            name: "align",
            kind: FieldKind::Align { boundary: 8 },
        },
    ];
    let mut r = MemoryReader::new((0u8..16).collect());
    layout[0].skip(&mut r)?;
    assert_eq!(r.position()?, 4);
    layout[1].skip(&mut r)?;
    assert_eq!(r.position()?, 8);
    Ok(())
}

#[test]
fn vector_entries_size_by_element() {
    let kind = FieldKind::Vector {
        elem_size: 4,
        count: 6,
        endian: None,
    };
    assert_eq!(kind.wire_size(), Some(24));
}
