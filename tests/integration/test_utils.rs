//! Test utilities for integration tests.
//!
//! This module provides builders that synthesise EXIF containers in either
//! byte order and wrap them in JPEG streams, plus a few ready-made fixtures.

// =============================================================================
// Byte Order
// =============================================================================

#[derive(Clone, Copy, Debug)]
pub enum ByteOrderType {
    LittleEndian,
    BigEndian,
}

pub const BOTH_BYTE_ORDERS: [ByteOrderType; 2] =
    [ByteOrderType::LittleEndian, ByteOrderType::BigEndian];

fn write_value(data: &mut Vec<u8>, byte_order: ByteOrderType, value: u32, size: usize) {
    match byte_order {
        ByteOrderType::LittleEndian => match size {
            1 => data.push(value as u8),
            2 => data.extend(&(value as u16).to_le_bytes()),
            4 => data.extend(&value.to_le_bytes()),
            _ => {}
        },
        ByteOrderType::BigEndian => match size {
            1 => data.push(value as u8),
            2 => data.extend(&(value as u16).to_be_bytes()),
            4 => data.extend(&value.to_be_bytes()),
            _ => {}
        },
    }
}

// =============================================================================
// Directory Builder
// =============================================================================

/// Value of one entry, encoded at build time in the container's byte order.
#[derive(Clone)]
enum EntryValue {
    Bytes(Vec<u8>),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<(u32, u32)>),
    SRationals(Vec<(i32, i32)>),
    /// Pre-encoded data with an explicit count
    Raw { count: u32, data: Vec<u8> },
    /// Count and slot written verbatim, for corrupt entries
    RawSlot { count: u32, slot: [u8; 4] },
}

#[derive(Clone)]
struct EntryBuilder {
    tag: u16,
    field_type: u16,
    value: EntryValue,
}

impl EntryBuilder {
    fn count(&self) -> u32 {
        match &self.value {
            EntryValue::Bytes(v) => v.len() as u32,
            EntryValue::Shorts(v) => v.len() as u32,
            EntryValue::Longs(v) => v.len() as u32,
            EntryValue::Rationals(v) => v.len() as u32,
            EntryValue::SRationals(v) => v.len() as u32,
            EntryValue::Raw { count, .. } | EntryValue::RawSlot { count, .. } => *count,
        }
    }

    fn encode(&self, byte_order: ByteOrderType) -> Vec<u8> {
        let mut data = Vec::new();
        match &self.value {
            EntryValue::Bytes(v) => data.extend(v),
            EntryValue::Shorts(v) => {
                for &s in v {
                    write_value(&mut data, byte_order, s as u32, 2);
                }
            }
            EntryValue::Longs(v) => {
                for &l in v {
                    write_value(&mut data, byte_order, l, 4);
                }
            }
            EntryValue::Rationals(v) => {
                for &(n, d) in v {
                    write_value(&mut data, byte_order, n, 4);
                    write_value(&mut data, byte_order, d, 4);
                }
            }
            EntryValue::SRationals(v) => {
                for &(n, d) in v {
                    write_value(&mut data, byte_order, n as u32, 4);
                    write_value(&mut data, byte_order, d as u32, 4);
                }
            }
            EntryValue::Raw { data: raw, .. } => data.extend(raw),
            EntryValue::RawSlot { slot, .. } => data.extend(slot),
        }
        data
    }
}

/// Builder for one directory's entries.
#[derive(Clone, Default)]
pub struct IfdBuilder {
    entries: Vec<EntryBuilder>,
}

impl IfdBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, tag: u16, field_type: u16, value: EntryValue) -> &mut Self {
        self.entries.push(EntryBuilder {
            tag,
            field_type,
            value,
        });
        self
    }

    /// ASCII entry; the NUL terminator is appended.
    pub fn add_ascii(&mut self, tag: u16, text: &str) -> &mut Self {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.push(tag, 2, EntryValue::Bytes(bytes))
    }

    pub fn add_bytes(&mut self, tag: u16, values: &[u8]) -> &mut Self {
        self.push(tag, 1, EntryValue::Bytes(values.to_vec()))
    }

    pub fn add_short(&mut self, tag: u16, value: u16) -> &mut Self {
        self.push(tag, 3, EntryValue::Shorts(vec![value]))
    }

    pub fn add_shorts(&mut self, tag: u16, values: &[u16]) -> &mut Self {
        self.push(tag, 3, EntryValue::Shorts(values.to_vec()))
    }

    pub fn add_long(&mut self, tag: u16, value: u32) -> &mut Self {
        self.push(tag, 4, EntryValue::Longs(vec![value]))
    }

    pub fn add_rational(&mut self, tag: u16, numerator: u32, denominator: u32) -> &mut Self {
        self.add_rationals(tag, &[(numerator, denominator)])
    }

    pub fn add_rationals(&mut self, tag: u16, values: &[(u32, u32)]) -> &mut Self {
        self.push(tag, 5, EntryValue::Rationals(values.to_vec()))
    }

    pub fn add_srational(&mut self, tag: u16, numerator: i32, denominator: i32) -> &mut Self {
        self.push(tag, 10, EntryValue::SRationals(vec![(numerator, denominator)]))
    }

    pub fn add_undefined(&mut self, tag: u16, data: &[u8]) -> &mut Self {
        self.push(tag, 7, EntryValue::Bytes(data.to_vec()))
    }

    /// Entry with an arbitrary type, declared count and raw (pre-encoded) data.
    pub fn add_entry_with_data(
        &mut self,
        tag: u16,
        field_type: u16,
        count: u32,
        data: Vec<u8>,
    ) -> &mut Self {
        self.push(tag, field_type, EntryValue::Raw { count, data })
    }

    /// Entry whose count and value/offset slot are written exactly as given.
    pub fn add_raw(&mut self, tag: u16, field_type: u16, count: u32, slot: [u8; 4]) -> &mut Self {
        self.push(tag, field_type, EntryValue::RawSlot { count, slot })
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Container Builder
// =============================================================================

/// Builder for a complete EXIF container (TIFF header + directories).
///
/// Directories are laid out as IFD0, Exif, Interoperability, GPS, IFD1, each
/// followed by its out-of-line values. Sub-directory pointers and the
/// IFD0 -> IFD1 link are filled in automatically.
pub struct ExifBuilder {
    byte_order: ByteOrderType,
    ifd0: IfdBuilder,
    exif: Option<IfdBuilder>,
    interop: Option<IfdBuilder>,
    gps: Option<IfdBuilder>,
    thumbnail: Option<IfdBuilder>,
}

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    Ifd0,
    Exif,
    Interop,
    Gps,
    Thumbnail,
}

impl ExifBuilder {
    pub fn new() -> Self {
        Self {
            byte_order: ByteOrderType::LittleEndian,
            ifd0: IfdBuilder::new(),
            exif: None,
            interop: None,
            gps: None,
            thumbnail: None,
        }
    }

    pub fn with_byte_order(mut self, order: ByteOrderType) -> Self {
        self.byte_order = order;
        self
    }

    pub fn with_ifd0(mut self, ifd: IfdBuilder) -> Self {
        self.ifd0 = ifd;
        self
    }

    pub fn with_exif(mut self, ifd: IfdBuilder) -> Self {
        self.exif = Some(ifd);
        self
    }

    /// Interoperability directory; requires an Exif directory to hang from.
    pub fn with_interop(mut self, ifd: IfdBuilder) -> Self {
        self.interop = Some(ifd);
        self
    }

    pub fn with_gps(mut self, ifd: IfdBuilder) -> Self {
        self.gps = Some(ifd);
        self
    }

    pub fn with_thumbnail(mut self, ifd: IfdBuilder) -> Self {
        self.thumbnail = Some(ifd);
        self
    }

    /// Build the container bytes (what follows `"Exif\0\0"` in APP1).
    pub fn build(&self) -> Vec<u8> {
        let mut dirs: Vec<(Slot, IfdBuilder)> = vec![(Slot::Ifd0, self.ifd0.clone())];
        if let Some(ifd) = &self.exif {
            dirs.push((Slot::Exif, ifd.clone()));
            if let Some(interop) = &self.interop {
                dirs.push((Slot::Interop, interop.clone()));
            }
        }
        if let Some(ifd) = &self.gps {
            dirs.push((Slot::Gps, ifd.clone()));
        }
        if let Some(ifd) = &self.thumbnail {
            dirs.push((Slot::Thumbnail, ifd.clone()));
        }

        // Pointer entries get a placeholder now and their real value below
        let has = |slot: Slot| dirs.iter().any(|(s, _)| *s == slot);
        let (has_exif, has_gps, has_interop) = (has(Slot::Exif), has(Slot::Gps), has(Slot::Interop));
        for (slot, ifd) in dirs.iter_mut() {
            match slot {
                Slot::Ifd0 => {
                    if has_exif {
                        ifd.add_long(0x8769, 0);
                    }
                    if has_gps {
                        ifd.add_long(0x8825, 0);
                    }
                }
                Slot::Exif if has_interop => {
                    ifd.add_long(0xA005, 0);
                }
                _ => {}
            }
            ifd.entries.sort_by_key(|e| e.tag);
        }

        // Assign offsets
        let mut offsets = Vec::new();
        let mut offset = 8usize;
        for (slot, ifd) in &dirs {
            offsets.push((*slot, offset));
            offset += self.directory_size(ifd);
        }
        let offset_of = |slot: Slot| {
            offsets
                .iter()
                .find(|(s, _)| *s == slot)
                .map(|(_, o)| *o as u32)
        };

        // Header
        let mut data = Vec::new();
        match self.byte_order {
            ByteOrderType::LittleEndian => data.extend(b"II"),
            ByteOrderType::BigEndian => data.extend(b"MM"),
        }
        write_value(&mut data, self.byte_order, 42, 2);
        write_value(&mut data, self.byte_order, 8, 4);

        for (slot, ifd) in &dirs {
            let next = match slot {
                Slot::Ifd0 => offset_of(Slot::Thumbnail).unwrap_or(0),
                _ => 0,
            };
            // Hand-written pointer entries keep their own slot
            let pointer = |tag: u16| match tag {
                0x8769 => offset_of(Slot::Exif),
                0x8825 => offset_of(Slot::Gps),
                0xA005 => offset_of(Slot::Interop),
                _ => None,
            };
            self.write_directory(&mut data, ifd, next, pointer);
        }

        data
    }

    /// Build a JPEG stream carrying the container.
    pub fn build_jpeg(&self) -> Vec<u8> {
        wrap_in_jpeg(&self.build())
    }

    fn directory_size(&self, ifd: &IfdBuilder) -> usize {
        let table = 2 + ifd.entry_count() * 12 + 4;
        let external: usize = ifd
            .entries
            .iter()
            .map(|e| e.encode(self.byte_order).len())
            .filter(|&len| len > 4)
            .map(|len| len + len % 2)
            .sum();
        table + external
    }

    fn write_directory(
        &self,
        data: &mut Vec<u8>,
        ifd: &IfdBuilder,
        next: u32,
        pointer: impl Fn(u16) -> Option<u32>,
    ) {
        let order = self.byte_order;
        let start = data.len();
        let mut external_offset = start + 2 + ifd.entry_count() * 12 + 4;
        let mut external = Vec::new();

        write_value(data, order, ifd.entry_count() as u32, 2);
        for entry in &ifd.entries {
            write_value(data, order, entry.tag as u32, 2);
            write_value(data, order, entry.field_type as u32, 2);
            write_value(data, order, entry.count(), 4);

            let mut encoded = entry.encode(order);
            if let Some(target) = pointer(entry.tag) {
                write_value(data, order, target, 4);
            } else if encoded.len() <= 4 {
                encoded.resize(4, 0);
                data.extend(&encoded);
            } else {
                write_value(data, order, external_offset as u32, 4);
                if encoded.len() % 2 == 1 {
                    encoded.push(0);
                }
                external_offset += encoded.len();
                external.extend(encoded);
            }
        }
        write_value(data, order, next, 4);
        data.extend(external);
    }
}

impl Default for ExifBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// JPEG Framing
// =============================================================================

/// Segment with a length field.
pub fn segment(code: u8, body: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, code];
    data.extend(&((body.len() + 2) as u16).to_be_bytes());
    data.extend(body);
    data
}

/// APP1 segment carrying an EXIF container.
pub fn exif_segment(container: &[u8]) -> Vec<u8> {
    let mut body = b"Exif\0\0".to_vec();
    body.extend(container);
    segment(0xE1, &body)
}

/// Scan header plus entropy-coded data with byte stuffing and a restart marker.
pub fn scan_data() -> Vec<u8> {
    let mut data = segment(0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    data.extend(&[0x12, 0xFF, 0x00, 0x34, 0xFF, 0xD0, 0x56, 0x78]);
    data
}

/// A JPEG stream with JFIF, an XMP APP1, the EXIF APP1, tables and scan data.
pub fn wrap_in_jpeg(container: &[u8]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    data.extend(segment(
        0xE1,
        b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta/>",
    ));
    data.extend(exif_segment(container));
    data.extend(segment(0xDB, &[0u8; 65]));
    data.extend(scan_data());
    data.extend(&[0xFF, 0xD9]);
    data
}

/// A JPEG stream with no EXIF segment at all.
pub fn jpeg_without_exif() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    data.extend(segment(0xDB, &[0u8; 65]));
    data.extend(scan_data());
    data.extend(&[0xFF, 0xD9]);
    data
}

// =============================================================================
// Fixtures
// =============================================================================

/// 40 bytes of vendor data covering every byte class.
pub fn maker_note() -> Vec<u8> {
    (0..40u8).map(|i| i.wrapping_mul(37) ^ 0xA5).collect()
}

pub const USER_COMMENT: &[u8] = b"ASCII\0\0\0hello world";

/// GPS directory with the latitude/longitude reference triplets.
pub fn gps_ifd() -> IfdBuilder {
    let mut gps = IfdBuilder::new();
    gps.add_bytes(0x0000, &[2, 2, 0, 0])
        .add_ascii(0x0001, "N")
        .add_rationals(0x0002, &[(25, 1), (21, 1), (326101, 10000)])
        .add_ascii(0x0003, "E")
        .add_rationals(0x0004, &[(131, 0), (0, 1), (552063, 10000)])
        .add_bytes(0x0005, &[0])
        .add_rational(0x0006, 4500, 100);
    gps
}

/// A camera-like container: IFD0, Exif, Interoperability, GPS and a thumbnail directory.
pub fn camera_exif(byte_order: ByteOrderType) -> ExifBuilder {
    let mut ifd0 = IfdBuilder::new();
    ifd0.add_ascii(0x010F, "Canon")
        .add_ascii(0x0110, "Canon EOS 5D Mark IV")
        .add_short(0x0112, 1)
        .add_rational(0x011A, 72, 1)
        .add_rational(0x011B, 72, 1)
        .add_short(0x0128, 2)
        .add_ascii(0x0132, "2021:06:14 09:30:00");

    let mut exif = IfdBuilder::new();
    exif.add_rational(0x829A, 1, 200)
        .add_rational(0x829D, 28, 10)
        .add_short(0x8827, 400)
        .add_ascii(0x9003, "2021:06:14 09:30:00")
        .add_srational(0x9204, -1, 3)
        .add_undefined(0x927C, &maker_note())
        .add_undefined(0x9286, USER_COMMENT)
        .add_long(0xA002, 6720);

    let mut interop = IfdBuilder::new();
    interop.add_ascii(0x0001, "R98");

    let mut thumbnail = IfdBuilder::new();
    thumbnail
        .add_short(0x0103, 6)
        .add_rational(0x011A, 180, 1)
        .add_long(0x0201, 5000)
        .add_long(0x0202, 1200);

    ExifBuilder::new()
        .with_byte_order(byte_order)
        .with_ifd0(ifd0)
        .with_exif(exif)
        .with_interop(interop)
        .with_gps(gps_ifd())
        .with_thumbnail(thumbnail)
}

/// Camera fixture wrapped in a JPEG stream.
pub fn camera_jpeg(byte_order: ByteOrderType) -> Vec<u8> {
    camera_exif(byte_order).build_jpeg()
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Find `needle` in `haystack`, returning its start.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Offset of the container inside a JPEG built by [`wrap_in_jpeg`].
pub fn container_start(jpeg: &[u8]) -> usize {
    find(jpeg, b"Exif\0\0").map(|pos| pos + 6).unwrap_or(0)
}
