//! TIFF container header parsing.
//!
//! The EXIF payload is a classic TIFF structure. Its header fixes the byte
//! order for every subsequent read and points at the first directory.
//!
//! # Header Structure (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD, relative to the start of the header
//! ```

use crate::error::TiffError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le};

use super::tags::FieldType;

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one directory entry: 2 tag + 2 type + 4 count + 4 value/offset
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the entry count field at the start of a directory
pub const IFD_COUNT_SIZE: usize = 2;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of the container.
///
/// Determined once from the header and applied to every multi-byte read
/// for the rest of the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 from the start of a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> Option<u16> {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from the start of a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> Option<u32> {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    /// Read a u64 from the start of a byte slice using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> Option<u64> {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }

    /// Read a u16 at `offset` within `data`, or `None` if it would run past the end.
    #[inline]
    pub fn u16_at(self, data: &[u8], offset: usize) -> Option<u16> {
        self.read_u16(data.get(offset..)?)
    }

    /// Read a u32 at `offset` within `data`, or `None` if it would run past the end.
    #[inline]
    pub fn u32_at(self, data: &[u8], offset: usize) -> Option<u32> {
        self.read_u32(data.get(offset..)?)
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the container
    pub byte_order: ByteOrder,

    /// Offset to the first IFD, relative to the start of the payload
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse the header at the start of an EXIF payload.
    ///
    /// # Errors
    /// - `FileTooSmall` if there aren't 8 bytes of header
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42
    /// - `InvalidIfdOffset` if the first IFD offset is outside the payload
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        // Checked as a fixed byte pattern, independent of the order it selects
        let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidMagic(magic)),
        };

        let version = byte_order
            .u16_at(bytes, 2)
            .ok_or(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE,
                actual: bytes.len(),
            })?;
        if version != VERSION_TIFF {
            return Err(TiffError::InvalidVersion(version));
        }

        let first_ifd_offset = byte_order
            .u32_at(bytes, 4)
            .ok_or(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE,
                actual: bytes.len(),
            })?;

        if first_ifd_offset as usize >= bytes.len() {
            return Err(TiffError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// IfdEntry
// =============================================================================

/// One 12-byte directory entry descriptor.
///
/// The value/offset slot is kept raw: whether it holds the value itself or
/// an offset into the payload depends on the declared type and count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Numeric tag id
    pub tag: u16,

    /// Declared type, if it is one we know
    pub field_type: Option<FieldType>,

    /// Declared type as stored
    pub field_type_raw: u16,

    /// Number of elements
    pub count: u32,

    /// Raw value/offset slot
    pub value_offset_bytes: [u8; 4],
}

impl IfdEntry {
    /// Parse an entry from the first 12 bytes of `bytes`.
    pub fn parse(bytes: &[u8], byte_order: ByteOrder) -> Option<Self> {
        let tag = byte_order.u16_at(bytes, 0)?;
        let field_type_raw = byte_order.u16_at(bytes, 2)?;
        let count = byte_order.u32_at(bytes, 4)?;
        let value_offset_bytes: [u8; 4] = bytes.get(8..IFD_ENTRY_SIZE)?.try_into().ok()?;

        Some(IfdEntry {
            tag,
            field_type: FieldType::from_u16(field_type_raw),
            field_type_raw,
            count,
            value_offset_bytes,
        })
    }

    /// Size of one element. Unknown types are treated as opaque bytes.
    #[inline]
    pub fn element_size(&self) -> usize {
        self.field_type.map_or(1, FieldType::size_in_bytes)
    }

    /// Total size of the value in bytes.
    #[inline]
    pub fn value_byte_size(&self) -> u64 {
        self.element_size() as u64 * self.count as u64
    }

    /// Whether the value lives in the entry's own 4-byte slot.
    #[inline]
    pub fn is_inline(&self) -> bool {
        match self.field_type {
            Some(field_type) => field_type.fits_inline(self.count),
            None => self.count as u64 <= FieldType::INLINE_THRESHOLD as u64,
        }
    }

    /// The slot interpreted as an offset into the payload.
    #[inline]
    pub fn value_offset(&self, byte_order: ByteOrder) -> u32 {
        match byte_order {
            ByteOrder::LittleEndian => u32::from_le_bytes(self.value_offset_bytes),
            ByteOrder::BigEndian => u32::from_be_bytes(self.value_offset_bytes),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
