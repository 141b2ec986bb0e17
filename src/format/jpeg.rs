//! JPEG marker definitions.
//!
//! A JPEG stream is a sequence of marker segments. Each marker is `0xFF`
//! followed by a code byte. Most markers are followed by a 2-byte big-endian
//! length that counts itself plus the segment body; a handful stand alone.
//!
//! EXIF metadata travels in an APP1 segment whose body begins with the
//! identifier `"Exif\0\0"`, immediately followed by the TIFF container.

// =============================================================================
// JPEG Markers
// =============================================================================

/// Prefix byte of every marker
pub const MARKER_PREFIX: u8 = 0xFF;

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Start Of Scan marker
pub const SOS: [u8; 2] = [0xFF, 0xDA];

/// Application segment 0 (JFIF) marker
pub const APP0: [u8; 2] = [0xFF, 0xE0];

/// Application segment 1 (EXIF / XMP) marker
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Identifier at the start of an APP1 body carrying EXIF
pub const EXIF_IDENTIFIER: &[u8; 6] = b"Exif\0\0";

/// Size of the segment length field
pub const SEGMENT_LENGTH_SIZE: usize = 2;

// =============================================================================
// Marker Classification
// =============================================================================

/// Whether a marker code is followed by a length field.
///
/// Standalone markers are TEM (0x01), RST0-RST7 (0xD0-0xD7), SOI and EOI.
/// Code 0x00 only appears as byte stuffing inside entropy-coded data and
/// is treated the same way.
#[inline]
pub const fn has_length(code: u8) -> bool {
    !matches!(code, 0x00 | 0x01 | 0xD0..=0xD9)
}

/// Whether a marker code is APP1.
#[inline]
pub const fn is_app1(code: u8) -> bool {
    code == APP1[1]
}

// =============================================================================
// Tests
// =============================================================================
