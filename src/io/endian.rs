// =============================================================================
// Endian Helper Functions
// =============================================================================
//
// The container declares its byte order in the header. Every multi-byte read
// goes through these helpers, which return `None` instead of panicking when
// the slice is too short.

/// Read a little-endian u16 from the start of a byte slice.
#[inline]
pub fn read_u16_le(bytes: &[u8]) -> Option<u16> {
    Some(u16::from_le_bytes(bytes.get(..2)?.try_into().ok()?))
}

/// Read a big-endian u16 from the start of a byte slice.
#[inline]
pub fn read_u16_be(bytes: &[u8]) -> Option<u16> {
    Some(u16::from_be_bytes(bytes.get(..2)?.try_into().ok()?))
}

/// Read a little-endian u32 from the start of a byte slice.
#[inline]
pub fn read_u32_le(bytes: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.get(..4)?.try_into().ok()?))
}

/// Read a big-endian u32 from the start of a byte slice.
#[inline]
pub fn read_u32_be(bytes: &[u8]) -> Option<u32> {
    Some(u32::from_be_bytes(bytes.get(..4)?.try_into().ok()?))
}

/// Read a little-endian u64 from the start of a byte slice.
#[inline]
pub fn read_u64_le(bytes: &[u8]) -> Option<u64> {
    Some(u64::from_le_bytes(bytes.get(..8)?.try_into().ok()?))
}

/// Read a big-endian u64 from the start of a byte slice.
#[inline]
pub fn read_u64_be(bytes: &[u8]) -> Option<u64> {
    Some(u64::from_be_bytes(bytes.get(..8)?.try_into().ok()?))
}
