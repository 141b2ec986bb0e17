//! TIFF tag value reading.
//!
//! Values are stored either inline in the IFD entry (when they fit in the
//! 4-byte slot) or at an offset into the payload. Every offset-based read is
//! checked against the payload length; a value that runs past the end is a
//! `TruncatedValue` error for that entry only.

use bytes::Bytes;

use crate::error::TiffError;

use super::parser::{ByteOrder, IfdEntry};
use super::tags::FieldType;

// =============================================================================
// Rationals
// =============================================================================

/// Unsigned rational, kept unreduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

/// Signed rational, kept unreduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

// =============================================================================
// Value
// =============================================================================

/// A decoded entry value: one variant per declared field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(Vec<u8>),
    /// Raw characters including any terminator
    Ascii(Bytes),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Bytes),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Declared type we don't know; carried as opaque bytes
    Unknown { field_type: u16, data: Bytes },
}

// =============================================================================
// ValueReader
// =============================================================================

/// Reads entry values out of a captured EXIF payload.
pub struct ValueReader<'a> {
    data: &'a Bytes,
    byte_order: ByteOrder,
}

impl<'a> ValueReader<'a> {
    /// Create a new ValueReader over the payload.
    pub fn new(data: &'a Bytes, byte_order: ByteOrder) -> Self {
        Self { data, byte_order }
    }

    /// Read raw bytes for an IFD entry's value.
    ///
    /// Inline values are copied out of the entry; offset values are sliced
    /// from the payload without copying.
    pub fn read_bytes(&self, entry: &IfdEntry) -> Result<Bytes, TiffError> {
        let size = entry.value_byte_size();

        if entry.is_inline() {
            return Ok(Bytes::copy_from_slice(
                &entry.value_offset_bytes[..size as usize],
            ));
        }

        let offset = entry.value_offset(self.byte_order) as u64;
        let end = offset + size;
        if end > self.data.len() as u64 {
            return Err(TiffError::TruncatedValue {
                tag: entry.tag,
                offset,
                length: size,
                size: self.data.len(),
            });
        }

        Ok(self.data.slice(offset as usize..end as usize))
    }

    /// Decode an entry into a typed value.
    ///
    /// Multi-byte elements honour the payload byte order. Rationals are
    /// returned as raw numerator/denominator pairs.
    pub fn read_value(&self, entry: &IfdEntry) -> Result<Value, TiffError> {
        let bytes = self.read_bytes(entry)?;
        let order = self.byte_order;

        let Some(field_type) = entry.field_type else {
            return Ok(Value::Unknown {
                field_type: entry.field_type_raw,
                data: bytes,
            });
        };

        let value = match field_type {
            FieldType::Byte => Value::Byte(bytes.to_vec()),
            FieldType::Ascii => Value::Ascii(bytes),
            FieldType::Undefined => Value::Undefined(bytes),
            FieldType::SByte => Value::SByte(bytes.iter().map(|&b| b as i8).collect()),
            FieldType::Short => Value::Short(elements(&bytes, 2, |c| order.read_u16(c))),
            FieldType::SShort => {
                Value::SShort(elements(&bytes, 2, |c| order.read_u16(c).map(|v| v as i16)))
            }
            FieldType::Long => Value::Long(elements(&bytes, 4, |c| order.read_u32(c))),
            FieldType::SLong => {
                Value::SLong(elements(&bytes, 4, |c| order.read_u32(c).map(|v| v as i32)))
            }
            FieldType::Rational => Value::Rational(elements(&bytes, 8, |c| {
                Some(Rational {
                    numerator: order.read_u32(c)?,
                    denominator: order.read_u32(c.get(4..)?)?,
                })
            })),
            FieldType::SRational => Value::SRational(elements(&bytes, 8, |c| {
                Some(SRational {
                    numerator: order.read_u32(c)? as i32,
                    denominator: order.read_u32(c.get(4..)?)? as i32,
                })
            })),
            FieldType::Float => {
                Value::Float(elements(&bytes, 4, |c| order.read_u32(c).map(f32::from_bits)))
            }
            FieldType::Double => {
                Value::Double(elements(&bytes, 8, |c| order.read_u64(c).map(f64::from_bits)))
            }
        };

        Ok(value)
    }
}

/// Split `bytes` into fixed-size elements and decode each one.
fn elements<T>(bytes: &[u8], size: usize, decode: impl Fn(&[u8]) -> Option<T>) -> Vec<T> {
    bytes.chunks_exact(size).filter_map(decode).collect()
}

// =============================================================================
// Tests
// =============================================================================
