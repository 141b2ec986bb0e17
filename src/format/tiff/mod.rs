//! TIFF container parsing for EXIF payloads.
//!
//! # Key Concepts
//!
//! - **Byte order**: the container declares its endianness (II = little-endian,
//!   MM = big-endian) in the header. All multi-byte values must be read
//!   respecting this order.
//!
//! - **IFD (Image File Directory)**: a counted list of 12-byte entries followed
//!   by the offset of the next directory.
//!
//! - **Inline vs offset values**: values of up to 4 bytes are stored inline in
//!   the entry, larger values are stored at an offset pointed to by the entry.

mod parser;
mod tags;
mod values;

pub use parser::{ByteOrder, IfdEntry, TiffHeader, IFD_COUNT_SIZE, IFD_ENTRY_SIZE, TIFF_HEADER_SIZE};
pub use tags::FieldType;
pub use values::{Rational, SRational, Value, ValueReader};
