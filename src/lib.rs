//! # exif-tags
//!
//! Reads the EXIF metadata embedded in JPEG images and returns it as a flat
//! mapping from tag name to display string.
//!
//! ## Features
//!
//! - **Incremental scanning**: feed the image in chunks of any size and stop
//!   reading as soon as the EXIF segment has been captured
//! - **Both byte orders**: little-endian (`II`) and big-endian (`MM`) containers
//! - **Corruption tolerant**: cyclic directory pointers, truncated values and
//!   out-of-range offsets skip the affected part instead of failing the parse
//! - **Stable output**: GPS coordinates as `"D, M, S"`, opaque data (maker notes,
//!   user comments) as standard base64
//!
//! ## Architecture
//!
//! - [`mod@format`] - JPEG marker scanning and the TIFF container structure
//! - [`exif`] - Tag dictionary, value formatting and directory traversal
//! - [`reader`] - Bulk and two-phase entry points
//! - [`config`] - CLI configuration for the `exif-tags` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_tags::{ExifReader, FeedSignal};
//!
//! # fn main() -> Result<(), exif_tags::ExifError> {
//! // Bulk
//! let tags = exif_tags::open("photo.jpg")?;
//! if let Some(model) = tags.get("Model") {
//!     println!("Model: {}", model);
//! }
//!
//! // Two-phase
//! let data = std::fs::read("photo.jpg")?;
//! let mut reader = ExifReader::new();
//! for chunk in data.chunks(4096) {
//!     if reader.feed(chunk) != FeedSignal::Continue {
//!         break;
//!     }
//! }
//! let tags = reader.resolve()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod exif;
pub mod format;
pub mod io;
pub mod reader;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use error::{ExifError, ScanError, TiffError};
pub use exif::{format_value, lookup, tag_name, DirectoryWalker, IfdKind, TagMap};
pub use format::tiff::{ByteOrder, FieldType, IfdEntry, TiffHeader, Value, ValueReader};
pub use format::{scan, ExifScanner, FeedSignal};
pub use reader::{
    open, parse_bytes, read_from, read_from_with_chunk_size, ExifReader, DEFAULT_CHUNK_SIZE,
};
