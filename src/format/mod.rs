//! Container formats.
//!
//! - [`jpeg`]: marker constants and classification
//! - [`scanner`]: incremental location of the EXIF payload in a JPEG stream
//! - [`tiff`]: the TIFF structure inside the payload (header, entries, values)

pub mod jpeg;
pub mod scanner;
pub mod tiff;

pub use scanner::{scan, ExifScanner, FeedSignal};
