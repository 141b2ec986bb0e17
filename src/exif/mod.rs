//! EXIF directory interpretation.
//!
//! Turns a located payload into a flat mapping from tag name to display
//! string:
//!
//! - [`tags`] names numeric tag ids per directory context.
//! - [`format`](mod@format) renders decoded values as strings.
//! - [`walker`] visits every reachable directory and collects the results.

pub mod format;
pub mod tags;
pub mod walker;

pub use format::format_value;
pub use tags::{
    lookup, sub_ifd_kind, tag_name, IfdKind, EXIF_IFD_POINTER, GPS_IFD_POINTER,
    INTEROP_IFD_POINTER,
};
pub use walker::{walk, DirectoryWalker, TagMap};
