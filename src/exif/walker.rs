//! Directory traversal over an EXIF payload.
//!
//! Directories are addressed by their offset in the payload, never by
//! reference. A per-parse set of visited offsets stops cycles introduced by
//! corrupted next/sub-directory pointers, and a hard cap on the number of
//! directories bounds the work for any input.
//!
//! # Traversal Order
//!
//! The primary chain (IFD0, IFD1, ...) is followed in link order. Within each
//! directory, entries are recorded first; its sub-directories (Exif, GPS,
//! interoperability) are then visited depth-first before moving on to the
//! next directory in the chain. Later entries overwrite earlier ones with the
//! same name, so this order decides which value wins.

use std::collections::{BTreeMap, HashSet};

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::error::TiffError;
use crate::format::tiff::{
    ByteOrder, FieldType, IfdEntry, TiffHeader, ValueReader, IFD_COUNT_SIZE, IFD_ENTRY_SIZE,
};

use super::format::format_value;
use super::tags::{sub_ifd_kind, tag_name, IfdKind};

// =============================================================================
// Constants
// =============================================================================

/// Maximum number of directories visited in one parse (safety limit)
const MAX_IFDS: usize = 100;

/// Maximum nesting of sub-directories below a chain directory
const MAX_SUB_IFD_DEPTH: usize = 4;

/// Tag name to formatted value.
pub type TagMap = BTreeMap<String, String>;

// =============================================================================
// DirectoryWalker
// =============================================================================

/// Walks the directory graph of one payload and collects formatted tags.
pub struct DirectoryWalker<'a> {
    data: &'a Bytes,
    header: TiffHeader,
    visited: HashSet<u32>,
    tags: TagMap,
}

impl<'a> DirectoryWalker<'a> {
    /// Validate the container header and prepare a walk.
    ///
    /// # Errors
    /// Any header problem (`InvalidMagic`, `InvalidVersion`, `FileTooSmall`,
    /// `InvalidIfdOffset`). Nothing past the header can fail the walk.
    pub fn new(data: &'a Bytes) -> Result<Self, TiffError> {
        let header = TiffHeader::parse(data)?;
        debug!(
            byte_order = ?header.byte_order,
            first_ifd = header.first_ifd_offset,
            size = data.len(),
            "Parsed container header"
        );

        Ok(Self {
            data,
            header,
            visited: HashSet::new(),
            tags: TagMap::new(),
        })
    }

    /// The parsed container header.
    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    /// Visit every reachable directory and return the collected tags.
    pub fn walk(mut self) -> TagMap {
        let mut offset = self.header.first_ifd_offset;
        let mut kind = IfdKind::Primary;

        while offset != 0 {
            match self.visit(offset, kind, 0) {
                Some(next) => offset = next,
                None => break,
            }
            kind = IfdKind::Thumbnail;
        }

        debug!(
            directories = self.visited.len(),
            tags = self.tags.len(),
            "Finished directory walk"
        );
        self.tags
    }

    /// Record one directory and its sub-directories.
    ///
    /// Returns the next-directory offset, or `None` when this branch ends
    /// (already visited, unreadable, or limits reached).
    fn visit(&mut self, offset: u32, kind: IfdKind, depth: usize) -> Option<u32> {
        if self.visited.len() >= MAX_IFDS {
            warn!(offset, limit = MAX_IFDS, "Directory limit reached, stopping traversal");
            return None;
        }
        if !self.visited.insert(offset) {
            warn!(ifd = kind.name(), offset, "Directory already visited, ignoring cyclic pointer");
            return None;
        }

        let data = self.data;
        let order = self.header.byte_order;
        let start = offset as usize;

        let Some(count) = order.u16_at(data, start) else {
            warn!(ifd = kind.name(), offset, "Directory offset outside payload");
            return None;
        };
        debug!(ifd = kind.name(), offset, entries = count, "Visiting directory");

        let reader = ValueReader::new(data, order);
        let entries_start = start + IFD_COUNT_SIZE;
        let mut children = Vec::new();
        let mut truncated = false;

        for index in 0..count as usize {
            let position = entries_start + index * IFD_ENTRY_SIZE;
            let Some(entry) = data
                .get(position..)
                .and_then(|bytes| IfdEntry::parse(bytes, order))
            else {
                warn!(
                    ifd = kind.name(),
                    index,
                    count,
                    "Directory truncated, remaining entries skipped"
                );
                truncated = true;
                break;
            };

            match sub_ifd_kind(entry.tag) {
                Some(child) => children.push((pointer_offset(&entry, order), child)),
                None => self.record(kind, &entry, &reader),
            }
        }

        for (child_offset, child_kind) in children {
            self.visit_sub(child_offset, child_kind, depth + 1);
        }

        if truncated {
            return None;
        }
        let next_position = entries_start + count as usize * IFD_ENTRY_SIZE;
        order.u32_at(data, next_position)
    }

    /// Follow a sub-directory pointer. Sub-directories have no chain of their own.
    fn visit_sub(&mut self, offset: u32, kind: IfdKind, depth: usize) {
        if offset == 0 || offset as usize >= self.data.len() {
            warn!(
                ifd = kind.name(),
                offset,
                size = self.data.len(),
                "Sub-directory pointer outside payload, skipping"
            );
            return;
        }
        if depth > MAX_SUB_IFD_DEPTH {
            warn!(ifd = kind.name(), offset, depth, "Sub-directory nesting too deep, skipping");
            return;
        }

        debug!(ifd = kind.name(), offset, "Following sub-directory pointer");
        let _ = self.visit(offset, kind, depth);
    }

    /// Decode, format and store one entry; undecodable entries are skipped.
    fn record(&mut self, kind: IfdKind, entry: &IfdEntry, reader: &ValueReader<'_>) {
        let name = tag_name(kind, entry.tag);

        match reader.read_value(entry) {
            Ok(value) => {
                let formatted = format_value(&name, &value);
                trace!(ifd = kind.name(), tag = %name, value = %formatted, "Entry");
                self.tags.insert(name.into_owned(), formatted);
            }
            Err(err) => {
                warn!(ifd = kind.name(), tag = %name, error = %err, "Skipping entry");
            }
        }
    }
}

/// Offset held by a sub-directory pointer entry.
///
/// Pointers are LONG by definition; SHORT is tolerated since it also fits inline.
fn pointer_offset(entry: &IfdEntry, order: ByteOrder) -> u32 {
    match entry.field_type {
        Some(FieldType::Short) => order
            .read_u16(&entry.value_offset_bytes)
            .map_or(0, u32::from),
        _ => entry.value_offset(order),
    }
}

/// Parse the header of `data` and walk all of its directories.
pub fn walk(data: &Bytes) -> Result<TagMap, TiffError> {
    Ok(DirectoryWalker::new(data)?.walk())
}

// =============================================================================
// Tests
// =============================================================================
