//! Public entry points for reading EXIF tags.
//!
//! Two ways in:
//!
//! - **Bulk**: [`open`], [`parse_bytes`] and [`read_from`] take a whole source
//!   and return the final [`TagMap`].
//! - **Two-phase**: [`ExifReader`] accepts chunks through [`ExifReader::feed`]
//!   (or `std::io::Write`). Once it signals [`FeedSignal::PayloadFound`] the
//!   caller may stop reading and call [`ExifReader::resolve`].
//!
//! Both paths assemble the same payload and hand it to the same walker, so
//! they produce identical results for the same bytes.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::ExifError;
use crate::exif::{walk, TagMap};
use crate::format::{scan, ExifScanner, FeedSignal};

/// Default read size for [`read_from`] (64KB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

// =============================================================================
// ExifReader
// =============================================================================

/// Incremental reader: feed chunks, then resolve.
#[derive(Debug, Default)]
pub struct ExifReader {
    scanner: ExifScanner,
}

impl ExifReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the next chunk of the source.
    ///
    /// Chunks fed after `PayloadFound` or an error are ignored.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedSignal {
        self.scanner.feed(chunk)
    }

    /// Signal that no more input will arrive.
    ///
    /// # Errors
    /// `ContainerNotFound` if the stream carried no EXIF segment,
    /// `MalformedMarker` if the EXIF segment was cut short.
    pub fn finish(&mut self) -> Result<(), ExifError> {
        self.scanner.finish()?;
        Ok(())
    }

    /// Whether the payload has been captured and `resolve` may be called.
    pub fn is_found(&self) -> bool {
        self.scanner.is_found()
    }

    /// The captured container bytes.
    pub fn payload(&self) -> Option<&Bytes> {
        self.scanner.payload()
    }

    /// Source bytes consumed by the scanner so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.scanner.bytes_consumed()
    }

    /// Walk the captured payload and build the tag mapping.
    ///
    /// Can be called repeatedly; each call yields the same mapping.
    ///
    /// # Errors
    /// - `PayloadNotLocated` if the payload has not been found yet
    /// - `Scan` if the scan already failed
    /// - `InvalidHeader` if the container header is unusable
    pub fn resolve(&self) -> Result<TagMap, ExifError> {
        match self.scanner.payload() {
            Some(payload) => resolve_payload(payload),
            None => match self.scanner.signal() {
                FeedSignal::Error(err) => Err(err.into()),
                _ => Err(ExifError::PayloadNotLocated),
            },
        }
    }
}

impl Write for ExifReader {
    /// Feeds `buf`; every byte is reported as written, including bytes
    /// ignored after the payload was captured.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.feed(buf) {
            FeedSignal::Error(err) => Err(io::Error::new(io::ErrorKind::InvalidData, err)),
            FeedSignal::Continue | FeedSignal::PayloadFound => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Bulk Operations
// =============================================================================

/// Read a whole file and return its tags.
pub fn open(path: impl AsRef<Path>) -> Result<TagMap, ExifError> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    debug!(path = %path.display(), size = data.len(), "Read source file");

    parse_bytes(&data)
}

/// Return the tags of an in-memory image.
pub fn parse_bytes(data: &[u8]) -> Result<TagMap, ExifError> {
    let payload = scan(data)?;
    resolve_payload(&payload)
}

/// Read from `reader` in [`DEFAULT_CHUNK_SIZE`] chunks until the payload is
/// found, then return its tags.
pub fn read_from<R: Read>(reader: R) -> Result<TagMap, ExifError> {
    read_from_with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
}

/// Like [`read_from`], with an explicit chunk size (0 is treated as 1).
///
/// Nothing past the end of the EXIF segment's chunk is read from `reader`.
pub fn read_from_with_chunk_size<R: Read>(
    mut reader: R,
    chunk_size: usize,
) -> Result<TagMap, ExifError> {
    let mut exif = ExifReader::new();
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        match exif.feed(&buf[..n]) {
            FeedSignal::Continue => {}
            FeedSignal::PayloadFound => {
                debug!(consumed = exif.bytes_consumed(), "Payload located, stopping read");
                return exif.resolve();
            }
            FeedSignal::Error(err) => return Err(err.into()),
        }
    }

    exif.finish()?;
    exif.resolve()
}

fn resolve_payload(payload: &Bytes) -> Result<TagMap, ExifError> {
    walk(payload).map_err(ExifError::InvalidHeader)
}

// =============================================================================
// Tests
// =============================================================================
