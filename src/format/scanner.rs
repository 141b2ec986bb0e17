//! Incremental EXIF payload scanner.
//!
//! The scanner walks JPEG marker segments as bytes arrive, skipping every
//! segment body except an APP1 whose body starts with `"Exif\0\0"`. The bytes
//! that follow the identifier, up to the segment's declared length, are the
//! EXIF payload (TIFF header, directories and overflow data).
//!
//! Bulk and incremental callers share the same state machine: a bulk scan is
//! a single `feed` followed by `finish`.
//!
//! # Signals
//!
//! `feed` returns [`FeedSignal::PayloadFound`] as soon as the last payload
//! byte is consumed. This is not an error; callers may stop feeding, or keep
//! feeding and have the extra bytes ignored.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::ScanError;

use super::jpeg::{has_length, is_app1, APP1, EXIF_IDENTIFIER, MARKER_PREFIX, SEGMENT_LENGTH_SIZE};

// =============================================================================
// FeedSignal
// =============================================================================

/// Outcome of pushing one chunk into the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum FeedSignal {
    /// Payload not located yet; keep feeding
    Continue,

    /// Payload fully captured; further input is ignored
    PayloadFound,

    /// The stream cannot yield a payload
    Error(ScanError),
}

// =============================================================================
// Scanner State
// =============================================================================

#[derive(Debug)]
enum State {
    /// Looking for a 0xFF prefix; any other byte is skipped
    Marker,

    /// Saw 0xFF, next byte is the marker code
    MarkerCode,

    /// Reading the 2-byte big-endian segment length
    Length { code: u8, high: Option<u8> },

    /// Reading the first bytes of an APP1 body to check for the EXIF identifier
    Identifier { remaining: usize, seen: Vec<u8> },

    /// Capturing the EXIF payload
    Payload { declared: usize, buffer: BytesMut },

    /// Discarding a segment body
    Skip { remaining: usize },

    Found(Bytes),

    Failed(ScanError),
}

// =============================================================================
// ExifScanner
// =============================================================================

/// Locates the EXIF payload inside a JPEG byte stream.
#[derive(Debug)]
pub struct ExifScanner {
    state: State,
    consumed: u64,
}

impl Default for ExifScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ExifScanner {
    /// Create a scanner positioned at the start of a stream.
    pub fn new() -> Self {
        Self {
            state: State::Marker,
            consumed: 0,
        }
    }

    /// Push the next chunk of the stream.
    ///
    /// Once the payload is found or the scan has failed, the chunk is ignored
    /// and the same signal is returned again.
    pub fn feed(&mut self, mut chunk: &[u8]) -> FeedSignal {
        while !chunk.is_empty() && !self.is_done() {
            let taken = self.step(chunk);
            self.consumed += taken as u64;
            chunk = &chunk[taken..];
        }
        self.signal()
    }

    /// Signal end of input.
    ///
    /// Returns the captured payload, or the reason there is none:
    /// `MalformedMarker` when the EXIF segment was cut short, otherwise
    /// `ContainerNotFound`.
    pub fn finish(&mut self) -> Result<Bytes, ScanError> {
        let err = match &self.state {
            State::Found(payload) => return Ok(payload.clone()),
            State::Failed(err) => return Err(err.clone()),
            State::Payload { declared, buffer } => ScanError::MalformedMarker {
                marker: APP1[1],
                message: format!(
                    "EXIF segment declares {} payload bytes but the stream ended after {}",
                    declared,
                    buffer.len()
                ),
            },
            _ => ScanError::ContainerNotFound,
        };

        debug!(consumed = self.consumed, error = %err, "Stream ended without EXIF payload");
        self.state = State::Failed(err.clone());
        Err(err)
    }

    /// The captured payload, once found.
    pub fn payload(&self) -> Option<&Bytes> {
        match &self.state {
            State::Found(payload) => Some(payload),
            _ => None,
        }
    }

    /// Whether the payload has been captured.
    #[inline]
    pub fn is_found(&self) -> bool {
        matches!(self.state, State::Found(_))
    }

    /// Number of stream bytes consumed so far (bytes ignored after the
    /// payload was found are not counted).
    #[inline]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// The current signal without feeding anything.
    pub fn signal(&self) -> FeedSignal {
        match &self.state {
            State::Found(_) => FeedSignal::PayloadFound,
            State::Failed(err) => FeedSignal::Error(err.clone()),
            _ => FeedSignal::Continue,
        }
    }

    #[inline]
    fn is_done(&self) -> bool {
        matches!(self.state, State::Found(_) | State::Failed(_))
    }

    /// Advance the state machine over a non-empty chunk; returns bytes consumed.
    fn step(&mut self, chunk: &[u8]) -> usize {
        match &mut self.state {
            State::Marker => match chunk.iter().position(|&b| b == MARKER_PREFIX) {
                Some(pos) => {
                    self.state = State::MarkerCode;
                    pos + 1
                }
                None => chunk.len(),
            },

            State::MarkerCode => {
                let code = chunk[0];
                if code == MARKER_PREFIX {
                    // Fill byte, the code is still to come
                } else if has_length(code) {
                    self.state = State::Length { code, high: None };
                } else {
                    trace!(code, "Standalone marker");
                    self.state = State::Marker;
                }
                1
            }

            State::Length { code, high } => {
                let byte = chunk[0];
                match *high {
                    None => *high = Some(byte),
                    Some(h) => {
                        let code = *code;
                        let length = u16::from_be_bytes([h, byte]) as usize;
                        self.state = segment_state(code, length, self.consumed);
                    }
                }
                1
            }

            State::Identifier { remaining, seen } => {
                let n = (EXIF_IDENTIFIER.len() - seen.len()).min(chunk.len());
                seen.extend_from_slice(&chunk[..n]);
                *remaining -= n;

                if seen.len() == EXIF_IDENTIFIER.len() {
                    let matched = seen.as_slice() == &EXIF_IDENTIFIER[..];
                    let remaining = *remaining;
                    self.state = if matched {
                        debug!(
                            offset = self.consumed + n as u64,
                            length = remaining,
                            "Found EXIF segment"
                        );
                        payload_state(remaining)
                    } else {
                        skip_state(remaining)
                    };
                }
                n
            }

            State::Payload { declared, buffer } => {
                let n = (*declared - buffer.len()).min(chunk.len());
                buffer.extend_from_slice(&chunk[..n]);
                if buffer.len() == *declared {
                    let payload = std::mem::take(buffer).freeze();
                    self.state = State::Found(payload);
                }
                n
            }

            State::Skip { remaining } => {
                let n = (*remaining).min(chunk.len());
                *remaining -= n;
                if *remaining == 0 {
                    self.state = State::Marker;
                }
                n
            }

            State::Found(_) | State::Failed(_) => chunk.len(),
        }
    }
}

/// State following a segment length field.
fn segment_state(code: u8, length: usize, offset: u64) -> State {
    if length < SEGMENT_LENGTH_SIZE {
        return State::Failed(ScanError::MalformedMarker {
            marker: code,
            message: format!(
                "declared length {} at offset {} is shorter than the length field",
                length, offset
            ),
        });
    }

    let body = length - SEGMENT_LENGTH_SIZE;
    trace!(code, body, "Segment");

    if is_app1(code) && body >= EXIF_IDENTIFIER.len() {
        State::Identifier {
            remaining: body,
            seen: Vec::with_capacity(EXIF_IDENTIFIER.len()),
        }
    } else {
        skip_state(body)
    }
}

fn skip_state(remaining: usize) -> State {
    if remaining == 0 {
        State::Marker
    } else {
        State::Skip { remaining }
    }
}

fn payload_state(declared: usize) -> State {
    if declared == 0 {
        State::Found(Bytes::new())
    } else {
        State::Payload {
            declared,
            buffer: BytesMut::with_capacity(declared),
        }
    }
}

// =============================================================================
// Bulk Scanning
// =============================================================================

/// Scan a complete in-memory stream for the EXIF payload.
pub fn scan(data: &[u8]) -> Result<Bytes, ScanError> {
    let mut scanner = ExifScanner::new();
    if let FeedSignal::Error(err) = scanner.feed(data) {
        return Err(err);
    }
    scanner.finish()
}

// =============================================================================
// Tests
// =============================================================================
