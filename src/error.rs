use thiserror::Error;

/// Errors raised while locating the EXIF payload in an image byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The stream ended without an APP1 segment carrying the EXIF identifier
    #[error("No EXIF container found in stream")]
    ContainerNotFound,

    /// A marker segment declares a length that the stream cannot satisfy
    #[error("Malformed marker 0xFF{marker:02X}: {message}")]
    MalformedMarker { marker: u8, message: String },
}

/// Errors that can occur when parsing the TIFF container inside the EXIF payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// Payload is too small to contain a valid TIFF header
    #[error("Container too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: usize, actual: usize },

    /// Invalid byte-order signature (not II or MM)
    #[error("Invalid byte-order signature: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42, got {0}")]
    InvalidVersion(u16),

    /// Directory offset points outside the payload
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u32),

    /// Entry value does not fit inside the payload
    #[error(
        "Truncated value for tag 0x{tag:04X}: {length} bytes at offset {offset}, payload is {size} bytes"
    )]
    TruncatedValue {
        tag: u16,
        offset: u64,
        length: u64,
        size: usize,
    },
}

/// Errors surfaced by the public reader API
#[derive(Debug, Error)]
pub enum ExifError {
    /// Locating the EXIF payload failed
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The payload was found but its container header is unusable
    #[error("Invalid header: {0}")]
    InvalidHeader(TiffError),

    /// `resolve` was called before the scanner signalled that the payload was found
    #[error("EXIF payload has not been located yet")]
    PayloadNotLocated,

    /// Reading the source failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExifError {
    /// True when the source simply carries no EXIF metadata.
    ///
    /// Lets callers tell "nothing there" apart from "present but unreadable".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExifError::Scan(ScanError::ContainerNotFound))
    }
}
