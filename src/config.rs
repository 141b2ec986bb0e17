//! Configuration for the `exif-tags` command-line tool.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks using the `EXIF_` prefix:
//!
//! - `EXIF_FORMAT` - Output format, `text` or `json` (default: text)
//! - `EXIF_CHUNK_SIZE` - Read size for incremental parsing; 0 reads each file
//!   whole (default: 0)
//!
//! # Example
//!
//! ```ignore
//! use exif_tags::config::Config;
//!
//! let config = Config::parse();
//! config.validate()?;
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

// =============================================================================
// Default Values
// =============================================================================

/// Default chunk size: read each file in one go.
pub const DEFAULT_CLI_CHUNK_SIZE: usize = 0;

/// Largest accepted chunk size (16MB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// How tags are printed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `name: value` lines
    #[default]
    Text,
    /// One JSON object per file
    Json,
}

/// exif-tags - Dump the EXIF tags of JPEG images.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-tags")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Image files to read.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text, env = "EXIF_FORMAT")]
    pub format: OutputFormat,

    /// Read files incrementally in chunks of this many bytes, stopping as soon
    /// as the EXIF segment has been read.
    ///
    /// 0 reads each file whole.
    #[arg(long, default_value_t = DEFAULT_CLI_CHUNK_SIZE, env = "EXIF_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("At least one image path is required".to_string());
        }

        if self.paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err("Image paths must not be empty".to_string());
        }

        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(format!(
                "chunk_size must be at most {} bytes (16MB), got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            ));
        }

        Ok(())
    }

    /// Whether files are read incrementally rather than whole.
    pub fn is_incremental(&self) -> bool {
        self.chunk_size > 0
    }
}

// =============================================================================
// Tests
// =============================================================================
