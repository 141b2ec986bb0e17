//! exif-tags - Dump the EXIF tags of JPEG images.
//!
//! This binary reads each file given on the command line and prints its tags.

use std::fs::File;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exif_tags::{
    config::{Config, OutputFormat},
    open, read_from_with_chunk_size, ExifError, TagMap,
};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    let show_headers = config.paths.len() > 1;

    for path in &config.paths {
        match read_tags(path, &config) {
            Ok(tags) => {
                if let Err(e) = print_tags(path, &tags, config.format, show_headers) {
                    error!("{}: {}", path.display(), e);
                    failed = true;
                }
            }
            Err(e) if e.is_not_found() => {
                warn!("{}: no EXIF metadata", path.display());
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exif_tags=debug"
    } else {
        "exif_tags=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Read one file through the bulk or incremental path.
fn read_tags(path: &Path, config: &Config) -> Result<TagMap, ExifError> {
    if config.is_incremental() {
        debug!(path = %path.display(), chunk_size = config.chunk_size, "Reading incrementally");
        let file = File::open(path)?;
        read_from_with_chunk_size(file, config.chunk_size)
    } else {
        open(path)
    }
}

// =============================================================================
// Output
// =============================================================================

#[derive(Serialize)]
struct FileReport<'a> {
    path: String,
    tags: &'a TagMap,
}

fn print_tags(
    path: &Path,
    tags: &TagMap,
    format: OutputFormat,
    show_headers: bool,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => {
            if show_headers {
                println!("==> {} <==", path.display());
            }
            for (name, value) in tags {
                println!("{}: {}", name, value);
            }
            if show_headers {
                println!();
            }
        }
        OutputFormat::Json => {
            let report = FileReport {
                path: path.display().to_string(),
                tags,
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(())
}
