//! Error and diagnostic types for asset conversion.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Failure to turn one input file into values.
///
/// Per-file: the pipeline records it as a [`Diagnostic`] and moves on.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {name} ({len} bytes, max {max} bytes)")]
    TooLarge { name: String, len: u64, max: u64 },

    #[error("Failed to decode image {name}: {source}")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{name} is empty")]
    Empty { name: String },

    #[error("Unsupported input: {name}")]
    Unsupported { name: String },

    #[error("Decoding {name} timed out after {}ms", after.as_millis())]
    Timeout { name: String, after: Duration },

    #[error("Decode task for {name} failed: {message}")]
    Task { name: String, message: String },

    #[error("{name} produces {count} distinct tiles (max {max})")]
    TooManyTiles { name: String, count: usize, max: usize },
}

/// Packaging failure. Terminal for the request.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Duplicate bundle entry: {0}")]
    DuplicateEntry(String),
}

/// Failure of a whole conversion request.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("All {failed} input file(s) failed to convert; no bundle produced")]
    AllInputsFailed { failed: usize },

    #[error("Packaging failed: {0}")]
    Archive(#[from] ArchiveError),
}

/// Non-fatal condition reported alongside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Extension is neither `.png` nor `.wav`; the file was skipped.
    UnrecognizedExtension { file: String },

    /// Two files derived the same symbol; the later one was dropped.
    SymbolCollision {
        symbol: String,
        kept: String,
        dropped: String,
    },

    /// The file could not be read or decoded.
    DecodeFailed { file: String, reason: String },

    /// The configured collision map symbol matched no input image.
    MissingMap { symbol: String },
}

impl Diagnostic {
    pub fn decode_failed(file: impl Into<String>, error: &DecodeError) -> Self {
        Diagnostic::DecodeFailed {
            file: file.into(),
            reason: error.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Diagnostic::DecodeFailed { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedExtension { file } => {
                write!(f, "{}: unrecognized extension, skipped", file)
            }
            Diagnostic::SymbolCollision {
                symbol,
                kept,
                dropped,
            } => write!(
                f,
                "{}: symbol '{}' already taken by {}, dropped",
                dropped, symbol, kept
            ),
            Diagnostic::DecodeFailed { file, reason } => write!(f, "{}: {}", file, reason),
            Diagnostic::MissingMap { symbol } => {
                write!(f, "collision map '{}' not found among input images", symbol)
            }
        }
    }
}
