//! Error types for lector operations.

use thiserror::Error;

use crate::format::Format;

/// Errors that can occur while ingesting a document or driving playback.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Archive is corrupt or not a ZIP container: {0}")]
    ContainerCorrupt(String),

    #[error("Archive is missing required entry: {0}")]
    ContainerMissingEntry(String),

    #[error("Could not extract readable text from {format} file. {hint}")]
    UnrecoverableBinaryFormat { format: Format, hint: &'static str },

    #[error("{0}")]
    FormatNotSupported(String),

    #[error("Archive entry could not be decoded as text: {0}")]
    MalformedArchiveEntry(String),

    #[error("Invalid reading rate: {0} words per minute")]
    InvalidRate(i64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
