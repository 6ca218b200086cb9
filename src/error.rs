// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Geofeed source failed: {0}")]
    Source(#[source] std::io::Error),

    #[error("Range sink failed: {0}")]
    Sink(#[source] std::io::Error),

    #[error("Found no valid IP range lines from source")]
    NoValidRanges,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
