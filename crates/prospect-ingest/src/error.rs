//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Errors that can occur during ingestion.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse error that affected the whole file, not a single row.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File system watching error.
    #[error("File watching error: {0}")]
    Watch(String),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}
