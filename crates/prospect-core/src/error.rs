//! Error types for the core data model.

use thiserror::Error;

/// Errors that can occur in core record handling.
#[derive(Error, Debug)]
pub enum Error {
    /// Export was requested but no records matched.
    #[error("nothing to export: no records matched")]
    NoRecords,

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
