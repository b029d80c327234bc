//! Error types for docweave.

use std::io;
use thiserror::Error;

/// Result type alias for docweave operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading and linearizing analysis results.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a valid analysis result (or completion response).
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// A table reported by the analysis service has no bounding regions.
    ///
    /// Fatal for the whole parse: no partial result is produced.
    #[error("Malformed table {index}: table has no bounding regions")]
    MalformedTable {
        /// Position of the table in the analysis result
        index: usize,
    },

    /// Error while rendering a table (CSV, JSON, grid).
    #[error("Rendering error: {0}")]
    Render(String),

    /// The requested table format name is not recognized.
    #[error("Unknown table format: {0} (expected csv, json, or grid)")]
    UnknownTableFormat(String),

    /// A chat completion tripped the content-safety filter.
    #[error("Content safety check failed: {0}")]
    ContentSafety(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(format!("CSV serialization error: {}", err))
    }
}
