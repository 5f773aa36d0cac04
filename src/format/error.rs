//! Error types for export operations.

use thiserror::Error;

/// Errors that can occur while exporting annotations.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error while writing the export file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No format registered under this id
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Session has no pages loaded
    #[error("Nothing to export: no pages loaded")]
    NothingToExport,
}

impl FormatError {
    /// Create an unknown format error.
    pub fn unknown_format(id: impl Into<String>) -> Self {
        Self::UnknownFormat(id.into())
    }
}
