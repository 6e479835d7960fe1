//! Custom error types for rustjournals.
//!
//! Library functions return `Result<T, JournalError>`; the binary wraps them
//! in `anyhow` for context.

use thiserror::Error;

/// Main error type for feed ingestion, archive persistence and summaries.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Feed document could not be downloaded or parsed
    #[error("Feed error: {0}")]
    Feed(String),

    /// HTML/XML parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// External API returned an error
    #[error("API error: {code} - {message}")]
    Api {
        /// HTTP status code
        code: i32,
        /// Error message from API
        message: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Archive file exists but cannot be read as an archive
    #[error("Archive {path} is unreadable: {reason}")]
    ArchiveCorrupt {
        /// Archive location
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using `JournalError`
pub type Result<T> = std::result::Result<T, JournalError>;
