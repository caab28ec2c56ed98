//! Error types for the database crate.
//!
//! Loading errors (bad files, bad lines) and query errors (bad tokens,
//! nothing loaded) share one enum so the store and the matcher can both
//! return `Result<T>`.

use thiserror::Error;

/// Errors that can occur while loading the catalog or querying it
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Dataset file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the dataset
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in the dataset couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Dataset as a whole failed validation (e.g. mixed vector dimensions)
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A search token was empty or whitespace-only
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The store holds no movies
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DatabaseError>;
