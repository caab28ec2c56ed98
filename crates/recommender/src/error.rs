//! Errors surfaced by recommender backends and the dispatchers in front of them.

use crate::types::Strategy;
use database::DatabaseError;
use thiserror::Error;

/// Every failure a caller can see from a recommendation or search request.
///
/// An empty result is never an error; it is an empty stream.
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// The dispatcher was asked for a strategy it doesn't serve.
    /// Raised before any backend is touched.
    #[error("Strategy mismatch: dispatcher serves '{expected}' but '{requested}' was requested")]
    StrategyMismatch { expected: Strategy, requested: String },

    /// Malformed input, e.g. an empty search token or a zero `max_count`
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The movie store is empty or not loaded
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Anything else that went wrong inside a backend
    #[error("Backend fault: {0}")]
    BackendFault(String),
}

impl From<DatabaseError> for RecommenderError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::InvalidQuery(msg) => Self::InvalidQuery(msg),
            DatabaseError::DataUnavailable(msg) => Self::DataUnavailable(msg),
            other => Self::BackendFault(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for RecommenderError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::BackendFault(format!("worker task failed: {err}"))
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_keep_their_category() {
        let err: RecommenderError = DatabaseError::InvalidQuery("token 0 is empty".into()).into();
        assert!(matches!(err, RecommenderError::InvalidQuery(_)));

        let err: RecommenderError = DatabaseError::DataUnavailable("empty".into()).into();
        assert!(matches!(err, RecommenderError::DataUnavailable(_)));

        let err: RecommenderError = DatabaseError::ValidationError("bad".into()).into();
        assert!(matches!(err, RecommenderError::BackendFault(_)));
    }

    #[test]
    fn test_mismatch_message_names_both_strategies() {
        let err = RecommenderError::StrategyMismatch {
            expected: Strategy::ParallelFlux,
            requested: "sequentialloop".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("parallelflux"));
        assert!(msg.contains("sequentialloop"));
    }
}
