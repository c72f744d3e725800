//! Error types for vector store operations.

use sift_filter::FilterError;
use thiserror::Error;

/// Common result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Vector store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filter expression was malformed or referenced a disallowed field
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// The request itself was unusable (dimension mismatch, zero vector)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying backend failure
    #[error("backend error: {0}")]
    Backend(String),
}
