//! Store error types

use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request
    #[error("Store request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// A row did not have the shape the caller expected
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
