//! Application error handling
//!
//! Every business-rule failure surfaces as a typed [`AppError`] variant.
//! No operation retries or recovers locally; a failure is terminal for
//! the invoking command. The reporting aggregator is the one exception,
//! and it handles malformed rows itself by skipping them.

use tally_store::StoreError;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Validation ==========
    #[error("Price must be greater than 0")]
    InvalidPrice,

    #[error("Payment amount must be greater than 0")]
    InvalidAmount,

    #[error("Restock delta must be positive")]
    InvalidDelta,

    #[error("No fields provided for update")]
    NoFieldsProvided,

    // ========== Uniqueness ==========
    #[error("SKU already exists: {0}")]
    DuplicateSku(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    // ========== Existence ==========
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    // ========== State machine ==========
    #[error("Cannot {action} {kind} with status {status}")]
    InvalidTransition {
        kind: &'static str,
        action: &'static str,
        status: String,
    },

    // ========== Capacity ==========
    #[error("Not enough stock for product {0}")]
    InsufficientStock(String),

    // ========== Referential ==========
    #[error("Cannot delete customer with existing orders")]
    HasExistingOrders,

    // ========== Store ==========
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(kind: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid_transition(
        kind: &'static str,
        action: &'static str,
        status: impl std::fmt::Display,
    ) -> Self {
        Self::InvalidTransition {
            kind,
            action,
            status: status.to_string(),
        }
    }
}

/// Result type for application operations
pub type AppResult<T> = Result<T, AppError>;
