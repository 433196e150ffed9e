//! Payment Model
//!
//! Exactly one payment row per order, keyed by `order_id`. A payment is
//! a separate aggregate from the order so it can be created at any time
//! after the order exists.

use serde::{Deserialize, Serialize};

/// Payment status lifecycle: PENDING -> PAID -> REFUNDED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

/// Payment record as stored in the `payments` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: i64,
    pub amount: f64,
    pub status: PaymentStatus,
    /// Set when the payment is processed (e.g. "card", "cash")
    pub method: Option<String>,
}
