//! Order Model
//!
//! An order exclusively owns its line items; items have no identity
//! outside the order. Line item prices are snapshots taken at order
//! creation, not live references to the product price.

use serde::{Deserialize, Serialize};

/// Order status lifecycle
///
/// PLACED is the only non-terminal status: it may move to CANCELLED or
/// COMPLETED, and nothing transitions out of those.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Placed,
    Cancelled,
    Completed,
}

impl OrderStatus {
    /// Terminal statuses have no outgoing transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Placed => write!(f, "PLACED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Order header as stored in the `orders` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: i64,
    pub cust_id: i64,
    pub status: OrderStatus,
    pub total_amount: f64,
    /// ISO-8601 timestamp assigned by the store (or by the service at insert)
    pub order_date: Option<String>,

    // -- Relations (populated by application code) --
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// Line item as stored in the `order_items` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: i64,
    pub order_id: i64,
    pub prod_id: i64,
    pub quantity: i64,
    /// Unit price captured at order time
    pub price: f64,
}

/// One requested line of a new order: product + quantity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub prod_id: i64,
    pub quantity: i64,
}
