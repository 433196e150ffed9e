//! Report Rows
//!
//! Computed output of the reporting aggregator. These are derived views,
//! never written back to the store.

use serde::{Deserialize, Serialize};

/// Top-seller row: total quantity sold for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub prod_id: i64,
    /// Product name, None when the product row no longer exists
    pub product: Option<String>,
    pub quantity: i64,
}

/// Orders-per-customer row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrderCount {
    pub cust_id: i64,
    pub total_orders: i64,
}
