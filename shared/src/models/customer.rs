//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity as stored in the `customers` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub cust_id: i64,
    pub name: String,
    /// Unique across the directory
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

/// Update customer payload (phone and/or city only); unset fields are
/// left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.city.is_none()
    }
}
