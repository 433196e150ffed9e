//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity as stored in the `products` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub prod_id: i64,
    pub name: String,
    /// Stock-keeping unit, unique across the catalog
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub category: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub stock: Option<i64>,
    pub category: Option<String>,
}

/// Update product payload; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductUpdate {
    /// True when no field is set, which callers must reject
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.sku.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.category.is_none()
    }
}
