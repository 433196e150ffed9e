//! The row store capability
//!
//! Tables hold JSON rows; callers filter by column equality only. All
//! mutations are independent round-trips with no transaction envelope
//! across calls.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// One row as returned by the store
pub type Row = serde_json::Map<String, Value>;

/// Column equality filter
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    /// Match rows where `column` equals `value`
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Result ordering on a single column
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Table-scoped row access
///
/// Implementations: [`crate::HttpStore`] (remote), [`crate::MemoryStore`]
/// (in-process).
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch rows matching every filter
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<OrderBy>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Row>>;

    /// Insert one row, returning the stored representation
    async fn insert(&self, table: &str, row: Row) -> StoreResult<Vec<Row>>;

    /// Set `fields` on every matching row, returning the updated rows
    async fn update(&self, table: &str, filters: &[Filter], fields: Row) -> StoreResult<Vec<Row>>;

    /// Remove matching rows, returning what was removed
    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>>;
}

/// Serialize a value into a row
pub fn to_row<T: Serialize>(value: &T) -> StoreResult<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidRow(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a row into a typed value
pub fn from_row<T: DeserializeOwned>(row: Row) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}
