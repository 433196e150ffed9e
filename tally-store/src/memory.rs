//! In-memory implementation of the row store
//!
//! Behaves like the remote store for everything the services rely on:
//! auto-assigned integer primary keys, equality filtering, optional
//! ordering and limits, writes echoing the affected rows. Used by the
//! test suites and for offline runs.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::store::{Filter, OrderBy, Row, RowStore};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,
    next_id: i64,
}

/// In-process row store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serial primary key column for the known tables
    ///
    /// `payments` is keyed by the caller-supplied `order_id`, so it gets
    /// no generated key.
    fn primary_key(table: &str) -> Option<&'static str> {
        match table {
            "products" => Some("prod_id"),
            "customers" => Some("cust_id"),
            "orders" => Some("order_id"),
            "order_items" => Some("item_id"),
            _ => None,
        }
    }
}

fn matches(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| row.get(&f.column) == Some(&f.value))
}

/// Column comparison for ordering: numeric when both sides are numbers,
/// lexicographic otherwise
fn compare(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(std::cmp::Ordering::Equal),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => std::cmp::Ordering::Equal,
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<OrderBy>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Row>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|t| {
                t.rows
                    .iter()
                    .filter(|row| matches(row, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let entry = tables.entry(table.to_string()).or_default();

        if let Some(key) = Self::primary_key(table) {
            if !row.contains_key(key) {
                entry.next_id += 1;
                row.insert(key.to_string(), Value::from(entry.next_id));
            }
        }

        entry.rows.push(row.clone());
        Ok(vec![row])
    }

    async fn update(&self, table: &str, filters: &[Filter], fields: Row) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let mut updated = Vec::new();

        if let Some(entry) = tables.get_mut(table) {
            for row in entry.rows.iter_mut().filter(|row| matches(row, filters)) {
                for (column, value) in &fields {
                    row.insert(column.clone(), value.clone());
                }
                updated.push(row.clone());
            }
        }

        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        let mut tables = self.tables.write().await;
        let mut removed = Vec::new();

        if let Some(entry) = tables.get_mut(table) {
            entry.rows.retain(|row| {
                if matches(row, filters) {
                    removed.push(row.clone());
                    false
                } else {
                    true
                }
            });
        }

        Ok(removed)
    }
}
