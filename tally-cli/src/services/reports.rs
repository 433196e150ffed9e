//! Reporting Aggregator
//!
//! Read-only summaries computed client-side over raw rows. Reports are
//! tolerant of sparse data: rows missing the fields they aggregate are
//! skipped or counted as zero rather than failing the whole report.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use shared::models::{CustomerOrderCount, TopProduct};
use tally_store::{Filter, Row, RowStore};

use crate::error::AppResult;

const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";
const PRODUCTS: &str = "products";

/// Reporting operations
#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn RowStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    // ========== Sales ==========

    /// Products ranked by total quantity sold across all orders,
    /// regardless of order status. Ties keep first-seen order.
    pub async fn top_selling_products(&self, top_n: usize) -> AppResult<Vec<TopProduct>> {
        let orders = self.store.select(ORDERS, &[], None, None).await?;

        // first-seen insertion order makes the later sort stable on ties
        let mut totals: Vec<(i64, i64)> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for order in &orders {
            let Some(order_id) = order.get("order_id").and_then(Value::as_i64) else {
                continue;
            };
            let items = self
                .store
                .select(ORDER_ITEMS, &[Filter::eq("order_id", order_id)], None, None)
                .await?;
            for item in items {
                let Some(prod_id) = item.get("prod_id").and_then(Value::as_i64) else {
                    tracing::warn!(order_id, "order item without prod_id skipped");
                    continue;
                };
                let quantity = match item_quantity(&item) {
                    None => 0,
                    Some(value) => match value.as_i64() {
                        Some(quantity) => quantity,
                        None => {
                            tracing::warn!(order_id, prod_id, "non-numeric quantity skipped");
                            continue;
                        }
                    },
                };
                match index.get(&prod_id) {
                    Some(&at) => totals[at].1 += quantity,
                    None => {
                        index.insert(prod_id, totals.len());
                        totals.push((prod_id, quantity));
                    }
                }
            }
        }

        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals.truncate(top_n);

        let names = self.product_names().await?;
        Ok(totals
            .into_iter()
            .map(|(prod_id, quantity)| TopProduct {
                prod_id,
                product: names.get(&prod_id).cloned(),
                quantity,
            })
            .collect())
    }

    /// Revenue summed over orders dated within the previous calendar
    /// month (UTC), any status
    pub async fn total_revenue_last_month(&self) -> AppResult<f64> {
        self.total_revenue_last_month_at(Utc::now().naive_utc())
            .await
    }

    async fn total_revenue_last_month_at(&self, now: NaiveDateTime) -> AppResult<f64> {
        let Some((start, end)) = last_month_window(now) else {
            return Ok(0.0);
        };

        let orders = self.store.select(ORDERS, &[], None, None).await?;
        let mut total = 0.0;
        for order in &orders {
            let Some(placed_at) = order_timestamp(order) else {
                tracing::warn!("order without a parseable date skipped");
                continue;
            };
            if placed_at < start || placed_at > end {
                continue;
            }
            total += order_amount(order);
        }
        Ok(total)
    }

    // ========== Customers ==========

    /// Order counts per customer, in first-seen order
    pub async fn total_orders_per_customer(&self) -> AppResult<Vec<CustomerOrderCount>> {
        let orders = self.store.select(ORDERS, &[], None, None).await?;

        let mut counts: Vec<CustomerOrderCount> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();
        for order in &orders {
            let Some(cust_id) = order
                .get("cust_id")
                .or_else(|| order.get("customer_id"))
                .and_then(Value::as_i64)
            else {
                continue;
            };
            match index.get(&cust_id) {
                Some(&at) => counts[at].total_orders += 1,
                None => {
                    index.insert(cust_id, counts.len());
                    counts.push(CustomerOrderCount {
                        cust_id,
                        total_orders: 1,
                    });
                }
            }
        }
        Ok(counts)
    }

    /// Customers with strictly more than `min_orders` orders
    pub async fn frequent_customers(&self, min_orders: i64) -> AppResult<Vec<CustomerOrderCount>> {
        let counts = self.total_orders_per_customer().await?;
        Ok(counts
            .into_iter()
            .filter(|c| c.total_orders > min_orders)
            .collect())
    }

    // ========== Helpers ==========

    async fn product_names(&self) -> AppResult<HashMap<i64, String>> {
        let rows = self.store.select(PRODUCTS, &[], None, None).await?;
        let mut names = HashMap::new();
        for row in rows {
            if let (Some(prod_id), Some(name)) = (
                row.get("prod_id").and_then(Value::as_i64),
                row.get("name").and_then(Value::as_str),
            ) {
                names.insert(prod_id, name.to_string());
            }
        }
        Ok(names)
    }
}

/// Previous calendar month as an inclusive [start, end] pair
fn last_month_window(now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first_of_this = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?;
    let (prev_year, prev_month) = if now.month() == 1 {
        (now.year() - 1, 12)
    } else {
        (now.year(), now.month() - 1)
    };
    let first_of_prev = NaiveDate::from_ymd_opt(prev_year, prev_month, 1)?;

    let start = first_of_prev.and_hms_opt(0, 0, 0)?;
    let end = first_of_this.and_hms_opt(0, 0, 0)? - Duration::seconds(1);
    Some((start, end))
}

/// Line quantity with the legacy `qty` fallback: a null or zero
/// `quantity` defers to `qty`
fn item_quantity(item: &Row) -> Option<&Value> {
    [item.get("quantity"), item.get("qty")]
        .into_iter()
        .flatten()
        .find(|value| !value.is_null() && value.as_i64() != Some(0))
}

fn order_timestamp(order: &Row) -> Option<NaiveDateTime> {
    let raw = order
        .get("order_date")
        .or_else(|| order.get("created_at"))
        .or_else(|| order.get("order_date_iso"))?
        .as_str()?;
    parse_timestamp(raw)
}

/// Lenient timestamp parse: accepts RFC 3339 variants (offset dropped)
/// and bare dates
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let mut s = raw.trim();
    s = s.strip_suffix('Z').unwrap_or(s);
    if let Some(at) = s
        .char_indices()
        .skip(10)
        .find(|&(_, c)| c == '+' || c == '-')
        .map(|(i, _)| i)
    {
        s = &s[..at];
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn order_amount(order: &Row) -> f64 {
    match order.get("total_amount") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
