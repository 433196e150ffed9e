//! HTTP implementation of the row store
//!
//! Speaks PostgREST conventions: equality filters as `?col=eq.value`
//! query parameters, `order`/`limit` parameters, and
//! `Prefer: return=representation` so writes echo the affected rows.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::store::{Filter, OrderBy, Row, RowStore};

/// Remote row store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpStore {
    /// Create a new HTTP store from configuration
    pub fn new(config: &StoreConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Start a request against one table, with auth headers attached
    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), table);
        tracing::debug!(%method, url, "dispatching store request");
        self.client
            .request(method, &url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Handle the HTTP response, expecting a JSON array of rows
    async fn handle_response(response: reqwest::Response) -> StoreResult<Vec<Row>> {
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), message, "store rejected request");
            return Err(StoreError::Request {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(Into::into)
    }
}

/// Render a filter value the way PostgREST expects it in a query string
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build the query pairs for filters, ordering and limit
fn query_pairs(
    filters: &[Filter],
    order: Option<&OrderBy>,
    limit: Option<usize>,
) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = filters
        .iter()
        .map(|f| {
            let value = match &f.value {
                // equality against NULL needs the `is` operator
                Value::Null => "is.null".to_string(),
                other => format!("eq.{}", render_value(other)),
            };
            (f.column.clone(), value)
        })
        .collect();

    if let Some(order) = order {
        let direction = if order.ascending { "asc" } else { "desc" };
        pairs.push(("order".into(), format!("{}.{}", order.column, direction)));
    }

    if let Some(limit) = limit {
        pairs.push(("limit".into(), limit.to_string()));
    }

    pairs
}

#[async_trait]
impl RowStore for HttpStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<OrderBy>,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Row>> {
        let mut pairs = query_pairs(filters, order.as_ref(), limit);
        pairs.push(("select".into(), "*".into()));

        let response = self
            .request(Method::GET, table)
            .query(&pairs)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn insert(&self, table: &str, row: Row) -> StoreResult<Vec<Row>> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(&Value::Object(row))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn update(&self, table: &str, filters: &[Filter], fields: Row) -> StoreResult<Vec<Row>> {
        let pairs = query_pairs(filters, None, None);
        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&pairs)
            .json(&Value::Object(fields))
            .send()
            .await?;
        Self::handle_response(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<Vec<Row>> {
        let pairs = query_pairs(filters, None, None);
        let response = self
            .request(Method::DELETE, table)
            .header("Prefer", "return=representation")
            .query(&pairs)
            .send()
            .await?;
        Self::handle_response(response).await
    }
}
