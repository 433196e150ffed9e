//! Services Module
//!
//! One service per aggregate, each holding the row store capability it
//! was constructed with (no ambient store handle). Services validate,
//! then talk to the store; multi-step mutations are plain sequences of
//! round-trips with no transactional envelope.

pub mod catalog;
pub mod directory;
pub mod orders;
pub mod payments;
pub mod reports;

// Re-exports
pub use catalog::CatalogService;
pub use directory::CustomerService;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use reports::ReportService;

use tally_store::{Filter, Row, RowStore, StoreError};

use crate::error::{AppError, AppResult};

/// Default page size for list-style reads
pub(crate) const LIST_LIMIT: usize = 100;

/// Fetch at most one row matching the filters
pub(crate) async fn find_one(
    store: &dyn RowStore,
    table: &str,
    filters: &[Filter],
) -> AppResult<Option<Row>> {
    let rows = store.select(table, filters, None, Some(1)).await?;
    Ok(rows.into_iter().next())
}

/// Take the first row of a write response; the store echoes affected
/// rows, so an empty response means the write went wrong
pub(crate) fn expect_row(rows: Vec<Row>) -> AppResult<Row> {
    rows.into_iter()
        .next()
        .ok_or_else(|| AppError::Store(StoreError::InvalidRow("write returned no rows".into())))
}
