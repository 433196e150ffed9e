//! Row store gateway
//!
//! Everything in the back office lives in a remote tabular row store
//! reached over request/response calls. This crate owns that seam:
//!
//! - [`RowStore`]: table-scoped insert/select/update/delete with
//!   equality filters, optional ordering and a row limit
//! - [`HttpStore`]: PostgREST-style HTTP implementation
//! - [`MemoryStore`]: in-process implementation for tests and offline use
//! - [`StoreConfig`]: environment-driven configuration

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod store;

// Re-exports
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use store::{from_row, to_row, Filter, OrderBy, Row, RowStore};
