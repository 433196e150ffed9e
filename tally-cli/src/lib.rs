//! Retail back-office over a remote row store
//!
//! Services validate and orchestrate round-trips against the injected
//! [`tally_store::RowStore`]; the CLI layer parses one subcommand per
//! invocation and prints the result as JSON.

pub mod cli;
pub mod error;
pub mod logger;
pub mod services;

pub use error::{AppError, AppResult};
