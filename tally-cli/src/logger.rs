//! Logging Infrastructure
//!
//! Structured logging setup. `RUST_LOG` wins when set; otherwise the
//! level passed by the caller (from `LOG_LEVEL`) applies.

use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger(log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();
}
