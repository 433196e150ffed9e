//! Application entry point

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use tally_cli::cli::{self, Cli};
use tally_cli::logger::init_logger;
use tally_store::{RowStore, StoreConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    let store: Arc<dyn RowStore> = match StoreConfig::from_env() {
        Ok(config) => Arc::new(config.build_http_store()),
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli.command, store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
