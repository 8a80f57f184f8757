//! # bounty-api: Binary Entry Point
//!
//! Loads configuration, installs tracing and the Prometheus recorder, and
//! serves the bounty ledger on the system clock.

use std::sync::Arc;

use bounty_api::config::AppConfig;
use bounty_api::state::{AppState, SharedClock};
use bounty_core::SystemClock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load(None)?;
    bounty_api::logging::init_tracing(config.log_format, "info")?;

    let handle = bounty_api::metrics::install_recorder()?;
    let clock: SharedClock = Arc::new(SystemClock);
    let state = AppState::from_config(&config, clock)?.with_metrics(handle);
    tracing::info!(accounts = config.accounts.len(), "treasury seeded");

    bounty_api::serve(&config, state).await
}
