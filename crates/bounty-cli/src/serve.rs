//! # Serve Subcommand
//!
//! Runs the HTTP API on the system clock. Settings come from the config
//! file (`--config` or `BOUNTY_CONFIG`) and environment, then from flags.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use bounty_api::config::AppConfig;
use bounty_api::state::{AppState, SharedClock};
use bounty_core::SystemClock;

/// Arguments for `bounty serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind, overriding config and `BOUNTY_HOST`.
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overriding config and `BOUNTY_PORT`.
    #[arg(long)]
    pub port: Option<u16>,

    /// Install the Prometheus recorder and serve `/metrics`.
    #[arg(long)]
    pub metrics: bool,
}

/// Execute the serve subcommand. Blocks until the server exits.
pub fn run_serve(args: &ServeArgs, config_path: Option<&Path>) -> Result<u8> {
    let mut config = AppConfig::load(config_path).context("loading configuration")?;
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let clock: SharedClock = Arc::new(SystemClock);
    let mut state = AppState::from_config(&config, clock).context("seeding treasury")?;
    if args.metrics {
        let handle = bounty_api::metrics::install_recorder()
            .context("installing Prometheus recorder")?;
        state = state.with_metrics(handle);
    }

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(bounty_api::serve(&config, state))?;
    Ok(0)
}
