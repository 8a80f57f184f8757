//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The ledger lives behind a [`SharedLedger`], whose lock is a synchronous
//! `parking_lot::Mutex`. Handlers do all ledger work inside a single
//! `read`/`write` closure and never hold the lock across `.await`.

use std::sync::Arc;

use bounty_core::{Clock, SystemClock};
use bounty_ledger::{BountyLedger, InMemoryTreasury, SharedLedger};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::{AppConfig, ConfigError};

/// The clock handle the service runs on.
pub type SharedClock = Arc<dyn Clock>;

/// The ledger type served over HTTP.
pub type Ledger = BountyLedger<InMemoryTreasury, SharedClock>;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The bounty ledger.
    pub ledger: SharedLedger<InMemoryTreasury, SharedClock>,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// An empty ledger on the system clock with no funded accounts.
    pub fn new() -> Self {
        let clock: SharedClock = Arc::new(SystemClock);
        Self::with_ledger(BountyLedger::new(InMemoryTreasury::new(), clock))
    }

    /// Serve an existing ledger.
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: SharedLedger::new(ledger),
            metrics: None,
        }
    }

    /// A ledger on `clock` whose treasury is seeded from `config.accounts`.
    pub fn from_config(config: &AppConfig, clock: SharedClock) -> Result<Self, ConfigError> {
        let treasury = config.treasury()?;
        Ok(Self::with_ledger(BountyLedger::new(treasury, clock)))
    }

    /// Attach a Prometheus handle so `/metrics` can render it.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
