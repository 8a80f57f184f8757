//! # Prometheus Metrics
//!
//! Domain metrics recorded through the `metrics` facade. The `bounty-api`
//! binary installs a Prometheus recorder and serves the rendered text at
//! `/metrics`. Without a recorder (tests, embedding) the macros are no-ops.
//!
//! | Metric                    | Type    | Labels                 |
//! |---------------------------|---------|------------------------|
//! | `bounty_operations_total` | counter | `operation`, `outcome` |
//! | `bounty_escrow_balance`   | gauge   |                        |
//! | `bounty_count`            | gauge   |                        |

use bounty_core::Amount;
use bounty_ledger::LedgerError;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Ledger operations by name and outcome (`ok` or the error code).
pub const OPERATIONS_TOTAL: &str = "bounty_operations_total";
/// Escrow balance in smallest units, as of the last mutation.
pub const ESCROW_BALANCE: &str = "bounty_escrow_balance";
/// Bounties ever issued, as of the last mutation.
pub const BOUNTY_COUNT: &str = "bounty_count";

/// Install the process-wide Prometheus recorder and describe all metrics.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(OPERATIONS_TOTAL, "Ledger operations by outcome");
    metrics::describe_gauge!(ESCROW_BALANCE, "Funds held in escrow, in smallest units");
    metrics::describe_gauge!(BOUNTY_COUNT, "Bounties ever issued");
    Ok(handle)
}

/// Count one ledger operation.
pub fn record_operation<R>(operation: &'static str, result: &Result<R, LedgerError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(err) => err.code(),
    };
    metrics::counter!(OPERATIONS_TOTAL, "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Publish the ledger totals after a mutation.
pub fn record_totals(escrow: Amount, bounty_count: usize) {
    // Gauges are f64; balances above 2^53 units lose precision.
    metrics::gauge!(ESCROW_BALANCE).set(escrow.units() as f64);
    metrics::gauge!(BOUNTY_COUNT).set(bounty_count as f64);
}
