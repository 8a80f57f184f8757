//! # Route Modules
//!
//! - [`bounties`]: issue, list, inspect and cancel bounties.
//! - [`fulfillments`]: submit, list, inspect and accept fulfillments.
//! - [`ledger`]: escrow totals, the event journal and treasury balances.

pub mod bounties;
pub mod fulfillments;
pub mod ledger;

use bounty_ledger::LedgerError;

use crate::metrics;
use crate::state::Ledger;

/// Record metrics for a ledger operation performed under the lock.
pub(crate) fn observe<R>(operation: &'static str, result: &Result<R, LedgerError>, ledger: &Ledger) {
    metrics::record_operation(operation, result);
    if result.is_ok() {
        metrics::record_totals(ledger.escrow_balance(), ledger.bounty_count());
    }
}
