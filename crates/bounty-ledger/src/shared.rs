//! # Shared Ledger Handle
//!
//! Concurrent hosts (the HTTP service) hold a [`SharedLedger`] instead of the
//! ledger itself. Every call takes the lock for its whole duration, so
//! operations are applied one at a time in lock-acquisition order.
//!
//! The lock is a `parking_lot::Mutex` and is synchronous. Callers must not
//! hold it across an `.await`; the closure-based [`SharedLedger::read`] and
//! [`SharedLedger::write`] make that hard to do by accident.

use std::sync::Arc;

use bounty_core::{Amount, BountyId, Clock, FulfillmentId, PartyId, Timestamp};
use parking_lot::Mutex;

use crate::error::LedgerError;
use crate::ledger::BountyLedger;
use crate::treasury::Treasury;

/// A cloneable, thread-safe handle to one [`BountyLedger`].
#[derive(Debug)]
pub struct SharedLedger<T, C> {
    inner: Arc<Mutex<BountyLedger<T, C>>>,
}

impl<T, C> Clone for SharedLedger<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Treasury, C: Clock> SharedLedger<T, C> {
    /// Wrap a ledger for shared use.
    pub fn new(ledger: BountyLedger<T, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Run `f` with shared access under the lock.
    pub fn read<R>(&self, f: impl FnOnce(&BountyLedger<T, C>) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Run `f` with exclusive access under the lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut BountyLedger<T, C>) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// See [`BountyLedger::issue_bounty`].
    pub fn issue_bounty(
        &self,
        caller: &PartyId,
        data: impl Into<String>,
        deadline: Timestamp,
        deposit: Amount,
    ) -> Result<BountyId, LedgerError> {
        self.write(|ledger| ledger.issue_bounty(caller, data, deadline, deposit))
    }

    /// See [`BountyLedger::fulfill_bounty`].
    pub fn fulfill_bounty(
        &self,
        caller: &PartyId,
        bounty: BountyId,
        data: impl Into<String>,
    ) -> Result<FulfillmentId, LedgerError> {
        self.write(|ledger| ledger.fulfill_bounty(caller, bounty, data))
    }

    /// See [`BountyLedger::accept_fulfillment`].
    pub fn accept_fulfillment(
        &self,
        caller: &PartyId,
        bounty: BountyId,
        fulfillment: FulfillmentId,
    ) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.accept_fulfillment(caller, bounty, fulfillment))
    }

    /// See [`BountyLedger::cancel_bounty`].
    pub fn cancel_bounty(&self, caller: &PartyId, bounty: BountyId) -> Result<(), LedgerError> {
        self.write(|ledger| ledger.cancel_bounty(caller, bounty))
    }

    /// See [`BountyLedger::escrow_balance`].
    pub fn escrow_balance(&self) -> Amount {
        self.read(BountyLedger::escrow_balance)
    }

    /// See [`BountyLedger::bounty_count`].
    pub fn bounty_count(&self) -> usize {
        self.read(BountyLedger::bounty_count)
    }
}
