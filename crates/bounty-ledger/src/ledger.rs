//! # Bounty Ledger
//!
//! The ledger aggregate: an append-only sequence of bounties, the escrow
//! balance backing every open bounty, and the event journal.
//!
//! ## Escrow Invariant
//!
//! At every point between calls, the tracked escrow balance equals the sum
//! of `reward` over bounties in `CREATED`. Issuance raises it by the
//! deposit; acceptance and cancellation each lower it by the bounty's reward
//! exactly once. [`BountyLedger::verify_escrow`] recomputes the sum and
//! reports any disagreement.
//!
//! ## Atomicity
//!
//! Each operation validates every precondition before touching the
//! treasury, performs the single treasury transfer, and only then commits
//! its state change and journal entry. A refused transfer returns
//! [`LedgerError::TransferFailed`] with the ledger untouched.

use bounty_core::{Amount, BountyId, Clock, FulfillmentId, LedgerId, PartyId, Timestamp};
use tracing::{debug, info, warn};

use crate::bounty::{Bounty, BountyStatus, Fulfillment};
use crate::error::{LedgerError, Lookup};
use crate::event::{EventRecord, LedgerEvent};
use crate::treasury::Treasury;

/// An escrowed-bounty ledger over treasury `T` and clock `C`.
#[derive(Debug)]
pub struct BountyLedger<T, C> {
    id: LedgerId,
    bounties: Vec<Bounty>,
    escrow: Amount,
    journal: Vec<EventRecord>,
    treasury: T,
    clock: C,
}

impl<T: Treasury, C: Clock> BountyLedger<T, C> {
    /// An empty ledger with a fresh [`LedgerId`].
    pub fn new(treasury: T, clock: C) -> Self {
        Self::with_id(LedgerId::new(), treasury, clock)
    }

    /// An empty ledger with a caller-chosen identifier.
    pub fn with_id(id: LedgerId, treasury: T, clock: C) -> Self {
        Self {
            id,
            bounties: Vec::new(),
            escrow: Amount::ZERO,
            journal: Vec::new(),
            treasury,
            clock,
        }
    }

    // ── Mutating operations ─────────────────────────────────────────

    /// Create a bounty funded by `deposit` from `caller`.
    ///
    /// No deadline check is made: a bounty may be issued with a deadline
    /// already in the past, in which case it can only be cancelled.
    pub fn issue_bounty(
        &mut self,
        caller: &PartyId,
        data: impl Into<String>,
        deadline: Timestamp,
        deposit: Amount,
    ) -> Result<BountyId, LedgerError> {
        let result = self.try_issue(caller, data.into(), deadline, deposit);
        log_outcome("issue", caller, &result);
        result
    }

    /// Submit a claim against an open bounty.
    pub fn fulfill_bounty(
        &mut self,
        caller: &PartyId,
        bounty: BountyId,
        data: impl Into<String>,
    ) -> Result<FulfillmentId, LedgerError> {
        let result = self.try_fulfill(caller, bounty, data.into());
        log_outcome("fulfill", caller, &result);
        result
    }

    /// Accept `fulfillment` and pay the reward to its submitter.
    ///
    /// Acceptance is not bound by the deadline: a claim submitted in time
    /// can be accepted later.
    pub fn accept_fulfillment(
        &mut self,
        caller: &PartyId,
        bounty: BountyId,
        fulfillment: FulfillmentId,
    ) -> Result<(), LedgerError> {
        let result = self.try_accept(caller, bounty, fulfillment);
        log_outcome("accept", caller, &result);
        result
    }

    /// Cancel an open bounty and refund the reward to its issuer.
    pub fn cancel_bounty(&mut self, caller: &PartyId, bounty: BountyId) -> Result<(), LedgerError> {
        let result = self.try_cancel(caller, bounty);
        log_outcome("cancel", caller, &result);
        result
    }

    fn try_issue(
        &mut self,
        caller: &PartyId,
        data: String,
        deadline: Timestamp,
        deposit: Amount,
    ) -> Result<BountyId, LedgerError> {
        if deposit.is_zero() {
            return Err(LedgerError::InvalidDeposit { amount: deposit });
        }
        let escrow = self
            .escrow
            .checked_add(deposit)
            .ok_or(LedgerError::BalanceOverflow {
                escrow: self.escrow,
                amount: deposit,
            })?;

        self.treasury
            .deposit(caller, deposit)
            .map_err(|source| LedgerError::TransferFailed {
                operation: "issue",
                amount: deposit,
                source,
            })?;

        let now = self.clock.now();
        let id = BountyId(self.bounties.len());
        self.bounties
            .push(Bounty::new(caller.clone(), data, deadline, deposit, now));
        self.escrow = escrow;
        self.emit(
            now,
            LedgerEvent::BountyIssued {
                bounty: id,
                issuer: caller.clone(),
                reward: deposit,
                deadline,
            },
        );
        Ok(id)
    }

    fn try_fulfill(
        &mut self,
        caller: &PartyId,
        id: BountyId,
        data: String,
    ) -> Result<FulfillmentId, LedgerError> {
        let now = self.clock.now();
        let bounty = self
            .bounties
            .get_mut(id.index())
            .ok_or(LedgerError::NotFound(Lookup::Bounty(id)))?;
        bounty.require_open(id, "fulfill")?;
        if &bounty.issuer == caller {
            return Err(LedgerError::SelfFulfillmentForbidden {
                bounty: id,
                caller: caller.clone(),
            });
        }
        if !bounty.accepts_submissions_at(now) {
            return Err(LedgerError::DeadlinePassed {
                bounty: id,
                deadline: bounty.deadline,
                now,
            });
        }

        let fulfillment = bounty.append_fulfillment(caller.clone(), data, now);
        let issuer = bounty.issuer.clone();
        self.emit(
            now,
            LedgerEvent::BountyFulfilled {
                bounty: id,
                fulfillment,
                fulfiller: caller.clone(),
                issuer,
            },
        );
        Ok(fulfillment)
    }

    fn try_accept(
        &mut self,
        caller: &PartyId,
        id: BountyId,
        fulfillment: FulfillmentId,
    ) -> Result<(), LedgerError> {
        let bounty = self.bounty(id)?;
        bounty.require_issuer(id, caller, "accept fulfillments of")?;
        bounty.require_open(id, "accept a fulfillment of")?;
        let fulfiller = bounty
            .fulfillment(fulfillment)
            .ok_or(LedgerError::NotFound(Lookup::Fulfillment(id, fulfillment)))?
            .fulfiller
            .clone();
        let reward = bounty.reward;
        let escrow = self.release(reward)?;

        self.treasury
            .payout(&fulfiller, reward)
            .map_err(|source| LedgerError::TransferFailed {
                operation: "accept",
                amount: reward,
                source,
            })?;

        let now = self.clock.now();
        if let Some(bounty) = self.bounties.get_mut(id.index()) {
            bounty.mark_accepted(fulfillment, now, caller.clone());
        }
        self.escrow = escrow;
        self.emit(
            now,
            LedgerEvent::FulfillmentAccepted {
                bounty: id,
                fulfillment,
                issuer: caller.clone(),
                fulfiller,
                reward,
            },
        );
        Ok(())
    }

    fn try_cancel(&mut self, caller: &PartyId, id: BountyId) -> Result<(), LedgerError> {
        let bounty = self.bounty(id)?;
        bounty.require_issuer(id, caller, "cancel")?;
        bounty.require_open(id, "cancel")?;
        let reward = bounty.reward;
        let escrow = self.release(reward)?;

        self.treasury
            .payout(caller, reward)
            .map_err(|source| LedgerError::TransferFailed {
                operation: "cancel",
                amount: reward,
                source,
            })?;

        let now = self.clock.now();
        if let Some(bounty) = self.bounties.get_mut(id.index()) {
            bounty.mark_cancelled(now, caller.clone());
        }
        self.escrow = escrow;
        self.emit(
            now,
            LedgerEvent::BountyCancelled {
                bounty: id,
                issuer: caller.clone(),
                reward,
            },
        );
        Ok(())
    }

    /// Escrow balance after releasing `reward`, computed before any payout.
    fn release(&self, reward: Amount) -> Result<Amount, LedgerError> {
        self.escrow
            .checked_sub(reward)
            .ok_or_else(|| LedgerError::EscrowMismatch {
                tracked: self.escrow,
                expected: self.open_rewards().map_or_else(
                    || "overflow".to_string(),
                    |sum| sum.to_string(),
                ),
            })
    }

    fn emit(&mut self, at: Timestamp, event: LedgerEvent) {
        let sequence = self.journal.len() as u64;
        match &event {
            LedgerEvent::BountyIssued {
                bounty,
                issuer,
                reward,
                deadline,
            } => info!(
                ledger = %self.id, sequence, %bounty, caller = %issuer, %reward, %deadline,
                "bounty issued"
            ),
            LedgerEvent::BountyFulfilled {
                bounty,
                fulfillment,
                fulfiller,
                ..
            } => info!(
                ledger = %self.id, sequence, %bounty, %fulfillment, caller = %fulfiller,
                "bounty fulfilled"
            ),
            LedgerEvent::FulfillmentAccepted {
                bounty,
                fulfillment,
                issuer,
                reward,
                ..
            } => info!(
                ledger = %self.id, sequence, %bounty, %fulfillment, caller = %issuer, %reward,
                "fulfillment accepted"
            ),
            LedgerEvent::BountyCancelled {
                bounty,
                issuer,
                reward,
            } => info!(
                ledger = %self.id, sequence, %bounty, caller = %issuer, %reward,
                "bounty cancelled"
            ),
        }
        self.journal.push(EventRecord {
            sequence,
            ledger: self.id,
            emitted_at: at,
            event,
        });
    }

    // ── Read accessors ──────────────────────────────────────────────

    /// Number of bounties ever issued.
    pub fn bounty_count(&self) -> usize {
        self.bounties.len()
    }

    /// The bounty at `id`.
    pub fn bounty(&self, id: BountyId) -> Result<&Bounty, LedgerError> {
        self.bounties
            .get(id.index())
            .ok_or(LedgerError::NotFound(Lookup::Bounty(id)))
    }

    /// The status of the bounty at `id`.
    pub fn bounty_status(&self, id: BountyId) -> Result<BountyStatus, LedgerError> {
        self.bounty(id).map(|bounty| bounty.status)
    }

    /// Number of fulfillments submitted against `id`.
    pub fn fulfillment_count(&self, id: BountyId) -> Result<usize, LedgerError> {
        self.bounty(id).map(Bounty::fulfillment_count)
    }

    /// All fulfillments of `id`, in submission order.
    pub fn fulfillments(&self, id: BountyId) -> Result<&[Fulfillment], LedgerError> {
        self.bounty(id).map(|bounty| bounty.fulfillments.as_slice())
    }

    /// Fulfillment `fulfillment` of bounty `id`.
    pub fn fulfillment(
        &self,
        id: BountyId,
        fulfillment: FulfillmentId,
    ) -> Result<&Fulfillment, LedgerError> {
        self.bounty(id)?
            .fulfillment(fulfillment)
            .ok_or(LedgerError::NotFound(Lookup::Fulfillment(id, fulfillment)))
    }

    /// Every bounty with its identifier, in issuance order.
    pub fn bounties(&self) -> impl ExactSizeIterator<Item = (BountyId, &Bounty)> + '_ {
        self.bounties
            .iter()
            .enumerate()
            .map(|(index, bounty)| (BountyId(index), bounty))
    }

    /// Total reward currently held for open bounties.
    pub fn escrow_balance(&self) -> Amount {
        self.escrow
    }

    /// This ledger's identifier.
    pub fn ledger_id(&self) -> LedgerId {
        self.id
    }

    /// The full event journal.
    pub fn events(&self) -> &[EventRecord] {
        &self.journal
    }

    /// Journal entries with `sequence >= since`. Empty if `since` is past the end.
    pub fn events_since(&self, since: u64) -> &[EventRecord] {
        let start = usize::try_from(since)
            .unwrap_or(usize::MAX)
            .min(self.journal.len());
        &self.journal[start..]
    }

    /// Recompute the sum of open rewards and compare it with the tracked
    /// escrow balance. Returns the balance when they agree.
    pub fn verify_escrow(&self) -> Result<Amount, LedgerError> {
        match self.open_rewards() {
            Some(expected) if expected == self.escrow => Ok(self.escrow),
            other => Err(LedgerError::EscrowMismatch {
                tracked: self.escrow,
                expected: other.map_or_else(|| "overflow".to_string(), |sum| sum.to_string()),
            }),
        }
    }

    fn open_rewards(&self) -> Option<Amount> {
        Amount::checked_sum(
            self.bounties
                .iter()
                .filter(|bounty| bounty.is_open())
                .map(|bounty| bounty.reward),
        )
    }

    /// The injected treasury.
    pub fn treasury(&self) -> &T {
        &self.treasury
    }

    /// Mutable access to the injected treasury, for funding accounts and
    /// toggling refusals. Escrowed value must only move through the ledger.
    pub fn treasury_mut(&mut self) -> &mut T {
        &mut self.treasury
    }

    /// The injected clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn log_outcome<R>(operation: &'static str, caller: &PartyId, result: &Result<R, LedgerError>) {
    match result {
        Ok(_) => {}
        Err(err @ LedgerError::TransferFailed { .. }) => {
            warn!(operation, %caller, code = err.code(), error = %err, "transfer refused");
        }
        Err(err) => {
            debug!(operation, %caller, code = err.code(), error = %err, "operation rejected");
        }
    }
}
