//! # Bounty Lifecycle
//!
//! ## States
//!
//! ```text
//! CREATED ──▶ ACCEPTED  (terminal, reward paid to the accepted fulfiller)
//!    │
//!    └──────▶ CANCELLED (terminal, reward refunded to the issuer)
//! ```
//!
//! Every bounty starts in `CREATED`. Fulfillments may only be appended while
//! the bounty is `CREATED`; they are never removed. Leaving `CREATED` is the
//! only point at which escrowed value moves, and it happens exactly once.

use bounty_core::{Amount, BountyId, FulfillmentId, PartyId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

// ─── Bounty Status ───────────────────────────────────────────────────

/// The lifecycle status of a bounty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BountyStatus {
    /// Open: reward held in escrow, fulfillments accepted until the deadline.
    Created,
    /// A fulfillment was accepted and paid (terminal).
    Accepted,
    /// The issuer cancelled and was refunded (terminal).
    Cancelled,
}

impl BountyStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Cancelled)
    }

    /// The canonical status label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Accepted => "ACCEPTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Records ─────────────────────────────────────────────────────────

/// Record of a bounty status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyTransitionRecord {
    /// Status before the transition.
    pub from: BountyStatus,
    /// Status after the transition.
    pub to: BountyStatus,
    /// Ledger time of the transition.
    pub at: Timestamp,
    /// The party that caused it.
    pub actor: PartyId,
}

/// A claim submitted against a bounty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fulfillment {
    /// The submitting party.
    pub fulfiller: PartyId,
    /// Opaque claim content.
    pub data: String,
    /// Set once, when the bounty is accepted with this claim.
    pub accepted: bool,
    /// Ledger time of submission.
    pub submitted_at: Timestamp,
}

/// A bounty with its escrowed reward, claims, and transition history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    /// The depositing party.
    pub issuer: PartyId,
    /// Opaque description of the work.
    pub data: String,
    /// Fulfillments are accepted while ledger time is at or before this.
    pub deadline: Timestamp,
    /// The deposit, held in escrow while `CREATED`.
    pub reward: Amount,
    /// Current lifecycle status.
    pub status: BountyStatus,
    /// Append-only claims, indexed by [`FulfillmentId`].
    pub fulfillments: Vec<Fulfillment>,
    /// The winning claim, once accepted.
    pub accepted_fulfillment: Option<FulfillmentId>,
    /// Ledger time of acceptance.
    pub fulfilled_on: Option<Timestamp>,
    /// Ledger time of issuance.
    pub created_at: Timestamp,
    /// Ledger time of cancellation.
    pub cancelled_on: Option<Timestamp>,
    /// Ordered log of status transitions.
    pub transitions: Vec<BountyTransitionRecord>,
}

impl Bounty {
    /// A freshly issued bounty in `CREATED`.
    pub fn new(
        issuer: PartyId,
        data: String,
        deadline: Timestamp,
        reward: Amount,
        created_at: Timestamp,
    ) -> Self {
        Self {
            issuer,
            data,
            deadline,
            reward,
            status: BountyStatus::Created,
            fulfillments: Vec::new(),
            accepted_fulfillment: None,
            fulfilled_on: None,
            created_at,
            cancelled_on: None,
            transitions: Vec::new(),
        }
    }

    /// Whether the reward is still in escrow.
    pub fn is_open(&self) -> bool {
        self.status == BountyStatus::Created
    }

    /// Look up a fulfillment by position.
    pub fn fulfillment(&self, id: FulfillmentId) -> Option<&Fulfillment> {
        self.fulfillments.get(id.index())
    }

    /// Number of fulfillments submitted so far.
    pub fn fulfillment_count(&self) -> usize {
        self.fulfillments.len()
    }

    /// Whether `deadline` still admits submissions at `now`.
    pub fn accepts_submissions_at(&self, now: Timestamp) -> bool {
        now <= self.deadline
    }

    pub(crate) fn require_open(
        &self,
        id: BountyId,
        operation: &'static str,
    ) -> Result<(), LedgerError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(LedgerError::InvalidState {
                bounty: id,
                status: self.status,
                operation,
            })
        }
    }

    pub(crate) fn require_issuer(
        &self,
        id: BountyId,
        caller: &PartyId,
        operation: &'static str,
    ) -> Result<(), LedgerError> {
        if &self.issuer == caller {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                bounty: id,
                caller: caller.clone(),
                operation,
            })
        }
    }

    pub(crate) fn append_fulfillment(
        &mut self,
        fulfiller: PartyId,
        data: String,
        submitted_at: Timestamp,
    ) -> FulfillmentId {
        self.fulfillments.push(Fulfillment {
            fulfiller,
            data,
            accepted: false,
            submitted_at,
        });
        FulfillmentId(self.fulfillments.len() - 1)
    }

    /// CREATED → ACCEPTED. The caller has already validated the transition
    /// and completed the payout; `fulfillment` must be in range.
    pub(crate) fn mark_accepted(&mut self, fulfillment: FulfillmentId, at: Timestamp, actor: PartyId) {
        if let Some(claim) = self.fulfillments.get_mut(fulfillment.index()) {
            claim.accepted = true;
        }
        self.accepted_fulfillment = Some(fulfillment);
        self.fulfilled_on = Some(at);
        self.do_transition(BountyStatus::Accepted, at, actor);
    }

    /// CREATED → CANCELLED. The caller has already validated the transition
    /// and completed the refund.
    pub(crate) fn mark_cancelled(&mut self, at: Timestamp, actor: PartyId) {
        self.cancelled_on = Some(at);
        self.do_transition(BountyStatus::Cancelled, at, actor);
    }

    fn do_transition(&mut self, to: BountyStatus, at: Timestamp, actor: PartyId) {
        self.transitions.push(BountyTransitionRecord {
            from: self.status,
            to,
            at,
            actor,
        });
        self.status = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    fn at(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn open_bounty() -> Bounty {
        Bounty::new(
            party("alice"),
            "translate the README".to_string(),
            at("2026-02-01T00:00:00Z"),
            Amount::new(1_000),
            at("2026-01-01T00:00:00Z"),
        )
    }

    #[test]
    fn status_labels() {
        assert_eq!(BountyStatus::Created.to_string(), "CREATED");
        assert_eq!(BountyStatus::Accepted.as_str(), "ACCEPTED");
        assert_eq!(BountyStatus::Cancelled.as_str(), "CANCELLED");
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&BountyStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }

    #[test]
    fn only_created_is_non_terminal() {
        assert!(!BountyStatus::Created.is_terminal());
        assert!(BountyStatus::Accepted.is_terminal());
        assert!(BountyStatus::Cancelled.is_terminal());
    }

    #[test]
    fn new_bounty_is_open_with_no_claims() {
        let bounty = open_bounty();
        assert!(bounty.is_open());
        assert_eq!(bounty.fulfillment_count(), 0);
        assert!(bounty.transitions.is_empty());
        assert!(bounty.accepted_fulfillment.is_none());
    }

    #[test]
    fn fulfillments_get_sequential_ids() {
        let mut bounty = open_bounty();
        let now = at("2026-01-02T00:00:00Z");
        assert_eq!(bounty.append_fulfillment(party("bob"), "a".into(), now), FulfillmentId(0));
        assert_eq!(bounty.append_fulfillment(party("carol"), "b".into(), now), FulfillmentId(1));
        assert!(!bounty.fulfillment(FulfillmentId(1)).unwrap().accepted);
        assert!(bounty.fulfillment(FulfillmentId(2)).is_none());
    }

    #[test]
    fn deadline_is_inclusive() {
        let bounty = open_bounty();
        assert!(bounty.accepts_submissions_at(at("2026-02-01T00:00:00Z")));
        assert!(!bounty.accepts_submissions_at(at("2026-02-01T00:00:01Z")));
    }

    #[test]
    fn mark_accepted_records_transition() {
        let mut bounty = open_bounty();
        let now = at("2026-01-03T00:00:00Z");
        let f = bounty.append_fulfillment(party("bob"), "done".into(), now);
        bounty.mark_accepted(f, now, party("alice"));

        assert_eq!(bounty.status, BountyStatus::Accepted);
        assert_eq!(bounty.accepted_fulfillment, Some(f));
        assert_eq!(bounty.fulfilled_on, Some(now));
        assert!(bounty.fulfillment(f).unwrap().accepted);
        assert_eq!(
            bounty.transitions,
            vec![BountyTransitionRecord {
                from: BountyStatus::Created,
                to: BountyStatus::Accepted,
                at: now,
                actor: party("alice"),
            }]
        );
    }

    #[test]
    fn mark_cancelled_records_transition() {
        let mut bounty = open_bounty();
        let now = at("2026-01-04T00:00:00Z");
        bounty.mark_cancelled(now, party("alice"));
        assert_eq!(bounty.status, BountyStatus::Cancelled);
        assert_eq!(bounty.cancelled_on, Some(now));
        assert_eq!(bounty.transitions.len(), 1);
    }

    #[test]
    fn require_open_rejects_terminal() {
        let mut bounty = open_bounty();
        assert!(bounty.require_open(BountyId(0), "cancel").is_ok());
        bounty.mark_cancelled(at("2026-01-04T00:00:00Z"), party("alice"));
        let err = bounty.require_open(BountyId(0), "cancel").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidState {
                status: BountyStatus::Cancelled,
                ..
            }
        ));
    }

    #[test]
    fn require_issuer_rejects_others() {
        let bounty = open_bounty();
        assert!(bounty.require_issuer(BountyId(0), &party("alice"), "cancel").is_ok());
        let err = bounty
            .require_issuer(BountyId(0), &party("mallory"), "cancel")
            .unwrap_err();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
