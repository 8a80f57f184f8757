//! # Ledger Events
//!
//! Every committed state change appends exactly one [`EventRecord`] to the
//! ledger's journal. Rejected calls append nothing. Sequence numbers start
//! at 0 and are dense, so a consumer that has seen `n` events resumes with
//! `events_since(n)`.

use bounty_core::{Amount, BountyId, FulfillmentId, LedgerId, PartyId, Timestamp};
use serde::{Deserialize, Serialize};

/// A state change observable by off-ledger consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LedgerEvent {
    /// A bounty was created and its reward escrowed.
    BountyIssued {
        bounty: BountyId,
        issuer: PartyId,
        reward: Amount,
        deadline: Timestamp,
    },
    /// A fulfillment was submitted.
    BountyFulfilled {
        bounty: BountyId,
        fulfillment: FulfillmentId,
        fulfiller: PartyId,
        issuer: PartyId,
    },
    /// The issuer accepted a fulfillment and the reward was paid out.
    FulfillmentAccepted {
        bounty: BountyId,
        fulfillment: FulfillmentId,
        issuer: PartyId,
        fulfiller: PartyId,
        reward: Amount,
    },
    /// The issuer cancelled and the reward was refunded.
    BountyCancelled {
        bounty: BountyId,
        issuer: PartyId,
        reward: Amount,
    },
}

impl LedgerEvent {
    /// The event's type tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BountyIssued { .. } => "BountyIssued",
            Self::BountyFulfilled { .. } => "BountyFulfilled",
            Self::FulfillmentAccepted { .. } => "FulfillmentAccepted",
            Self::BountyCancelled { .. } => "BountyCancelled",
        }
    }

    /// The bounty the event concerns.
    pub fn bounty(&self) -> BountyId {
        match self {
            Self::BountyIssued { bounty, .. }
            | Self::BountyFulfilled { bounty, .. }
            | Self::FulfillmentAccepted { bounty, .. }
            | Self::BountyCancelled { bounty, .. } => *bounty,
        }
    }
}

/// A journaled event with its position and origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the journal, starting at 0.
    pub sequence: u64,
    /// The emitting ledger.
    pub ledger: LedgerId,
    /// Ledger time of the commit.
    pub emitted_at: Timestamp,
    /// What happened.
    pub event: LedgerEvent,
}
