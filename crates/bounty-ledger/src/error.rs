//! # Ledger Error Types
//!
//! Structured error hierarchy for the bounty ledger. Every variant carries
//! the context an operator needs to diagnose a rejected call without reading
//! logs: the bounty involved, the caller, the status at the time of failure.
//!
//! Every error is terminal for its call and leaves the ledger exactly as it
//! was before the call.

use bounty_core::{Amount, BountyId, FulfillmentId, PartyId, Timestamp};
use thiserror::Error;

use crate::bounty::BountyStatus;
use crate::treasury::TransferError;

/// What an out-of-range lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A bounty index past the end of the bounty sequence.
    Bounty(BountyId),
    /// A fulfillment index past the end of a bounty's fulfillment sequence.
    Fulfillment(BountyId, FulfillmentId),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bounty(bounty) => write!(f, "{bounty}"),
            Self::Fulfillment(bounty, fulfillment) => write!(f, "{fulfillment} of {bounty}"),
        }
    }
}

/// Errors arising from ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Issuance with a zero deposit.
    #[error("deposit must be greater than zero, got {amount}")]
    InvalidDeposit {
        /// The rejected deposit.
        amount: Amount,
    },

    /// The issuer tried to fulfill their own bounty.
    #[error("{caller} issued {bounty} and cannot fulfill it")]
    SelfFulfillmentForbidden {
        /// The bounty.
        bounty: BountyId,
        /// The issuing caller.
        caller: PartyId,
    },

    /// Fulfillment submitted after the bounty's deadline.
    #[error("deadline {deadline} of {bounty} has passed (now {now})")]
    DeadlinePassed {
        /// The bounty.
        bounty: BountyId,
        /// The bounty's deadline.
        deadline: Timestamp,
        /// Ledger time at the call.
        now: Timestamp,
    },

    /// A caller other than the issuer attempted an issuer-only operation.
    #[error("{caller} is not the issuer of {bounty} and cannot {operation}")]
    Unauthorized {
        /// The bounty.
        bounty: BountyId,
        /// The rejected caller.
        caller: PartyId,
        /// The attempted operation.
        operation: &'static str,
    },

    /// The bounty is not in the status the operation requires.
    #[error("cannot {operation} {bounty} in status {status}")]
    InvalidState {
        /// The bounty.
        bounty: BountyId,
        /// Its current status.
        status: BountyStatus,
        /// The attempted operation.
        operation: &'static str,
    },

    /// Index out of range.
    #[error("{0} not found")]
    NotFound(Lookup),

    /// The treasury refused to move funds. Nothing was committed.
    #[error("transfer of {amount} for {operation} failed: {source}")]
    TransferFailed {
        /// The operation whose transfer failed.
        operation: &'static str,
        /// The amount that was to move.
        amount: Amount,
        /// Why the treasury refused.
        #[source]
        source: TransferError,
    },

    /// Accepting the deposit would overflow the escrow balance.
    #[error("escrow balance {escrow} cannot absorb deposit {amount}")]
    BalanceOverflow {
        /// Current escrow balance.
        escrow: Amount,
        /// The deposit that does not fit.
        amount: Amount,
    },

    /// The tracked escrow balance disagrees with the sum of open rewards.
    #[error("escrow balance {tracked} does not match open rewards {expected}")]
    EscrowMismatch {
        /// The balance the ledger tracks.
        tracked: Amount,
        /// The sum of rewards of bounties still in `CREATED`, or `"overflow"`.
        expected: String,
    },
}

impl LedgerError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDeposit { .. } => "INVALID_DEPOSIT",
            Self::SelfFulfillmentForbidden { .. } => "SELF_FULFILLMENT_FORBIDDEN",
            Self::DeadlinePassed { .. } => "DEADLINE_PASSED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::TransferFailed { .. } => "TRANSFER_FAILED",
            Self::BalanceOverflow { .. } => "BALANCE_OVERFLOW",
            Self::EscrowMismatch { .. } => "ESCROW_MISMATCH",
        }
    }
}
