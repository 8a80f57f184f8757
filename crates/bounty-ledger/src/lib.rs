//! # bounty-ledger: Escrowed Bounty Ledger
//!
//! An issuer posts a bounty by depositing a reward, which the ledger holds
//! in escrow. Other parties submit fulfillments. The issuer either accepts
//! exactly one fulfillment, releasing the reward to its submitter, or
//! cancels the bounty and takes the reward back.
//!
//! ## Components
//!
//! - [`BountyLedger`]: the aggregate. Owns the bounty sequence, the escrow
//!   balance, and the event journal. Generic over a [`Treasury`] that moves
//!   value and a [`Clock`](bounty_core::Clock) that tells time.
//! - [`Bounty`] / [`Fulfillment`]: records with a closed [`BountyStatus`].
//! - [`LedgerEvent`] / [`EventRecord`]: the journal of committed changes.
//! - [`SharedLedger`]: the lock-guarded handle used by concurrent hosts.
//!
//! ## Guarantees
//!
//! - Each operation is all-or-nothing. A failed call changes no state and
//!   appends no event.
//! - A bounty's reward moves out of escrow exactly once, on its single
//!   transition out of `CREATED`.
//! - Bounty and fulfillment indices are positional and never reused.

pub mod bounty;
pub mod error;
pub mod event;
pub mod ledger;
pub mod shared;
pub mod treasury;

pub use bounty::{Bounty, BountyStatus, BountyTransitionRecord, Fulfillment};
pub use error::{LedgerError, Lookup};
pub use event::{EventRecord, LedgerEvent};
pub use ledger::BountyLedger;
pub use shared::SharedLedger;
pub use treasury::{InMemoryTreasury, TransferError, Treasury};
