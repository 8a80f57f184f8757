//! # bounty-core: Foundational Types for the Bounty Ledger
//!
//! Defines the primitives every other crate in the workspace builds on.
//! `bounty-core` depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `PartyId`, `LedgerId`, `BountyId`,
//!    `FulfillmentId` are distinct types. A fulfillment index cannot be passed
//!    where a bounty index is expected.
//!
//! 2. **Integer amounts only.** `Amount` is an unsigned count of the smallest
//!    currency unit with checked arithmetic. It serializes as a decimal string
//!    so no JSON consumer ever sees a float.
//!
//! 3. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision.
//!
//! 4. **Time is a capability.** Ledger code never calls `Utc::now()` directly;
//!    it asks a [`Clock`]. [`ManualClock`] makes deadline behavior testable.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod clock;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ValidationError;
pub use identity::{BountyId, FulfillmentId, LedgerId, PartyId};
pub use temporal::Timestamp;
