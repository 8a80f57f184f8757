//! # Treasury Capability
//!
//! The ledger never holds value itself. It asks a [`Treasury`] to move funds
//! from an issuer into escrow at issuance, and out of escrow to exactly one
//! recipient when a bounty leaves `CREATED`.
//!
//! A treasury transfer either completes fully or fails with a
//! [`TransferError`] and moves nothing. The ledger relies on this to keep
//! every operation all-or-nothing.
//!
//! [`InMemoryTreasury`] is the deterministic implementation used by the HTTP
//! service, scenario replay and tests. It can be told to refuse transfers to
//! a given party, which models a recipient that rejects incoming value.

use std::collections::BTreeMap;

use bounty_core::{Amount, PartyId};
use thiserror::Error;

/// Why a treasury transfer did not happen.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The sender does not hold enough funds.
    #[error("{party} holds {available}, cannot transfer {requested}")]
    InsufficientFunds {
        /// The sending party.
        party: PartyId,
        /// The sender's balance.
        available: Amount,
        /// The requested transfer.
        requested: Amount,
    },

    /// The counterparty refused the transfer.
    #[error("transfer involving {party} refused: {reason}")]
    Refused {
        /// The refusing party.
        party: PartyId,
        /// Reason given.
        reason: String,
    },

    /// The escrow vault holds less than the payout.
    #[error("vault holds {available}, cannot pay out {requested}")]
    VaultShortfall {
        /// Vault balance.
        available: Amount,
        /// The requested payout.
        requested: Amount,
    },
}

/// Moves value between parties and the escrow vault.
///
/// Both methods are all-or-nothing: on `Err`, no balance has changed.
pub trait Treasury: Send {
    /// Move `amount` from `from` into the escrow vault.
    fn deposit(&mut self, from: &PartyId, amount: Amount) -> Result<(), TransferError>;

    /// Move `amount` from the escrow vault to `to`.
    fn payout(&mut self, to: &PartyId, amount: Amount) -> Result<(), TransferError>;
}

/// Per-party balances and a single escrow vault, held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTreasury {
    balances: BTreeMap<PartyId, Amount>,
    vault: Amount,
    refusals: BTreeMap<PartyId, String>,
}

impl InMemoryTreasury {
    /// An empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `party` with `amount` of external funds. Returns the new balance.
    pub fn credit(&mut self, party: &PartyId, amount: Amount) -> Result<Amount, TransferError> {
        let balance = self.balance_of(party);
        let next = balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::Refused {
                party: party.clone(),
                reason: "balance would overflow".to_string(),
            })?;
        self.balances.insert(party.clone(), next);
        Ok(next)
    }

    /// Balance held by `party`. Unknown parties hold zero.
    pub fn balance_of(&self, party: &PartyId) -> Amount {
        self.balances.get(party).copied().unwrap_or(Amount::ZERO)
    }

    /// Funds currently held in escrow.
    pub fn vault_balance(&self) -> Amount {
        self.vault
    }

    /// All parties with a recorded balance, in identity order.
    pub fn accounts(&self) -> impl Iterator<Item = (&PartyId, Amount)> {
        self.balances.iter().map(|(party, amount)| (party, *amount))
    }

    /// Sum of every party balance plus the vault. `None` on overflow.
    pub fn total_supply(&self) -> Option<Amount> {
        Amount::checked_sum(self.balances.values().copied().chain([self.vault]))
    }

    /// Make every transfer involving `party` fail with `reason`.
    pub fn refuse(&mut self, party: &PartyId, reason: impl Into<String>) {
        self.refusals.insert(party.clone(), reason.into());
    }

    /// Lift a refusal set by [`refuse`](Self::refuse).
    pub fn accept(&mut self, party: &PartyId) {
        self.refusals.remove(party);
    }

    fn check_refusal(&self, party: &PartyId) -> Result<(), TransferError> {
        match self.refusals.get(party) {
            Some(reason) => Err(TransferError::Refused {
                party: party.clone(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Treasury for InMemoryTreasury {
    fn deposit(&mut self, from: &PartyId, amount: Amount) -> Result<(), TransferError> {
        self.check_refusal(from)?;
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientFunds {
                party: from.clone(),
                available,
                requested: amount,
            })?;
        let vault = self
            .vault
            .checked_add(amount)
            .ok_or_else(|| TransferError::Refused {
                party: from.clone(),
                reason: "vault would overflow".to_string(),
            })?;
        self.balances.insert(from.clone(), remaining);
        self.vault = vault;
        Ok(())
    }

    fn payout(&mut self, to: &PartyId, amount: Amount) -> Result<(), TransferError> {
        self.check_refusal(to)?;
        let vault = self
            .vault
            .checked_sub(amount)
            .ok_or(TransferError::VaultShortfall {
                available: self.vault,
                requested: amount,
            })?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Refused {
                party: to.clone(),
                reason: "balance would overflow".to_string(),
            })?;
        self.balances.insert(to.clone(), balance);
        self.vault = vault;
        Ok(())
    }
}
