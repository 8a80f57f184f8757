//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier the ledger handles. These prevent
//! accidental identifier confusion: you cannot pass a `FulfillmentId` where
//! a `BountyId` is expected, or a raw string where a validated `PartyId` is
//! required.
//!
//! Bounty and fulfillment identifiers are *positional*: a `BountyId` is the
//! 0-based position of the bounty in the ledger's bounty sequence, and a
//! `FulfillmentId` is the 0-based position of the claim inside its bounty.
//! Both sequences are append-only, so positions are stable forever.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum length of a party identity string.
pub const MAX_PARTY_ID_LEN: usize = 128;

/// Identity of a calling party (issuer or fulfiller).
///
/// Opaque to the ledger: an account name, a wallet address, a DID. The only
/// requirements are that it is non-empty, bounded, and free of whitespace
/// and control characters so it can round-trip through headers and logs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyId(String);

impl PartyId {
    /// Validate and wrap a party identity.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let reject = |reason: &str| ValidationError::InvalidParty {
            value: value.clone(),
            reason: reason.to_string(),
        };
        if value.is_empty() {
            return Err(reject("must not be empty"));
        }
        if value.len() > MAX_PARTY_ID_LEN {
            return Err(reject("exceeds 128 characters"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(reject("must not contain whitespace or control characters"));
        }
        Ok(Self(value))
    }

    /// Borrow the identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PartyId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PartyId> for String {
    fn from(id: PartyId) -> Self {
        id.0
    }
}

impl std::str::FromStr for PartyId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a ledger instance. Stamped on every emitted event
/// so an indexer following several ledgers can keep their histories apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerId(pub Uuid);

impl LedgerId {
    /// Generate a new random ledger identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for LedgerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LedgerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ledger:{}", self.0)
    }
}

/// Position of a bounty in the ledger's bounty sequence (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BountyId(pub usize);

impl BountyId {
    /// The position as a `usize` for sequence indexing.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BountyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bounty:{}", self.0)
    }
}

/// Position of a fulfillment within its bounty's fulfillment sequence (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FulfillmentId(pub usize);

impl FulfillmentId {
    /// The position as a `usize` for sequence indexing.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FulfillmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fulfillment:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_id_accepts_address_like_values() {
        let party = PartyId::new("0x627306090abaB3A6e1400e9345bC60c78a8BEf57").unwrap();
        assert_eq!(party.as_str(), "0x627306090abaB3A6e1400e9345bC60c78a8BEf57");
        assert_eq!(party.to_string(), party.as_str());
    }

    #[test]
    fn party_id_rejects_empty() {
        assert!(PartyId::new("").is_err());
    }

    #[test]
    fn party_id_rejects_whitespace() {
        assert!(PartyId::new("alice bob").is_err());
        assert!(PartyId::new(" alice").is_err());
        assert!(PartyId::new("alice\n").is_err());
    }

    #[test]
    fn party_id_rejects_overlong() {
        let long = "a".repeat(MAX_PARTY_ID_LEN + 1);
        assert!(PartyId::new(long).is_err());
        let max = "a".repeat(MAX_PARTY_ID_LEN);
        assert!(PartyId::new(max).is_ok());
    }

    #[test]
    fn party_id_deserialize_validates() {
        let ok: PartyId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        let bad: Result<PartyId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn positional_ids_display() {
        assert_eq!(BountyId(3).to_string(), "bounty:3");
        assert_eq!(FulfillmentId(0).to_string(), "fulfillment:0");
    }

    #[test]
    fn positional_ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&BountyId(7)).unwrap(), "7");
        let f: FulfillmentId = serde_json::from_str("2").unwrap();
        assert_eq!(f, FulfillmentId(2));
    }

    #[test]
    fn ledger_ids_are_unique() {
        assert_ne!(LedgerId::new(), LedgerId::new());
        assert!(LedgerId::new().to_string().starts_with("ledger:"));
    }
}
