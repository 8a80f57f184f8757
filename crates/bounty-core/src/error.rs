//! # Validation Errors
//!
//! Errors raised when constructing core primitives from untrusted input
//! (HTTP bodies, YAML scenarios, configuration files).

use thiserror::Error;

/// A primitive could not be constructed from its input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Party identity string is empty, too long, or contains forbidden characters.
    #[error("invalid party identity {value:?}: {reason}")]
    InvalidParty {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Amount string is not a non-negative integer in smallest units.
    #[error("invalid amount {0:?}: expected a non-negative integer in smallest units")]
    InvalidAmount(String),

    /// Timestamp string is not valid RFC 3339 or is out of range.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_party_display() {
        let err = ValidationError::InvalidParty {
            value: "".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn invalid_amount_display() {
        let err = ValidationError::InvalidAmount("1.5".to_string());
        assert!(err.to_string().contains("1.5"));
    }
}
