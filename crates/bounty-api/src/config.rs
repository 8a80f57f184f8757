//! # Service Configuration
//!
//! Configuration is layered:
//!
//! 1. Built-in defaults (`0.0.0.0:8080`, text logs, no seeded accounts).
//! 2. An optional YAML file, from `--config` or `BOUNTY_CONFIG`.
//! 3. Environment overrides: `BOUNTY_HOST`, then `BOUNTY_PORT` (or `PORT`).
//!
//! ```yaml
//! host: 127.0.0.1
//! port: 9000
//! log_format: json
//! accounts:
//!   alice: "5000000000000000000"
//!   bob: "1000"
//! ```
//!
//! Account balances are decimal strings in smallest units. They seed the
//! in-memory treasury at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bounty_core::{Amount, PartyId};
use bounty_ledger::InMemoryTreasury;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming the YAML configuration file.
pub const CONFIG_ENV: &str = "BOUNTY_CONFIG";

/// Errors raised while loading configuration. All are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`AppConfig`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment override has an unusable value.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Seeding an account failed.
    #[error("cannot seed account {party}: {reason}")]
    Seed { party: PartyId, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
    /// Opening treasury balances.
    pub accounts: BTreeMap<PartyId, Amount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_format: LogFormat::Text,
            accounts: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or `BOUNTY_CONFIG` when `path` is `None`), then apply
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a YAML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `BOUNTY_HOST`, `BOUNTY_PORT` and `PORT` as returned by `lookup`.
    /// `BOUNTY_PORT` wins over `PORT` when both are set.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("BOUNTY_HOST") {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidEnv {
                    var: "BOUNTY_HOST",
                    value: host,
                    reason: "must not be empty".to_string(),
                });
            }
            self.host = host;
        }
        for var in ["PORT", "BOUNTY_PORT"] {
            if let Some(value) = lookup(var) {
                self.port = value.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::InvalidEnv {
                        var,
                        value: value.clone(),
                        reason: e.to_string(),
                    }
                })?;
            }
        }
        Ok(())
    }

    /// A treasury holding the configured opening balances.
    pub fn treasury(&self) -> Result<InMemoryTreasury, ConfigError> {
        let mut treasury = InMemoryTreasury::new();
        for (party, amount) in &self.accounts {
            treasury
                .credit(party, *amount)
                .map_err(|e| ConfigError::Seed {
                    party: party.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(treasury)
    }
}
