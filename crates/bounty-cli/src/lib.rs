//! # bounty-cli: Command Line for the Bounty Ledger
//!
//! Provides the `bounty` binary.
//!
//! ## Subcommands
//!
//! - `bounty serve`: Start the HTTP API (see `bounty-api`).
//! - `bounty run <scenario.yaml>`: Replay a scripted scenario against an
//!   in-memory ledger on a manual clock and print the event journal and
//!   final balances as JSON.
//!
//! ```bash
//! bounty run crates/bounty-cli/scenarios/accept.yaml
//! bounty -v serve --config bounty.yaml --port 9000
//! ```

pub mod scenario;
pub mod serve;
