//! # Scenario Replay
//!
//! A scenario is a YAML script: opening balances, a start time, and an
//! ordered list of steps run against a fresh [`BountyLedger`] on a
//! [`ManualClock`]. Time only moves on `advance` steps, so replays are
//! deterministic.
//!
//! ```yaml
//! start: 2026-01-01T00:00:00Z
//! accounts:
//!   alice: "1000"
//! steps:
//!   - op: issue
//!     issuer: alice
//!     reward: "100"
//!     deadline_in_secs: 172800
//!   - op: advance
//!     secs: 172801
//!   - op: fulfill
//!     fulfiller: bob
//!     bounty: 0
//!     expect_error: DEADLINE_PASSED
//! expect:
//!   escrow: "100"
//! ```
//!
//! A step with `expect_error` must fail with that [`LedgerError::code`]; a
//! step without it must succeed. The optional `expect` block checks the
//! final escrow, balances and statuses.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use bounty_core::{Amount, BountyId, Clock, FulfillmentId, ManualClock, PartyId, Timestamp};
use bounty_ledger::{BountyLedger, BountyStatus, EventRecord, InMemoryTreasury, LedgerError};

/// Arguments for `bounty run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the scenario YAML file.
    pub scenario: PathBuf,

    /// Print single-line JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the run subcommand: replay, print the report, and fail on any
/// unmet expectation.
pub fn run_scenario(args: &RunArgs) -> Result<u8> {
    let scenario = Scenario::from_file(&args.scenario)?;
    let report = scenario.replay()?;
    let rendered = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{rendered}");
    Ok(0)
}

// ── Scenario file format ────────────────────────────────────────────

/// A scripted run against a fresh ledger.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Initial reading of the manual clock.
    pub start: Timestamp,
    /// Opening treasury balances.
    #[serde(default)]
    pub accounts: BTreeMap<PartyId, Amount>,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub expect: Option<Expectations>,
}

/// One step plus its expected outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    /// Error code the step must fail with. Absent means it must succeed.
    #[serde(default)]
    pub expect_error: Option<String>,
}

/// What a step does.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    Issue {
        issuer: PartyId,
        #[serde(default)]
        data: String,
        reward: Amount,
        /// Absolute deadline.
        #[serde(default)]
        deadline: Option<Timestamp>,
        /// Deadline relative to the clock at this step.
        #[serde(default)]
        deadline_in_secs: Option<i64>,
    },
    Fulfill {
        fulfiller: PartyId,
        bounty: BountyId,
        #[serde(default)]
        data: String,
    },
    Accept {
        issuer: PartyId,
        bounty: BountyId,
        fulfillment: FulfillmentId,
    },
    Cancel {
        issuer: PartyId,
        bounty: BountyId,
    },
    /// Move the manual clock forward.
    Advance { secs: i64 },
    /// Make the treasury refuse transfers touching `party`.
    Refuse { party: PartyId, reason: String },
    /// Lift a refusal.
    Lift { party: PartyId },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::Fulfill { .. } => "fulfill",
            Self::Accept { .. } => "accept",
            Self::Cancel { .. } => "cancel",
            Self::Advance { .. } => "advance",
            Self::Refuse { .. } => "refuse",
            Self::Lift { .. } => "lift",
        }
    }
}

/// Final-state checks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    #[serde(default)]
    pub escrow: Option<Amount>,
    #[serde(default)]
    pub balances: BTreeMap<PartyId, Amount>,
    #[serde(default)]
    pub statuses: BTreeMap<usize, BountyStatus>,
}

// ── Report ──────────────────────────────────────────────────────────

/// The outcome of a replay, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub finished_at: Timestamp,
    pub escrow_balance: Amount,
    pub vault_balance: Amount,
    pub balances: BTreeMap<PartyId, Amount>,
    pub bounties: Vec<BountySummary>,
    pub events: Vec<EventRecord>,
}

/// Final state of one bounty.
#[derive(Debug, Clone, Serialize)]
pub struct BountySummary {
    pub id: BountyId,
    pub status: BountyStatus,
    pub reward: Amount,
    pub fulfillments: usize,
    pub accepted_fulfillment: Option<FulfillmentId>,
}

type ScenarioLedger = BountyLedger<InMemoryTreasury, Arc<ManualClock>>;

// ── Replay ──────────────────────────────────────────────────────────

impl Scenario {
    /// Parse a scenario from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing scenario")
    }

    /// Read and parse a scenario file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Run every step on a fresh ledger and check expectations.
    pub fn replay(&self) -> Result<Report> {
        let mut treasury = InMemoryTreasury::new();
        for (party, amount) in &self.accounts {
            treasury
                .credit(party, *amount)
                .with_context(|| format!("seeding account {party}"))?;
        }
        let clock = Arc::new(ManualClock::new(self.start));
        let mut ledger = BountyLedger::new(treasury, Arc::clone(&clock));

        for (n, step) in self.steps.iter().enumerate() {
            let outcome = apply(&mut ledger, &clock, &step.action)
                .with_context(|| format!("step {n} ({})", step.action.name()))?;
            check_outcome(n, step, outcome)?;
        }

        let report = report(&ledger)?;
        if let Some(expect) = &self.expect {
            check_expectations(expect, &report)?;
        }
        Ok(report)
    }
}

/// Apply one action. The outer `Result` is a malformed step; the inner one
/// is the ledger's verdict.
fn apply(
    ledger: &mut ScenarioLedger,
    clock: &ManualClock,
    action: &Action,
) -> Result<Result<(), LedgerError>> {
    let outcome = match action {
        Action::Issue {
            issuer,
            data,
            reward,
            deadline,
            deadline_in_secs,
        } => {
            let deadline = match (deadline, deadline_in_secs) {
                (Some(at), None) => *at,
                (None, Some(secs)) => clock
                    .now()
                    .checked_add_secs(*secs)
                    .context("deadline_in_secs out of range")?,
                _ => bail!("exactly one of deadline and deadline_in_secs is required"),
            };
            ledger
                .issue_bounty(issuer, data.as_str(), deadline, *reward)
                .map(drop)
        }
        Action::Fulfill {
            fulfiller,
            bounty,
            data,
        } => ledger
            .fulfill_bounty(fulfiller, *bounty, data.as_str())
            .map(drop),
        Action::Accept {
            issuer,
            bounty,
            fulfillment,
        } => ledger.accept_fulfillment(issuer, *bounty, *fulfillment),
        Action::Cancel { issuer, bounty } => ledger.cancel_bounty(issuer, *bounty),
        Action::Advance { secs } => {
            let now = clock
                .advance_secs(*secs)
                .context("clock advanced out of range")?;
            tracing::debug!(%now, "clock advanced");
            Ok(())
        }
        Action::Refuse { party, reason } => {
            ledger.treasury_mut().refuse(party, reason.as_str());
            Ok(())
        }
        Action::Lift { party } => {
            ledger.treasury_mut().accept(party);
            Ok(())
        }
    };
    Ok(outcome)
}

fn check_outcome(n: usize, step: &Step, outcome: Result<(), LedgerError>) -> Result<()> {
    let op = step.action.name();
    match (&step.expect_error, outcome) {
        (None, Ok(())) => Ok(()),
        (None, Err(e)) => Err(anyhow::Error::new(e).context(format!("step {n} ({op}) failed"))),
        (Some(code), Ok(())) => bail!("step {n} ({op}) succeeded, expected {code}"),
        (Some(code), Err(e)) if e.code() == code.as_str() => {
            tracing::info!(step = n, op, code, "step failed as expected");
            Ok(())
        }
        (Some(code), Err(e)) => bail!("step {n} ({op}) failed with {}, expected {code}: {e}", e.code()),
    }
}

fn report(ledger: &ScenarioLedger) -> Result<Report> {
    let escrow_balance = ledger.verify_escrow()?;
    Ok(Report {
        finished_at: ledger.clock().now(),
        escrow_balance,
        vault_balance: ledger.treasury().vault_balance(),
        balances: ledger
            .treasury()
            .accounts()
            .map(|(party, amount)| (party.clone(), amount))
            .collect(),
        bounties: ledger
            .bounties()
            .map(|(id, bounty)| BountySummary {
                id,
                status: bounty.status,
                reward: bounty.reward,
                fulfillments: bounty.fulfillment_count(),
                accepted_fulfillment: bounty.accepted_fulfillment,
            })
            .collect(),
        events: ledger.events().to_vec(),
    })
}

fn check_expectations(expect: &Expectations, report: &Report) -> Result<()> {
    if let Some(escrow) = expect.escrow {
        if report.escrow_balance != escrow {
            bail!("escrow is {}, expected {escrow}", report.escrow_balance);
        }
    }
    for (party, want) in &expect.balances {
        let got = report.balances.get(party).copied().unwrap_or(Amount::ZERO);
        if got != *want {
            bail!("balance of {party} is {got}, expected {want}");
        }
    }
    for (index, want) in &expect.statuses {
        let Some(summary) = report.bounties.get(*index) else {
            bail!("bounty {index} was never issued");
        };
        if summary.status != *want {
            bail!("bounty {index} is {}, expected {want}", summary.status);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPT: &str = r#"
start: 2026-01-01T00:00:00Z
accounts:
  alice: "1000"
  bob: "0"
  carol: "0"
steps:
  - op: issue
    issuer: alice
    data: port the parser
    reward: "100"
    deadline_in_secs: 86400
  - op: fulfill
    fulfiller: bob
    bounty: 0
  - op: fulfill
    fulfiller: carol
    bounty: 0
  - op: accept
    issuer: alice
    bounty: 0
    fulfillment: 0
expect:
  escrow: "0"
  balances:
    alice: "900"
    bob: "100"
    carol: "0"
  statuses:
    0: ACCEPTED
"#;

    #[test]
    fn replay_accept_flow() {
        let report = Scenario::from_yaml(ACCEPT).unwrap().replay().unwrap();
        assert_eq!(report.events.len(), 4);
        assert_eq!(report.bounties[0].fulfillments, 2);
        assert_eq!(report.bounties[0].accepted_fulfillment, Some(FulfillmentId(0)));
        assert_eq!(report.vault_balance, Amount::ZERO);
    }

    #[test]
    fn unmet_expectation_fails() {
        let text = ACCEPT.replace("bob: \"100\"", "bob: \"99\"");
        let err = Scenario::from_yaml(&text).unwrap().replay().unwrap_err();
        assert!(err.to_string().contains("balance of bob"));
    }

    #[test]
    fn unexpected_ledger_error_fails_the_step() {
        let text = r#"
start: 2026-01-01T00:00:00Z
accounts:
  alice: "10"
steps:
  - op: issue
    issuer: alice
    reward: "0"
    deadline_in_secs: 60
"#;
        let err = Scenario::from_yaml(text).unwrap().replay().unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("step 0 (issue)"), "{chain}");
    }

    #[test]
    fn expected_error_must_match_code() {
        let text = r#"
start: 2026-01-01T00:00:00Z
accounts:
  alice: "10"
steps:
  - op: issue
    issuer: alice
    reward: "0"
    deadline_in_secs: 60
    expect_error: INVALID_DEPOSIT
"#;
        assert!(Scenario::from_yaml(text).unwrap().replay().is_ok());

        let wrong = text.replace("INVALID_DEPOSIT", "TRANSFER_FAILED");
        let err = Scenario::from_yaml(&wrong).unwrap().replay().unwrap_err();
        assert!(err.to_string().contains("expected TRANSFER_FAILED"));
    }

    #[test]
    fn refusal_blocks_then_lift_allows_cancel() {
        let text = r#"
start: 2026-01-01T00:00:00Z
accounts:
  alice: "50"
steps:
  - op: issue
    issuer: alice
    reward: "50"
    deadline: 2026-02-01T00:00:00Z
  - op: refuse
    party: alice
    reason: frozen
  - op: cancel
    issuer: alice
    bounty: 0
    expect_error: TRANSFER_FAILED
  - op: lift
    party: alice
  - op: cancel
    issuer: alice
    bounty: 0
expect:
  escrow: "0"
  balances:
    alice: "50"
  statuses:
    0: CANCELLED
"#;
        let report = Scenario::from_yaml(text).unwrap().replay().unwrap();
        assert_eq!(report.events.len(), 2);
    }

    #[test]
    fn issue_requires_exactly_one_deadline() {
        let text = r#"
start: 2026-01-01T00:00:00Z
steps:
  - op: issue
    issuer: alice
    reward: "1"
"#;
        let err = Scenario::from_yaml(text).unwrap().replay().unwrap_err();
        assert!(format!("{err:#}").contains("exactly one of deadline"));
    }

    #[test]
    fn advance_moves_the_clock() {
        let text = r#"
start: 2026-01-01T00:00:00Z
steps:
  - op: advance
    secs: 3600
"#;
        let report = Scenario::from_yaml(text).unwrap().replay().unwrap();
        assert_eq!(report.finished_at.to_iso8601(), "2026-01-01T01:00:00Z");
    }

    #[test]
    fn unknown_op_is_a_parse_error() {
        let text = r#"
start: 2026-01-01T00:00:00Z
steps:
  - op: withdraw
    party: alice
"#;
        assert!(Scenario::from_yaml(text).is_err());
    }
}
