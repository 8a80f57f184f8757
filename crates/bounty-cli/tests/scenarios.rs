//! Replays the bundled scenario files.

use std::path::PathBuf;

use bounty_cli::scenario::{run_scenario, RunArgs, Scenario};
use bounty_core::{Amount, PartyId};
use bounty_ledger::BountyStatus;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(name)
}

fn replay(name: &str) -> bounty_cli::scenario::Report {
    Scenario::from_file(&scenario_path(name))
        .unwrap()
        .replay()
        .unwrap()
}

#[test]
fn accept_pays_first_fulfiller() {
    let report = replay("accept.yaml");
    assert_eq!(report.bounties[0].status, BountyStatus::Accepted);
    assert_eq!(report.bounties[0].fulfillments, 2);
    let x = PartyId::new("x").unwrap();
    assert_eq!(report.balances[&x], Amount::new(1_000_000_000_000_000_000));
    let kinds: Vec<&str> = report.events.iter().map(|r| r.event.name()).collect();
    assert_eq!(
        kinds,
        ["BountyIssued", "BountyFulfilled", "BountyFulfilled", "FulfillmentAccepted"]
    );
    assert_eq!(report.events.last().unwrap().sequence, 3);
}

#[test]
fn cancel_refunds_issuer() {
    let report = replay("cancel.yaml");
    assert_eq!(report.bounties[0].status, BountyStatus::Cancelled);
    assert_eq!(report.escrow_balance, Amount::ZERO);
    assert_eq!(report.vault_balance, Amount::ZERO);
    assert_eq!(report.events.len(), 2);
}

#[test]
fn deadline_blocks_late_fulfillment() {
    let report = replay("deadline.yaml");
    assert_eq!(report.bounties[0].status, BountyStatus::Created);
    assert_eq!(report.bounties[0].fulfillments, 0);
    assert_eq!(report.escrow_balance, Amount::new(500));
    assert_eq!(report.finished_at.to_iso8601(), "2026-01-03T00:00:01Z");
}

#[test]
fn run_subcommand_reads_file() {
    let args = RunArgs {
        scenario: scenario_path("cancel.yaml"),
        compact: true,
    };
    assert_eq!(run_scenario(&args).unwrap(), 0);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = RunArgs {
        scenario: dir.path().join("absent.yaml"),
        compact: false,
    };
    let err = run_scenario(&args).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn written_scenario_round_trips_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.yaml");
    std::fs::write(
        &path,
        "start: 2026-01-01T00:00:00Z\naccounts:\n  a: \"3\"\nsteps:\n  - op: issue\n    issuer: a\n    reward: \"3\"\n    deadline: 2026-01-05T00:00:00Z\nexpect:\n  escrow: \"3\"\n",
    )
    .unwrap();
    let report = Scenario::from_file(&path).unwrap().replay().unwrap();
    assert_eq!(report.bounties.len(), 1);
}
