//! # Bounty Lifecycle Tests
//!
//! End-to-end behavior of the ledger through its public API, with an
//! in-memory treasury and a manual clock. Amounts use an 18-decimal unit so
//! that "1.0" below means `10^18` smallest units.

use std::sync::Arc;

use bounty_core::{Amount, BountyId, Clock, FulfillmentId, ManualClock, PartyId, Timestamp};
use bounty_ledger::{BountyLedger, BountyStatus, InMemoryTreasury, LedgerError, LedgerEvent};

const ONE: u128 = 1_000_000_000_000_000_000;
const START_BALANCE: u128 = 100 * ONE;
const DAY: i64 = 86_400;

type Ledger = BountyLedger<InMemoryTreasury, Arc<ManualClock>>;

fn party(s: &str) -> PartyId {
    PartyId::new(s).unwrap()
}

fn far_deadline() -> Timestamp {
    Timestamp::from_epoch_secs(7_257_513_600).unwrap()
}

fn setup() -> (Ledger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Timestamp::parse("2026-03-01T09:00:00Z").unwrap(),
    ));
    let mut treasury = InMemoryTreasury::new();
    for who in ["issuer", "x", "y"] {
        treasury
            .credit(&party(who), Amount::new(START_BALANCE))
            .unwrap();
    }
    (BountyLedger::new(treasury, clock.clone()), clock)
}

fn balance(ledger: &Ledger, who: &str) -> Amount {
    ledger.treasury().balance_of(&party(who))
}

fn issue(ledger: &mut Ledger, reward: u128) -> BountyId {
    ledger
        .issue_bounty(&party("issuer"), "task", far_deadline(), Amount::new(reward))
        .unwrap()
}

#[test]
fn issue_grows_escrow_and_count_by_reward() {
    let (mut ledger, _) = setup();
    for (i, reward) in [ONE, 3, 250].into_iter().enumerate() {
        let before = ledger.escrow_balance();
        let id = issue(&mut ledger, reward);
        assert_eq!(id, BountyId(i));
        assert_eq!(ledger.bounty_count(), i + 1);
        assert_eq!(
            ledger.escrow_balance(),
            before.checked_add(Amount::new(reward)).unwrap()
        );
    }
}

#[test]
fn zero_deposit_always_fails() {
    let (mut ledger, _) = setup();
    issue(&mut ledger, 5);
    let err = ledger
        .issue_bounty(&party("x"), "free", far_deadline(), Amount::ZERO)
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDeposit { .. }));
    assert_eq!(ledger.bounty_count(), 1);
}

#[test]
fn two_issues_sum_in_escrow() {
    let (mut ledger, _) = setup();
    issue(&mut ledger, 2 * ONE);
    ledger
        .issue_bounty(&party("x"), "other", far_deadline(), Amount::new(ONE / 2))
        .unwrap();
    assert_eq!(ledger.bounty_count(), 2);
    assert_eq!(ledger.escrow_balance(), Amount::new(2 * ONE + ONE / 2));
}

#[test]
fn issuer_cannot_fulfill_own_bounty() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let err = ledger.fulfill_bounty(&party("issuer"), b, "mine").unwrap_err();
    assert!(matches!(err, LedgerError::SelfFulfillmentForbidden { .. }));
    assert_eq!(ledger.fulfillment_count(b).unwrap(), 0);
}

#[test]
fn fulfillments_are_indexed_in_call_order() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    assert_eq!(ledger.fulfill_bounty(&party("x"), b, "first").unwrap(), FulfillmentId(0));
    assert_eq!(ledger.fulfill_bounty(&party("y"), b, "second").unwrap(), FulfillmentId(1));
    for f in [FulfillmentId(0), FulfillmentId(1)] {
        assert!(!ledger.fulfillment(b, f).unwrap().accepted);
    }
    assert_eq!(ledger.fulfillment(b, FulfillmentId(1)).unwrap().data, "second");
}

#[test]
fn non_issuer_cannot_accept() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let f = ledger.fulfill_bounty(&party("x"), b, "work").unwrap();
    let events = ledger.events().len();

    let err = ledger.accept_fulfillment(&party("x"), b, f).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Created);
    assert_eq!(ledger.escrow_balance(), Amount::new(ONE));
    assert_eq!(ledger.events().len(), events);
}

#[test]
fn accepted_bounty_rejects_accept_and_cancel() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let f = ledger.fulfill_bounty(&party("x"), b, "work").unwrap();
    ledger.accept_fulfillment(&party("issuer"), b, f).unwrap();

    for err in [
        ledger.accept_fulfillment(&party("issuer"), b, f).unwrap_err(),
        ledger.cancel_bounty(&party("issuer"), b).unwrap_err(),
    ] {
        assert!(matches!(
            err,
            LedgerError::InvalidState {
                status: BountyStatus::Accepted,
                ..
            }
        ));
    }
}

#[test]
fn cancelled_bounty_rejects_fulfill_and_accept() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let f = ledger.fulfill_bounty(&party("x"), b, "early").unwrap();
    ledger.cancel_bounty(&party("issuer"), b).unwrap();

    assert_eq!(
        ledger.fulfill_bounty(&party("y"), b, "late").unwrap_err().code(),
        "INVALID_STATE"
    );
    assert_eq!(
        ledger
            .accept_fulfillment(&party("issuer"), b, f)
            .unwrap_err()
            .code(),
        "INVALID_STATE"
    );
}

#[test]
fn non_issuer_cannot_cancel() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let err = ledger.cancel_bounty(&party("y"), b).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized { .. }));
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Created);
}

#[test]
fn out_of_range_lookups_are_not_found() {
    let (mut ledger, _) = setup();
    assert_eq!(ledger.bounty(BountyId(0)).unwrap_err().code(), "NOT_FOUND");
    assert_eq!(ledger.bounty_status(BountyId(0)).unwrap_err().code(), "NOT_FOUND");
    assert_eq!(ledger.fulfillment_count(BountyId(0)).unwrap_err().code(), "NOT_FOUND");
    let b = issue(&mut ledger, 1);
    assert_eq!(
        ledger.fulfillment(b, FulfillmentId(0)).unwrap_err().code(),
        "NOT_FOUND"
    );
    assert_eq!(
        ledger.cancel_bounty(&party("issuer"), BountyId(9)).unwrap_err().code(),
        "NOT_FOUND"
    );
}

#[test]
fn scenario_a_accept_first_of_two_fulfillments() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let x_before = balance(&ledger, "x");
    let y_before = balance(&ledger, "y");

    let f0 = ledger.fulfill_bounty(&party("x"), b, "x's work").unwrap();
    let f1 = ledger.fulfill_bounty(&party("y"), b, "y's work").unwrap();
    ledger.accept_fulfillment(&party("issuer"), b, f0).unwrap();

    assert_eq!(balance(&ledger, "x"), x_before.checked_add(Amount::new(ONE)).unwrap());
    assert_eq!(balance(&ledger, "y"), y_before);
    assert_eq!(ledger.escrow_balance(), Amount::ZERO);
    assert_eq!(ledger.treasury().vault_balance(), Amount::ZERO);
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Accepted);
    assert_eq!(ledger.bounty(b).unwrap().accepted_fulfillment, Some(f0));
    assert!(ledger.fulfillment(b, f0).unwrap().accepted);
    assert!(!ledger.fulfillment(b, f1).unwrap().accepted);
}

#[test]
fn scenario_b_cancel_refunds_exact_reward() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    assert_eq!(balance(&ledger, "issuer"), Amount::new(START_BALANCE - ONE));

    ledger.cancel_bounty(&party("issuer"), b).unwrap();

    assert_eq!(balance(&ledger, "issuer"), Amount::new(START_BALANCE));
    assert_eq!(ledger.escrow_balance(), Amount::ZERO);
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Cancelled);
}

#[test]
fn scenario_c_fulfill_after_deadline_fails() {
    let (mut ledger, clock) = setup();
    let deadline = clock.now().checked_add_secs(2 * DAY).unwrap();
    let b = ledger
        .issue_bounty(&party("issuer"), "task", deadline, Amount::new(ONE))
        .unwrap();

    clock.advance_secs(2 * DAY + 1).unwrap();
    let err = ledger.fulfill_bounty(&party("x"), b, "too late").unwrap_err();
    assert!(matches!(err, LedgerError::DeadlinePassed { .. }));
    assert_eq!(ledger.fulfillment_count(b).unwrap(), 0);

    // The issuer can still recover the reward.
    ledger.cancel_bounty(&party("issuer"), b).unwrap();
    assert_eq!(balance(&ledger, "issuer"), Amount::new(START_BALANCE));
}

#[test]
fn refused_refund_keeps_bounty_open_until_retry() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    ledger.treasury_mut().refuse(&party("issuer"), "wallet locked");

    let err = ledger.cancel_bounty(&party("issuer"), b).unwrap_err();
    assert_eq!(err.code(), "TRANSFER_FAILED");
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Created);
    assert_eq!(ledger.escrow_balance(), Amount::new(ONE));
    assert!(ledger.bounty(b).unwrap().transitions.is_empty());
    assert_eq!(ledger.events().len(), 1);

    ledger.treasury_mut().accept(&party("issuer"));
    ledger.cancel_bounty(&party("issuer"), b).unwrap();
    assert_eq!(ledger.bounty_status(b).unwrap(), BountyStatus::Cancelled);
}

#[test]
fn events_carry_indices_and_identities() {
    let (mut ledger, _) = setup();
    let b = issue(&mut ledger, ONE);
    let f = ledger.fulfill_bounty(&party("y"), b, "work").unwrap();
    ledger.accept_fulfillment(&party("issuer"), b, f).unwrap();

    let events: Vec<&LedgerEvent> = ledger.events().iter().map(|r| &r.event).collect();
    assert_eq!(
        events,
        [
            &LedgerEvent::BountyIssued {
                bounty: b,
                issuer: party("issuer"),
                reward: Amount::new(ONE),
                deadline: far_deadline(),
            },
            &LedgerEvent::BountyFulfilled {
                bounty: b,
                fulfillment: f,
                fulfiller: party("y"),
                issuer: party("issuer"),
            },
            &LedgerEvent::FulfillmentAccepted {
                bounty: b,
                fulfillment: f,
                issuer: party("issuer"),
                fulfiller: party("y"),
                reward: Amount::new(ONE),
            },
        ]
    );
}

#[test]
fn transition_log_records_actor_and_time() {
    let (mut ledger, clock) = setup();
    let b = issue(&mut ledger, 10);
    let when = clock.advance_secs(3_600).unwrap();
    ledger.cancel_bounty(&party("issuer"), b).unwrap();

    let bounty = ledger.bounty(b).unwrap();
    assert_eq!(bounty.transitions.len(), 1);
    assert_eq!(bounty.transitions[0].from, BountyStatus::Created);
    assert_eq!(bounty.transitions[0].to, BountyStatus::Cancelled);
    assert_eq!(bounty.transitions[0].at, when);
    assert_eq!(bounty.transitions[0].actor, party("issuer"));
    assert_eq!(bounty.cancelled_on, Some(when));
}
