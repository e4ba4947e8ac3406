//! Dashboard scenarios against the demo account

use pretty_assertions::assert_eq;
use urza_ledger::{
    LedgerError, ReferralFilter, ReferralStatus, StatusCounts, TransactionFilter,
    TransactionKind, TransactionStatus,
};
use urza_test_utils::{date, demo_store, referral_input};

#[test]
fn test_new_referral_lands_first_as_pending() {
    let (mut store, _) = demo_store();
    let referral = store.add_referral(referral_input("Priya Sharma")).unwrap();

    assert_eq!(referral.status, ReferralStatus::Pending);
    assert_eq!(referral.points, 100);
    assert_eq!(store.referrals()[0].id, referral.id);
}

#[test]
fn test_submit_then_complete_scenario() {
    let (mut store, _) = demo_store();
    assert_eq!(store.user().unwrap().total_points, 1250);

    let referral = store.add_referral(referral_input("Priya Sharma")).unwrap();
    let counts = store.derived_stats().referrals;
    assert_eq!(counts.all, 4);
    assert_eq!(counts.pending, 2);

    store
        .advance_referral_status(&referral.id, ReferralStatus::Completed)
        .unwrap();

    assert_eq!(store.user().unwrap().total_points, 1350);
    assert_eq!(
        store.derived_stats().referrals,
        StatusCounts { all: 4, pending: 1, in_process: 1, completed: 2 }
    );
}

#[test]
fn test_completing_twice_credits_once() {
    let (mut store, _) = demo_store();
    let referral = store.add_referral(referral_input("Ravi")).unwrap();

    store
        .advance_referral_status(&referral.id, ReferralStatus::Completed)
        .unwrap();
    store
        .advance_referral_status(&referral.id, ReferralStatus::Completed)
        .unwrap();

    assert_eq!(store.user().unwrap().total_points, 1350);
    assert_eq!(store.derived_stats().total_earned, 200);
}

#[test]
fn test_completing_fixture_referral_is_noop() {
    // Fixture "1" arrives already completed; re-asserting must not pay again
    let (mut store, _) = demo_store();
    let change = store
        .advance_referral_status(&"1".into(), ReferralStatus::Completed)
        .unwrap();
    assert_eq!(change.credited, 0);
    assert_eq!(store.user().unwrap().total_points, 1250);
}

#[test]
fn test_back_to_pending_is_rejected() {
    let (mut store, _) = demo_store();
    for id in ["1", "2"] {
        let from = store.referral(&id.into()).unwrap().status;
        assert_eq!(
            store.advance_referral_status(&id.into(), ReferralStatus::Pending),
            Err(LedgerError::InvalidTransition { from, to: ReferralStatus::Pending })
        );
    }
    assert_eq!(store.user().unwrap().total_points, 1250);
}

#[test]
fn test_in_process_then_completed_updates_date() {
    let (mut store, clock) = demo_store();
    store
        .advance_referral_status(&"3".into(), ReferralStatus::InProcess)
        .unwrap();
    clock.set(date(2024, 2, 10));
    let change = store
        .advance_referral_status(&"3".into(), ReferralStatus::Completed)
        .unwrap();

    assert_eq!(change.referral.updated_date, date(2024, 2, 10));
    assert_eq!(change.referral.submitted_date, date(2024, 1, 25));
    assert_eq!(change.earned.unwrap().description, "Referral: Sunita Patel");
}

#[test]
fn test_withdrawal_pending_not_counted_until_completed() {
    let (mut store, _) = demo_store();
    let before = store.derived_stats();

    let txn = store.request_withdrawal(500, "user@upi").unwrap();
    assert_eq!(store.transactions()[0], txn);
    assert_eq!(txn.status, TransactionStatus::Pending);
    assert_eq!(txn.amount, 500);

    let after = store.derived_stats();
    assert_eq!(after.total_withdrawn, before.total_withdrawn);
    assert_eq!(after.total_earned, before.total_earned);
    assert_eq!(after.pending_withdrawals, 500);
    // Withdrawals never debit the point balance
    assert_eq!(store.user().unwrap().total_points, 1250);
}

#[test]
fn test_search_and_filters() {
    let (mut store, _) = demo_store();
    store.add_referral(referral_input("Kiran Rao")).unwrap();

    let hits = store.search_referrals(&ReferralFilter::search("maharashtra"));
    let names: Vec<&str> = hits.iter().map(|r| r.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Kiran Rao", "Priya Sharma"]);

    let pending = store.search_referrals(
        &ReferralFilter::default().with_status(ReferralStatus::Pending),
    );
    assert_eq!(pending.len(), 2);

    let withdrawals = store.transactions_of(TransactionFilter::Withdrawal);
    assert_eq!(withdrawals.len(), 1);
    assert_eq!(withdrawals[0].kind, TransactionKind::Withdrawal);
    assert_eq!(store.transactions_of(TransactionFilter::All).len(), 2);
}
