//! Tests for paid-status reconciliation
//!
//! Critical invariants tested:
//! - A linked transaction within the window marks the assignment paid
//! - Each transaction pays at most one assignment
//! - A user toggle is never overridden
//! - Budget allotments are never matched

use chrono::NaiveDate;
use household_scheduler_core::scheduler::{reconcile_paid, schedule};
use household_scheduler_core::{
    Frequency, HouseholdConfig, IncomePeriod, InMemoryScheduleStore, Obligation,
    ObligationDetail, PaidSource, ScheduleStore, ScheduledAssignment, TransactionRecord,
};

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, day).unwrap()
}

fn assigned(obligation: Obligation) -> ScheduledAssignment {
    ScheduledAssignment::new("job:2026-11-06".to_string(), obligation)
}

fn power_bill(due: NaiveDate) -> Obligation {
    Obligation::new(
        "power",
        "Power Co",
        9_000,
        due,
        ObligationDetail::RecurringBill {
            frequency: Frequency::Monthly,
        },
    )
}

fn bill_payment(id: &str, date: NaiveDate) -> TransactionRecord {
    TransactionRecord {
        id: id.to_string(),
        date,
        amount: 9_000,
        linked_debt_id: None,
        linked_bill_id: Some("power".to_string()),
    }
}

// ============================================================================
// Matching
// ============================================================================

#[test]
fn test_three_days_apart_is_paid() {
    let mut assignments = vec![assigned(power_bill(d(11, 10)))];
    let matches = reconcile_paid(&mut assignments, &[bill_payment("t1", d(11, 13))], 7);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].days_apart, 3);
    assert!(assignments[0].is_paid());
    assert!(!assignments[0].paid_toggled_by_user());
}

#[test]
fn test_ten_days_apart_is_not_paid() {
    let mut assignments = vec![assigned(power_bill(d(11, 10)))];
    let matches = reconcile_paid(&mut assignments, &[bill_payment("t1", d(11, 20))], 7);
    assert!(matches.is_empty());
    assert!(!assignments[0].is_paid());
}

#[test]
fn test_window_edge_is_inclusive() {
    let mut assignments = vec![assigned(power_bill(d(11, 10)))];
    let matches = reconcile_paid(&mut assignments, &[bill_payment("t1", d(11, 3))], 7);
    assert_eq!(matches.len(), 1);
}

#[test]
fn test_one_transaction_per_assignment() {
    let mut assignments = vec![
        assigned(power_bill(d(10, 10))),
        assigned(power_bill(d(11, 10))),
    ];
    let txs = vec![bill_payment("oct", d(10, 12)), bill_payment("nov", d(11, 9))];
    let matches = reconcile_paid(&mut assignments, &txs, 30);

    assert_eq!(matches.len(), 2);
    let oct = matches.iter().find(|m| m.key == assignments[0].key()).unwrap();
    let nov = matches.iter().find(|m| m.key == assignments[1].key()).unwrap();
    assert_eq!(oct.transaction_id, "oct");
    assert_eq!(nov.transaction_id, "nov");
}

#[test]
fn test_unlinked_transaction_ignored() {
    let mut assignments = vec![assigned(power_bill(d(11, 10)))];
    let mut other = bill_payment("t1", d(11, 10));
    other.linked_bill_id = Some("water".to_string());
    assert!(reconcile_paid(&mut assignments, &[other], 7).is_empty());
}

#[test]
fn test_debt_payment_matches_minimum_not_budget() {
    let due = d(11, 12);
    let minimum = Obligation::new(
        "visa",
        "Visa",
        5_000,
        due,
        ObligationDetail::DebtMinimumPayment { balance: 100_000 },
    );
    let food = Obligation::new("visa", "Food", 5_000, due, ObligationDetail::BudgetCategoryAllotment);
    let mut assignments = vec![assigned(food), assigned(minimum)];
    let tx = TransactionRecord {
        id: "t1".to_string(),
        date: due,
        amount: 5_000,
        linked_debt_id: Some("visa".to_string()),
        linked_bill_id: None,
    };

    let matches = reconcile_paid(&mut assignments, &[tx], 7);
    assert_eq!(matches.len(), 1);
    assert!(!assignments[0].is_paid());
    assert!(assignments[1].is_paid());
}

#[test]
fn test_user_toggle_wins() {
    let mut assignments = vec![assigned(power_bill(d(11, 10)))];
    assignments[0].set_paid(false, PaidSource::User);
    let matches = reconcile_paid(&mut assignments, &[bill_payment("t1", d(11, 10))], 7);
    assert!(matches.is_empty());
    assert!(!assignments[0].is_paid());
}

// ============================================================================
// Write-through
// ============================================================================

#[test]
fn test_store_flag_follows_reconciliation() {
    let config = HouseholdConfig::new("household-1", d(10, 19));
    let period = IncomePeriod {
        id: "job:2026-10-23".to_string(),
        source_id: "job".to_string(),
        source_name: "Job".to_string(),
        amount: 100_000,
        date: d(10, 23),
        frequency: Frequency::Biweekly,
    };
    let power = power_bill(d(10, 25));
    let mut store = InMemoryScheduleStore::new();
    schedule(&config, vec![period], vec![power.clone()], &mut store).unwrap();

    assert!(store
        .set_paid("household-1", &power.key(), true, PaidSource::Reconciliation)
        .unwrap());
    let stored = store.load_period("household-1", "job:2026-10-23").unwrap().unwrap();
    assert!(stored[0].is_paid());

    // User un-toggles; a later reconciliation cannot flip it back
    store
        .set_paid("household-1", &power.key(), false, PaidSource::User)
        .unwrap();
    assert!(!store
        .set_paid("household-1", &power.key(), true, PaidSource::Reconciliation)
        .unwrap());
}
