//! End-to-end tests for the household pipeline
//!
//! Income projection, materialization, splits, allocation, reconciliation
//! and payoff comparison in one pass.

use chrono::NaiveDate;
use household_scheduler_core::scheduler::ScheduleSnapshot;
use household_scheduler_core::{
    plan, Bill, BudgetCategoryAllotment, Debt, Frequency, HouseholdConfig, HouseholdSources,
    IncomeSettings, InMemoryScheduleStore, ObligationKey, ObligationKind, PayoffStrategy,
    ScheduleError, ScheduleStore, SplitDirective, StoreError, TransactionRecord,
};

const HOUSEHOLD: &str = "household-1";

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn config() -> HouseholdConfig {
    HouseholdConfig::new(HOUSEHOLD, d(2026, 10, 19))
}

fn job(net_amount: i64) -> IncomeSettings {
    IncomeSettings {
        id: "job".to_string(),
        name: "Day job".to_string(),
        net_amount,
        frequency: Frequency::Biweekly,
        next_date: d(2026, 10, 23),
    }
}

fn rent() -> Bill {
    Bill {
        id: "rent".to_string(),
        company: "Landlord".to_string(),
        amount: 150_000,
        due_day_of_month: 1,
        frequency: Frequency::Monthly,
    }
}

fn debt(id: &str, balance: i64, rate: f64, minimum: i64, due_day: u32) -> Debt {
    Debt {
        id: id.to_string(),
        name: format!("Card {}", id),
        balance,
        annual_rate_percent: rate,
        minimum_payment: minimum,
        due_day_of_month: due_day,
        extra_payment: 0,
        exclude_from_payoff: false,
    }
}

fn rent_only() -> HouseholdSources {
    HouseholdSources {
        income: vec![job(200_000)],
        bills: vec![rent()],
        ..Default::default()
    }
}

fn no_transactions() -> Vec<TransactionRecord> {
    Vec::new()
}

fn rent_key(m: u32) -> ObligationKey {
    ObligationKey::new(ObligationKind::RecurringBill, "rent", d(2026, m, 1))
}

// ============================================================================
// Full pass
// ============================================================================

#[test]
fn test_full_household_pass() {
    let config = config().with_extra_payment(10_000);
    let sources = HouseholdSources {
        income: vec![job(250_000)],
        bills: vec![rent()],
        debts: vec![debt("A", 500_000, 22.0, 15_000, 12), debt("B", 100_000, 8.0, 5_000, 20)],
        budget_categories: vec![BudgetCategoryAllotment {
            id: "food".to_string(),
            name: "Groceries".to_string(),
            monthly_amount: 40_000,
            due_day_of_month: 15,
        }],
    };
    let mut store = InMemoryScheduleStore::new();

    let result = plan(&config, &sources, &mut store, &no_transactions(), &[]).unwrap();

    assert_eq!(result.focus_debt_id.as_deref(), Some("A"));
    assert!(!result.income_periods.is_empty());
    assert!(!result.schedule.assignments.is_empty());

    // Every assignment points at a projected period
    for assignment in &result.schedule.assignments {
        assert!(result
            .income_periods
            .iter()
            .any(|p| p.id == assignment.income_period_id()));
    }

    // Payoff comparison for both strategies
    assert_eq!(result.payoff.len(), 2);
    assert_eq!(result.payoff[0].strategy, PayoffStrategy::Avalanche);
    assert_eq!(result.payoff[1].strategy, PayoffStrategy::Snowball);
    assert!(result.payoff[0].total_interest <= result.payoff[1].total_interest);

    // Past periods were sealed in the store
    assert!(store.period_writes() > 0);
    assert!(ScheduleSnapshot::capture(&config, &result.schedule)
        .unwrap()
        .verify()
        .is_ok());
}

#[test]
fn test_rent_lands_in_covering_period() {
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config(), &rent_only(), &mut store, &no_transactions(), &[]).unwrap();

    assert_eq!(result.schedule.period_of(&rent_key(11)), Some("job:2026-10-23"));
    assert_eq!(result.schedule.period_of(&rent_key(12)), Some("job:2026-11-20"));
}

#[test]
fn test_second_pass_reproduces_schedule() {
    let config = config();
    let mut store = InMemoryScheduleStore::new();
    let first = plan(&config, &rent_only(), &mut store, &no_transactions(), &[]).unwrap();
    let writes = store.period_writes();
    let second = plan(&config, &rent_only(), &mut store, &no_transactions(), &[]).unwrap();

    assert_eq!(store.period_writes(), writes);
    assert_eq!(first.schedule.assignments, second.schedule.assignments);
    assert_eq!(
        ScheduleSnapshot::capture(&config, &first.schedule).unwrap().fingerprint,
        ScheduleSnapshot::capture(&config, &second.schedule).unwrap().fingerprint
    );
}

// ============================================================================
// Input handling
// ============================================================================

#[test]
fn test_invalid_income_is_skipped() {
    let sources = HouseholdSources {
        income: vec![job(0)],
        bills: vec![rent()],
        ..Default::default()
    };
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config(), &sources, &mut store, &no_transactions(), &[]).unwrap();

    assert!(result.income_periods.is_empty());
    assert!(result.schedule.assignments.is_empty());
    assert!(result.schedule.is_unassigned(&rent_key(11)));
    assert_eq!(result.events.events_of_type("SourceSkipped").len(), 1);
}

#[test]
fn test_nothing_due_before_first_paycheck() {
    let sources = HouseholdSources {
        income: vec![IncomeSettings {
            id: "job".to_string(),
            name: "Day job".to_string(),
            net_amount: 300_000,
            frequency: Frequency::Monthly,
            next_date: d(2026, 10, 25),
        }],
        bills: vec![Bill {
            id: "rent".to_string(),
            company: "Landlord".to_string(),
            amount: 100_000,
            due_day_of_month: 20,
            frequency: Frequency::Monthly,
        }],
        ..Default::default()
    };
    let config = config();
    let mut store = InMemoryScheduleStore::new();

    let first = plan(&config, &sources, &mut store, &no_transactions(), &[]).unwrap();
    assert_eq!(first.income_periods[0].date, d(2026, 4, 25));
    assert!(first.schedule.unassigned.is_empty());

    // Apr 20 falls inside the window but ahead of every paycheck
    let april = ObligationKey::new(ObligationKind::RecurringBill, "rent", d(2026, 4, 20));
    assert!(first.schedule.period_of(&april).is_none());
    let earliest = first
        .schedule
        .assignments
        .iter()
        .map(|a| a.obligation().due_date)
        .min();
    assert_eq!(earliest, Some(d(2026, 5, 20)));

    let second = plan(&config, &sources, &mut store, &no_transactions(), &[]).unwrap();
    assert!(second.schedule.unassigned.is_empty());
    assert_eq!(first.schedule.assignments, second.schedule.assignments);
}

#[test]
fn test_split_directive_flows_through() {
    let split = SplitDirective::new(rent_key(12), vec![100_000, 50_000]);
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config(), &rent_only(), &mut store, &no_transactions(), &[split]).unwrap();

    let parts: Vec<_> = result
        .schedule
        .assignments
        .iter()
        .filter(|a| a.key().unsplit() == rent_key(12))
        .collect();
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|a| a.is_split()));
    assert_eq!(parts.iter().map(|a| a.amount()).sum::<i64>(), 150_000);
    assert_eq!(result.events.events_of_type("SplitApplied").len(), 1);
}

#[test]
fn test_bad_split_is_rejected_and_obligation_kept() {
    let split = SplitDirective::new(rent_key(12), vec![100_000, 10_000]);
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config(), &rent_only(), &mut store, &no_transactions(), &[split]).unwrap();

    assert!(result.schedule.period_of(&rent_key(12)).is_some());
    assert_eq!(result.events.events_of_type("SplitRejected").len(), 1);
}

#[test]
fn test_dismissed_key_skipped() {
    let mut store = InMemoryScheduleStore::new();
    store.dismiss(HOUSEHOLD, &rent_key(12)).unwrap();
    let result = plan(&config(), &rent_only(), &mut store, &no_transactions(), &[]).unwrap();

    assert_eq!(result.schedule.dismissed, vec![rent_key(12)]);
    assert!(result.schedule.period_of(&rent_key(12)).is_none());
}

// ============================================================================
// Reconciliation and failures
// ============================================================================

#[test]
fn test_transaction_marks_persisted_assignment_paid() {
    let transactions = vec![TransactionRecord {
        id: "t-rent".to_string(),
        date: d(2026, 10, 31),
        amount: 150_000,
        linked_debt_id: None,
        linked_bill_id: Some("rent".to_string()),
    }];
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config(), &rent_only(), &mut store, &transactions, &[]).unwrap();

    assert_eq!(result.reconciled.len(), 1);
    assert_eq!(result.reconciled[0].key, rent_key(11));
    assert_eq!(result.reconciled[0].days_apart, 1);

    let stored = store
        .load_period(HOUSEHOLD, "job:2026-10-23")
        .unwrap()
        .unwrap();
    let rent = stored.iter().find(|a| a.key() == rent_key(11)).unwrap();
    assert!(rent.is_paid());
}

#[test]
fn test_offline_store_fails_plan() {
    let mut store = InMemoryScheduleStore::new();
    store.set_offline(true);
    let result = plan(&config(), &rent_only(), &mut store, &no_transactions(), &[]);
    assert!(matches!(
        result,
        Err(ScheduleError::Store(StoreError::Unavailable(_)))
    ));
}

#[test]
fn test_invalid_config_fails_plan() {
    let mut config = config();
    config.household_id = String::new();
    let mut store = InMemoryScheduleStore::new();
    let result = plan(&config, &rent_only(), &mut store, &no_transactions(), &[]);
    assert!(matches!(result, Err(ScheduleError::InvalidConfig(_))));
}
