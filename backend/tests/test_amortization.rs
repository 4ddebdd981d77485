//! Tests for the amortization engine
//!
//! Critical invariants tested:
//! - Principal portions sum to the starting balance
//! - Non-amortizing debts are reported up front, never iterated
//! - Every sequence is finite

use household_scheduler_core::payoff::{
    amortization_step, amortize, monthly_interest, monthly_rate, Amortization, PayoffHorizon,
    MAX_AMORTIZATION_MONTHS,
};
use proptest::prelude::*;

fn steps_of(amortization: Amortization) -> Vec<household_scheduler_core::payoff::AmortizationStep> {
    match amortization {
        Amortization::Amortizing(steps) => steps.collect(),
        Amortization::NonAmortizing { .. } => panic!("expected an amortizing debt"),
    }
}

// ============================================================================
// Reference cases
// ============================================================================

#[test]
fn test_reference_schedule_1200_at_12_percent() {
    // $1,200.00 at 12% APR paying $120.00
    let steps = steps_of(amortize(120_000, 12.0, 12_000));

    assert_eq!(steps.len(), 11);
    assert_eq!(steps[0].month_index, 1);
    assert_eq!(steps[0].interest_portion, 1_200);
    assert_eq!(steps[0].principal_portion, 10_800);
    assert_eq!(steps[0].ending_balance, 109_200);
    assert_eq!(steps.last().unwrap().ending_balance, 0);

    let principal: i64 = steps.iter().map(|s| s.principal_portion).sum();
    assert_eq!(principal, 120_000);
}

#[test]
fn test_non_amortizing_1000_at_2_percent_monthly() {
    // Interest is $20.00 a month, payment $15.00
    match amortize(100_000, 24.0, 1_500) {
        Amortization::NonAmortizing {
            monthly_interest,
            payment,
        } => {
            assert_eq!(monthly_interest, 2_000);
            assert_eq!(payment, 1_500);
        }
        Amortization::Amortizing(_) => panic!("payment below interest must not amortize"),
    }
    assert_eq!(amortize(100_000, 24.0, 1_500).horizon(), PayoffHorizon::Never);
    assert_eq!(PayoffHorizon::Never.to_string(), "∞");
}

#[test]
fn test_payment_equal_to_interest_is_non_amortizing() {
    assert!(!amortize(100_000, 24.0, 2_000).is_amortizing());
    assert!(amortize(100_000, 24.0, 2_001).is_amortizing());
}

#[test]
fn test_summary_totals() {
    let summary = amortize(120_000, 12.0, 12_000).summarize().unwrap();
    assert_eq!(summary.months, 11);
    assert_eq!(summary.total_principal, 120_000);
    assert!(summary.total_interest > 0);
    assert_eq!(amortize(120_000, 12.0, 12_000).horizon(), PayoffHorizon::Months(11));
}

#[test]
fn test_monthly_interest_rounding() {
    let rate = monthly_rate(18.0);
    // 0.015 × 333 = 4.995 → 5
    assert_eq!(monthly_interest(333, rate), 5);
    assert_eq!(monthly_interest(0, rate), 0);
    assert_eq!(monthly_interest(10_000, 0.0), 0);
}

#[test]
fn test_step_without_principal_keeps_balance() {
    let step = amortization_step(3, 100_000, monthly_rate(24.0), 1_500);
    assert_eq!(step.principal_portion, 0);
    assert_eq!(step.ending_balance, 100_000);
    assert_eq!(step.interest_portion, 1_500);
}

#[test]
fn test_slow_payoff_stops_at_cap() {
    // Barely above interest: far longer than a century
    let steps = steps_of(amortize(10_000_000, 12.0, 100_001));
    assert!(steps.len() as u32 <= MAX_AMORTIZATION_MONTHS);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_principal_sums_to_balance(
        balance in 1i64..5_000_000,
        rate in 0.0f64..36.0,
        extra in 1i64..200_000,
    ) {
        let interest = monthly_interest(balance, monthly_rate(rate));
        // A payment comfortably above interest finishes well inside the cap
        let payment = interest + balance / 200 + extra;

        let steps = steps_of(amortize(balance, rate, payment));
        let principal: i64 = steps.iter().map(|s| s.principal_portion).sum();
        prop_assert_eq!(principal, balance);
        prop_assert_eq!(steps.last().map(|s| s.ending_balance), Some(0));

        for pair in steps.windows(2) {
            prop_assert!(pair[1].ending_balance < pair[0].ending_balance);
        }
    }

    #[test]
    fn test_payment_at_or_below_interest_never_amortizes(
        balance in 10_000i64..5_000_000,
        rate in 1.0f64..36.0,
        shortfall in 0i64..1_000,
    ) {
        let interest = monthly_interest(balance, monthly_rate(rate));
        let payment = (interest - shortfall).max(0);
        prop_assert!(!amortize(balance, rate, payment).is_amortizing());
    }
}
