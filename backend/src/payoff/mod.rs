//! Payoff Module
//!
//! Debt amortization and multi-debt payoff strategies:
//! - Single-debt amortization under a fixed payment
//! - Avalanche / snowball ordering and focus-debt selection
//! - Month-by-month simulation with extra-payment rollover
//!
//! The simulator feeds both the strategy comparison view and the
//! materializer's focus-debt extra payment.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use household_scheduler_core::DebtState;
//! use household_scheduler_core::payoff::{compare_strategies, PayoffStrategy};
//!
//! let debts = vec![
//!     DebtState::new("A", "Card A", 500_000, 22.0, 15_000),
//!     DebtState::new("B", "Card B", 100_000, 8.0, 5_000),
//! ];
//! let anchor = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
//! let comparison = compare_strategies(&debts, 10_000, anchor);
//!
//! assert_eq!(comparison.len(), 2);
//! assert_eq!(comparison[0].strategy, PayoffStrategy::Avalanche);
//! // Avalanche never pays more interest than snowball
//! assert!(comparison[0].total_interest <= comparison[1].total_interest);
//! ```

pub mod amortization;
pub mod strategy;

// Re-export public API
pub use amortization::{
    amortize, amortization_step, monthly_interest, monthly_rate, Amortization,
    AmortizationStep, AmortizationSteps, AmortizationSummary, PayoffHorizon,
    MAX_AMORTIZATION_MONTHS,
};
pub use strategy::{
    compare_strategies, focus_debt, order_debts, simulate, DebtPayoffSchedule, PayoffComparison,
    PayoffPlan, PayoffStrategy,
};
