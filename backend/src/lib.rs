//! Household Scheduler Core - Rust Engine
//!
//! Financial obligation scheduling for a household finance planner.
//!
//! # Architecture
//!
//! - **core**: Calendar arithmetic and recurrence frequencies
//! - **recurrence**: Projects paychecks and other recurring dates over a window
//! - **models**: Domain types (IncomePeriod, Obligation, DebtState, ScheduledAssignment)
//! - **payoff**: Amortization engine and avalanche/snowball payoff simulator
//! - **materializer**: Turns bills, debts and budgets into due-dated obligations
//! - **scheduler**: Lock partition, allocation, paid reconciliation, full pipeline
//! - **store**: Schedule store adapter trait plus an in-memory adapter
//! - **config**: Household-wide settings passed into every pass
//! - **logging**: stderr logger bootstrap for hosts without their own
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. Household settings are passed explicitly, never read from global state
//! 3. Locked, persisted periods are never recomputed; only paid flags change
//! 4. An obligation instance is assigned to at most one income period

// Module declarations
pub mod config;
pub mod core;
pub mod logging;
pub mod materializer;
pub mod models;
pub mod payoff;
pub mod recurrence;
pub mod scheduler;
pub mod store;

// Re-exports for convenience
pub use config::HouseholdConfig;
pub use core::time::Frequency;
pub use materializer::{materialize, Materialized, SplitDirective};
pub use models::{
    assignment::{PaidSource, ScheduledAssignment},
    debt::{DebtError, DebtState, PaymentReceipt},
    event::{Event, EventLog},
    income::{IncomePeriod, IncomeSettings},
    obligation::{Obligation, ObligationDetail, ObligationKey, ObligationKind},
    sources::{Bill, BudgetCategoryAllotment, Debt, HouseholdSources, TransactionRecord},
    validation::ValidationError,
};
pub use payoff::{compare_strategies, simulate, PayoffComparison, PayoffStrategy};
pub use scheduler::{plan, schedule, ScheduleError, SchedulePlan, ScheduleResult};
pub use store::{InMemoryScheduleStore, ScheduleStore, StoreError, TransactionLog};
