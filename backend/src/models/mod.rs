//! Domain models for the household scheduler

pub mod assignment;
pub mod debt;
pub mod event;
pub mod income;
pub mod obligation;
pub mod sources;
pub mod validation;

// Re-exports
pub use assignment::{PaidSource, ScheduledAssignment};
pub use debt::{DebtError, DebtState, PaymentReceipt};
pub use event::{Event, EventLog};
pub use income::{IncomePeriod, IncomeSettings};
pub use obligation::{Obligation, ObligationDetail, ObligationKey, ObligationKind, SplitPart};
pub use sources::{Bill, BudgetCategoryAllotment, Debt, HouseholdSources, TransactionRecord};
pub use validation::ValidationError;
