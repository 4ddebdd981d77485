//! Scheduler - household scheduling pipeline
//!
//! Ties the components together for one household pass:
//!
//! ```text
//! IncomeSettings ──→ recurrence::project_income ──→ IncomePeriods ─┐
//! Bills/Debts/Budgets ──→ materializer ──→ splits ──→ Obligations ─┤
//!                                                                  ▼
//!                               lock partition ──→ allocation engine ⇄ ScheduleStore
//!                                                                  │
//!                      TransactionLog ──→ paid reconciliation ─────┘
//! DebtStates ──→ payoff::compare_strategies ──→ PayoffComparisons
//! ```
//!
//! Obligations are materialized from the first projected paycheck to the
//! end of the window. Without income the whole window is materialized and
//! everything lands in unassigned.
//!
//! A pass is synchronous and runs to completion; it suspends only at store
//! and transaction-log calls. There is no coordination between concurrent
//! passes for the same household beyond the store's first-writer-wins
//! period write.

pub mod checkpoint;
pub mod engine;
pub mod lock;
pub mod reconcile;

use crate::config::HouseholdConfig;
use crate::materializer::{apply_split_directives, materialize, SplitDirective};
use crate::models::assignment::PaidSource;
use crate::models::debt::DebtState;
use crate::models::event::{Event, EventLog};
use crate::models::income::IncomePeriod;
use crate::models::sources::HouseholdSources;
use crate::payoff::strategy::{compare_strategies, PayoffComparison};
use crate::recurrence::project_income;
use crate::store::{ScheduleStore, StoreError, TransactionLog};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use checkpoint::{compute_fingerprint, ScheduleSnapshot, SnapshotError};
pub use engine::{allocate, pay_cycles, schedule, Allocation, PayCycle, ScheduleResult};
pub use lock::{is_locked, partition_periods, ClassifiedPeriod, PeriodLock};
pub use reconcile::{reconcile_paid, ReconciliationMatch};

/// Scheduling pass errors
///
/// Shortfall, non-amortizing debts and persistence conflicts are results,
/// not errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything one household pass produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub income_periods: Vec<IncomePeriod>,
    pub schedule: ScheduleResult,
    pub focus_debt_id: Option<String>,
    pub payoff: Vec<PayoffComparison>,
    pub reconciled: Vec<ReconciliationMatch>,
    /// Every decision of the pass, input handling first
    #[serde(skip)]
    pub events: EventLog,
}

/// Run the full pipeline for one household
///
/// # Arguments
///
/// * `config` - Household configuration
/// * `sources` - Income settings, bills, debts and budget categories
/// * `store` - Locked-period store (also holds dismissals and paid flags)
/// * `transactions` - Recorded transactions, read only
/// * `splits` - User split directives
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::config::HouseholdConfig;
/// use household_scheduler_core::models::sources::{Bill, HouseholdSources, TransactionRecord};
/// use household_scheduler_core::scheduler::plan;
/// use household_scheduler_core::store::InMemoryScheduleStore;
/// use household_scheduler_core::{Frequency, IncomeSettings};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let config = HouseholdConfig::new("home", today);
/// let sources = HouseholdSources {
///     income: vec![IncomeSettings {
///         id: "job".to_string(),
///         name: "Job".to_string(),
///         net_amount: 200_000,
///         frequency: Frequency::Biweekly,
///         next_date: NaiveDate::from_ymd_opt(2026, 10, 23).unwrap(),
///     }],
///     bills: vec![Bill {
///         id: "rent".to_string(),
///         company: "Landlord".to_string(),
///         amount: 150_000,
///         due_day_of_month: 1,
///         frequency: Frequency::Monthly,
///     }],
///     ..Default::default()
/// };
///
/// let mut store = InMemoryScheduleStore::new();
/// let transactions: Vec<TransactionRecord> = Vec::new();
/// let plan = plan(&config, &sources, &mut store, &transactions, &[]).unwrap();
/// let rent_nov = plan
///     .schedule
///     .assignments
///     .iter()
///     .find(|a| a.obligation().due_date == NaiveDate::from_ymd_opt(2026, 11, 1).unwrap())
///     .unwrap();
/// assert_eq!(rent_nov.income_period_id(), "job:2026-10-23");
/// ```
pub fn plan<S, T>(
    config: &HouseholdConfig,
    sources: &HouseholdSources,
    store: &mut S,
    transactions: &T,
    splits: &[SplitDirective],
) -> Result<SchedulePlan, ScheduleError>
where
    S: ScheduleStore + ?Sized,
    T: TransactionLog + ?Sized,
{
    config.validate()?;
    let household = config.household_id.as_str();
    let (window_start, window_end) = config.window().ok_or_else(|| {
        ScheduleError::InvalidConfig("projection window is out of calendar range".to_string())
    })?;

    let mut events = EventLog::new();

    // Income
    let mut income_periods = Vec::new();
    for settings in &sources.income {
        match project_income(settings, window_start, window_end) {
            Ok(periods) => income_periods.extend(periods),
            Err(err) => {
                warn!(
                    "event=source_skipped source_kind=income source_id={} reason=\"{}\"",
                    settings.id, err
                );
                events.log(Event::SourceSkipped {
                    source_kind: "income".to_string(),
                    source_id: settings.id.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    income_periods.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    // Obligations. Nothing due before the first paycheck can be funded from
    // the projection, so materialization starts there.
    let obligations_start = income_periods
        .first()
        .map_or(window_start, |period| period.date.max(window_start));
    if obligations_start > window_start {
        debug!(
            "event=obligations_clipped window_start={} first_period={}",
            window_start, obligations_start
        );
    }
    let mut materialized = materialize(
        &sources.bills,
        &sources.debts,
        &sources.budget_categories,
        obligations_start,
        window_end,
        config,
    );
    events.append(&mut materialized.events);
    let obligations = apply_split_directives(materialized.obligations, splits, &mut events);

    // Allocation
    let mut result = schedule(config, income_periods.clone(), obligations, store)?;
    events.append(&mut result.events);

    // Paid status
    let recorded = transactions.transactions(household)?;
    let reconciled = reconcile_paid(
        &mut result.assignments,
        &recorded,
        config.reconciliation_window_days,
    );
    for matched in &reconciled {
        // Only persisted assignments exist in the store; open ones report false
        store.set_paid(household, &matched.key, true, PaidSource::Reconciliation)?;
        events.log(Event::PaidReconciled {
            key: matched.key.clone(),
            transaction_id: matched.transaction_id.clone(),
            days_apart: matched.days_apart,
        });
    }

    // Payoff comparison
    let debts: Vec<DebtState> = sources
        .debts
        .iter()
        .filter(|debt| debt.validate().is_ok())
        .map(DebtState::from)
        .collect();
    let payoff = compare_strategies(&debts, config.extra_payment, config.today);

    info!(
        "event=plan_complete household={} periods={} assignments={} unassigned={} reconciled={}",
        household,
        income_periods.len(),
        result.assignments.len(),
        result.unassigned.len(),
        reconciled.len()
    );

    Ok(SchedulePlan {
        income_periods,
        schedule: result,
        focus_debt_id: materialized.focus_debt_id,
        payoff,
        reconciled,
        events,
    })
}
