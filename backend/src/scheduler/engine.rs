//! Allocation Scheduler
//!
//! Assigns obligation instances to the income periods they are paid from,
//! under a running-balance constraint per period.
//!
//! # Algorithm
//!
//! ```text
//! 1. Partition periods: frozen (locked + persisted), pending, open
//! 2. Frozen periods are loaded verbatim; every persisted key and every
//!    dismissed key leaves the pool
//! 3. Walk the remaining periods chronologically. Each walks its pay cycle
//!    [date, next period date] with available = period amount:
//!      head fits                      → assign, available -= amount
//!      discretionary head won't fit   → defer, keep walking
//!      fixed head won't fit           → assign the smallest fitting item
//!                                       until none fit, end the cycle
//! 4. Leftovers are unassigned: deferred (shortfall) or unschedulable
//!    (no computable period covers the due date)
//! 5. Remembered user paid toggles are applied to the computed assignments
//! 6. Pending periods are written through the store once
//! ```
//!
//! # Critical Invariants
//!
//! 1. An assignment's due date lies inside its period's pay cycle
//! 2. An obligation key is assigned to at most one period
//! 3. No normal assignment drives a period's available income negative
//! 4. Frozen assignment sets are never recomputed
//!
//! Budget shortfall is a result, never an error.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::config::HouseholdConfig;
use crate::models::assignment::{PaidSource, ScheduledAssignment};
use crate::models::event::{Event, EventLog};
use crate::models::income::IncomePeriod;
use crate::models::obligation::{Obligation, ObligationKey};
use crate::scheduler::lock::{partition_periods, PeriodLock};
use crate::scheduler::ScheduleError;
use crate::store::{ScheduleStore, StoreError};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

// ============================================================================
// Pay cycles
// ============================================================================

/// The window of due dates an income period pays for
#[derive(Debug, Clone, PartialEq)]
pub struct PayCycle {
    pub period: IncomePeriod,
    /// The period's own date
    pub start: NaiveDate,
    /// The next strictly later period date (inclusive)
    pub end: NaiveDate,
}

impl PayCycle {
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Pay cycles of chronologically sorted periods
///
/// A cycle ends on the next strictly later period date across every income
/// source. The last cycle ends where its own paycheck would recur next.
pub fn pay_cycles(periods: &[IncomePeriod]) -> Vec<PayCycle> {
    periods
        .iter()
        .enumerate()
        .map(|(i, period)| {
            let end = periods[i + 1..]
                .iter()
                .map(|later| later.date)
                .find(|&date| date > period.date)
                .or_else(|| period.next_occurrence())
                .unwrap_or(period.date);
            PayCycle {
                period: period.clone(),
                start: period.date,
                end,
            }
        })
        .collect()
}

// ============================================================================
// Allocation core (pure)
// ============================================================================

/// Outcome of allocating a pool over computable cycles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    pub assignments: Vec<ScheduledAssignment>,
    pub unassigned: Vec<Obligation>,
    pub events: EventLog,
}

fn assign(
    cycle: &PayCycle,
    obligation: &Obligation,
    available: &mut i64,
    assignments: &mut Vec<ScheduledAssignment>,
    events: &mut EventLog,
) {
    *available -= obligation.amount;
    debug!(
        "event=obligation_assigned period={} key={} amount={} available={}",
        cycle.period.id,
        obligation.key(),
        obligation.amount,
        available
    );
    events.log(Event::ObligationAssigned {
        period_id: cycle.period.id.clone(),
        key: obligation.key(),
        amount: obligation.amount,
        available_after: *available,
    });
    assignments.push(ScheduledAssignment::new(
        cycle.period.id.clone(),
        obligation.clone(),
    ));
}

/// Allocate `obligations` over `cycles` (chronological)
///
/// Pure: no store access. Cycles passed here are the ones being computed
/// this run; frozen periods are left out by the caller.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::scheduler::{allocate, pay_cycles};
/// use household_scheduler_core::{Frequency, IncomePeriod, Obligation, ObligationDetail};
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 11, day).unwrap();
/// let paycheck = IncomePeriod {
///     id: "job:2026-11-06".to_string(),
///     source_id: "job".to_string(),
///     source_name: "Job".to_string(),
///     amount: 100_000,
///     date: d(6),
///     frequency: Frequency::Biweekly,
/// };
/// let bill = |id: &str, amount| Obligation::new(
///     id, id, amount, d(10),
///     ObligationDetail::RecurringBill { frequency: Frequency::Monthly },
/// );
///
/// let out = allocate(&pay_cycles(&[paycheck]), vec![bill("car", 60_000), bill("phone", 50_000)]);
/// assert_eq!(out.assignments.len(), 1);
/// assert_eq!(out.assignments[0].amount(), 50_000);
/// assert_eq!(out.unassigned[0].amount, 60_000);
/// ```
pub fn allocate(cycles: &[PayCycle], mut obligations: Vec<Obligation>) -> Allocation {
    obligations.sort_by(|a, b| a.allocation_order(b));

    let n = obligations.len();
    let mut taken = vec![false; n];
    let mut deferred = vec![false; n];
    let mut out = Allocation::default();

    for (c, cycle) in cycles.iter().enumerate() {
        let eligible: Vec<usize> = (0..n)
            .filter(|&i| !taken[i] && cycle.covers(obligations[i].due_date))
            .collect();
        let mut available = cycle.period.amount;

        for &i in &eligible {
            if taken[i] {
                continue;
            }
            let obligation = &obligations[i];
            if obligation.amount <= available {
                taken[i] = true;
                assign(cycle, obligation, &mut available, &mut out.assignments, &mut out.events);
                continue;
            }
            if obligation.is_discretionary() {
                continue;
            }

            // Fixed obligation over budget: fill with the smallest items that fit
            while let Some(j) = eligible
                .iter()
                .copied()
                .filter(|&j| !taken[j] && obligations[j].amount <= available)
                .min_by_key(|&j| obligations[j].amount)
            {
                taken[j] = true;
                assign(cycle, &obligations[j], &mut available, &mut out.assignments, &mut out.events);
            }
            break;
        }

        for &i in &eligible {
            if taken[i] {
                continue;
            }
            let due = obligations[i].due_date;
            let carried = cycles[c + 1..].iter().any(|later| later.covers(due));
            if !carried {
                deferred[i] = true;
                debug!(
                    "event=obligation_deferred period={} key={} amount={}",
                    cycle.period.id,
                    obligations[i].key(),
                    obligations[i].amount
                );
                out.events.log(Event::ObligationDeferred {
                    period_id: cycle.period.id.clone(),
                    key: obligations[i].key(),
                    amount: obligations[i].amount,
                });
            }
        }
    }

    for (i, obligation) in obligations.into_iter().enumerate() {
        if taken[i] {
            continue;
        }
        if !deferred[i] {
            debug!(
                "event=obligation_unschedulable key={} amount={}",
                obligation.key(),
                obligation.amount
            );
            out.events.log(Event::ObligationUnschedulable {
                key: obligation.key(),
                amount: obligation.amount,
            });
        }
        out.unassigned.push(obligation);
    }

    out
}

// ============================================================================
// Scheduling pass
// ============================================================================

/// Result of one scheduling pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Unique per pass; not part of the schedule itself
    pub run_id: Uuid,
    pub household_id: String,
    /// Assignments in period order (frozen ones verbatim)
    pub assignments: Vec<ScheduledAssignment>,
    /// Budget shortfall and unschedulable obligations, in allocation order
    pub unassigned: Vec<Obligation>,
    /// Obligations left out by a dismissal tombstone
    pub dismissed: Vec<ObligationKey>,
    /// Decisions in the order they were made
    #[serde(skip)]
    pub events: EventLog,
}

impl ScheduleResult {
    pub fn assignments_for_period(&self, period_id: &str) -> Vec<&ScheduledAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.income_period_id() == period_id)
            .collect()
    }

    /// Total assigned to a period (cents)
    pub fn total_assigned(&self, period_id: &str) -> i64 {
        self.assignments_for_period(period_id)
            .iter()
            .map(|a| a.amount())
            .sum()
    }

    /// Period an obligation key was assigned to
    pub fn period_of(&self, key: &ObligationKey) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| &a.key() == key)
            .map(|a| a.income_period_id())
    }

    pub fn is_unassigned(&self, key: &ObligationKey) -> bool {
        self.unassigned.iter().any(|o| &o.key() == key)
    }
}

/// Whether a persisted key already covers this obligation
///
/// A whole obligation is covered once any of its parts is persisted; a part
/// is covered by itself or by the whole.
fn already_scheduled(
    key: &ObligationKey,
    scheduled: &HashSet<ObligationKey>,
    scheduled_whole: &HashSet<ObligationKey>,
) -> bool {
    if key.part.is_some() {
        scheduled.contains(key) || scheduled.contains(&key.unsplit())
    } else {
        scheduled_whole.contains(key)
    }
}

/// Run one scheduling pass for a household
///
/// # Arguments
///
/// * `config` - Household configuration (today, lock window)
/// * `periods` - Projected income periods, any order
/// * `obligations` - Materialized (and split) obligations
/// * `store` - Locked-period store
///
/// # Errors
///
/// `InvalidConfig` for a bad configuration and `Store` when the store is
/// unavailable. A write conflict on a pending period is logged and skipped.
pub fn schedule<S: ScheduleStore + ?Sized>(
    config: &HouseholdConfig,
    mut periods: Vec<IncomePeriod>,
    obligations: Vec<Obligation>,
    store: &mut S,
) -> Result<ScheduleResult, ScheduleError> {
    config.validate()?;
    let household = config.household_id.as_str();
    let lock_horizon = config.lock_horizon().ok_or_else(|| {
        ScheduleError::InvalidConfig("lock horizon is out of calendar range".to_string())
    })?;

    periods.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    periods.dedup_by(|a, b| a.id == b.id);

    let cycles = pay_cycles(&periods);
    let classified = partition_periods(household, periods, lock_horizon, &*store)?;
    let scheduled = store.scheduled_keys(household)?;
    let dismissed_keys = store.dismissed_keys(household)?;
    let paid_toggles = store.paid_toggles(household)?;

    let mut events = EventLog::new();

    // Frozen periods
    for entry in &classified {
        if let PeriodLock::Frozen(stored) = &entry.lock {
            debug!(
                "event=period_frozen household={} period={} assignments={}",
                household,
                entry.period.id,
                stored.len()
            );
            events.log(Event::PeriodFrozen {
                period_id: entry.period.id.clone(),
                assignment_count: stored.len(),
            });
        }
    }

    // Pool
    let scheduled_whole: HashSet<ObligationKey> =
        scheduled.iter().map(ObligationKey::unsplit).collect();
    let mut dismissed = Vec::new();
    let mut pool = Vec::with_capacity(obligations.len());
    for obligation in obligations {
        let key = obligation.key();
        if already_scheduled(&key, &scheduled, &scheduled_whole) {
            continue;
        }
        if dismissed_keys.contains(&key) || dismissed_keys.contains(&key.unsplit()) {
            debug!("event=obligation_dismissed household={} key={}", household, key);
            events.log(Event::ObligationDismissed { key: key.clone() });
            dismissed.push(key);
            continue;
        }
        pool.push(obligation);
    }

    // Walk
    let computable: Vec<PayCycle> = classified
        .iter()
        .zip(&cycles)
        .filter(|(entry, _)| !entry.lock.is_frozen())
        .map(|(_, cycle)| cycle.clone())
        .collect();
    let mut allocation = allocate(&computable, pool);
    events.append(&mut allocation.events);

    let mut by_period: HashMap<String, Vec<ScheduledAssignment>> = HashMap::new();
    for mut assignment in allocation.assignments {
        if let Some(&paid) = paid_toggles.get(&assignment.key()) {
            debug!(
                "event=paid_toggle_applied household={} key={} paid={}",
                household,
                assignment.key(),
                paid
            );
            assignment.set_paid(paid, PaidSource::User);
        }
        by_period
            .entry(assignment.income_period_id().to_string())
            .or_default()
            .push(assignment);
    }

    // Persist pending periods and assemble in period order
    let mut assignments = Vec::new();
    for entry in classified {
        match entry.lock {
            PeriodLock::Frozen(stored) => assignments.extend(stored),
            PeriodLock::Pending => {
                let computed = by_period.remove(&entry.period.id).unwrap_or_default();
                match store.save_period(household, &entry.period.id, &computed) {
                    Ok(()) => {
                        debug!(
                            "event=period_persisted household={} period={} assignments={}",
                            household,
                            entry.period.id,
                            computed.len()
                        );
                        events.log(Event::PeriodPersisted {
                            period_id: entry.period.id.clone(),
                            assignment_count: computed.len(),
                        });
                    }
                    Err(StoreError::Conflict { period_id }) => {
                        warn!(
                            "event=persistence_conflict household={} period={}",
                            household, period_id
                        );
                        events.log(Event::PersistenceConflict { period_id });
                    }
                    Err(err) => return Err(err.into()),
                }
                assignments.extend(computed);
            }
            PeriodLock::Open => {
                assignments.extend(by_period.remove(&entry.period.id).unwrap_or_default());
            }
        }
    }

    let result = ScheduleResult {
        run_id: Uuid::new_v4(),
        household_id: household.to_string(),
        assignments,
        unassigned: allocation.unassigned,
        dismissed,
        events,
    };

    info!(
        "event=schedule_complete household={} run_id={} assignments={} unassigned={} dismissed={}",
        household,
        result.run_id,
        result.assignments.len(),
        result.unassigned.len(),
        result.dismissed.len()
    );

    Ok(result)
}
