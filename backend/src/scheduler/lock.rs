//! Lock partition
//!
//! Classifies income periods before allocation runs. The lock is a data
//! classification, not a runtime mutex:
//!
//! ```text
//!   date <= today + lock_window ──┬── persisted ──────→ Frozen   (loaded verbatim)
//!                                 └── not persisted ──→ Pending  (computed, then written once)
//!   date >  today + lock_window ──────────────────────→ Open     (recomputed every run)
//! ```

use crate::models::assignment::ScheduledAssignment;
use crate::models::income::IncomePeriod;
use crate::store::{ScheduleStore, StoreError};
use chrono::NaiveDate;

/// Lock state of one income period
#[derive(Debug, Clone, PartialEq)]
pub enum PeriodLock {
    /// Locked and persisted; the stored assignment set is final
    Frozen(Vec<ScheduledAssignment>),
    /// Locked but never written; computed this run and persisted
    Pending,
    /// Outside the lock window; recomputed from scratch
    Open,
}

impl PeriodLock {
    pub fn is_locked(&self) -> bool {
        !matches!(self, PeriodLock::Open)
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self, PeriodLock::Frozen(_))
    }
}

/// An income period with its lock state
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPeriod {
    pub period: IncomePeriod,
    pub lock: PeriodLock,
}

/// Whether a period dated `date` falls inside the lock window
pub fn is_locked(date: NaiveDate, lock_horizon: NaiveDate) -> bool {
    date <= lock_horizon
}

/// Classify `periods` (already in chronological order)
///
/// Only locked periods touch the store.
pub fn partition_periods<S: ScheduleStore + ?Sized>(
    household_id: &str,
    periods: Vec<IncomePeriod>,
    lock_horizon: NaiveDate,
    store: &S,
) -> Result<Vec<ClassifiedPeriod>, StoreError> {
    periods
        .into_iter()
        .map(|period| {
            let lock = if !is_locked(period.date, lock_horizon) {
                PeriodLock::Open
            } else {
                match store.load_period(household_id, &period.id)? {
                    Some(assignments) => PeriodLock::Frozen(assignments),
                    None => PeriodLock::Pending,
                }
            };
            Ok(ClassifiedPeriod { period, lock })
        })
        .collect()
}
