//! Recurrence Projector
//!
//! Generates the occurrences of a recurring date within a window.
//!
//! The anchor is any known occurrence; it may lie before, inside or after
//! the window. The projector walks backward from the anchor until it passes
//! the window start and forward until it passes the window end, then merges
//! both walks into one sorted, deduplicated sequence.
//!
//! ```text
//!            range_start                       range_end
//!   ... ←─ k=-2 ←─ k=-1 ←─ anchor ─→ k=1 ─→ k=2 ─→ ...
//!                  └───────── kept ─────────┘
//! ```
//!
//! Occurrence `k` is always computed from the anchor, never by stepping from
//! the previous occurrence (see [`Frequency::nth_from`]).

use crate::core::time::Frequency;
use crate::models::income::{IncomePeriod, IncomeSettings};
use crate::models::validation::ValidationError;
use chrono::NaiveDate;

/// Occurrences of `anchor` recurring at `frequency` within
/// `[range_start, range_end]`, ascending
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::{recurrence, Frequency};
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let dates = recurrence::project(d(10, 23), Frequency::Biweekly, d(10, 1), d(11, 30));
/// assert_eq!(dates, vec![d(10, 9), d(10, 23), d(11, 6), d(11, 20)]);
/// ```
pub fn project(
    anchor: NaiveDate,
    frequency: Frequency,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Vec<NaiveDate> {
    if range_start > range_end {
        return Vec::new();
    }

    let in_range = |date: &NaiveDate| *date >= range_start && *date <= range_end;
    let mut dates = Vec::new();

    // Backward, anchor included
    let mut k: i64 = 0;
    while let Some(date) = frequency.nth_from(anchor, k) {
        if date < range_start {
            break;
        }
        if in_range(&date) {
            dates.push(date);
        }
        k -= 1;
    }

    // Forward
    let mut k: i64 = 1;
    while let Some(date) = frequency.nth_from(anchor, k) {
        if date > range_end {
            break;
        }
        if in_range(&date) {
            dates.push(date);
        }
        k += 1;
    }

    dates.sort();
    dates.dedup();
    dates
}

/// Project one paycheck definition into income periods
///
/// Fails when the settings themselves are malformed; callers skip the
/// source and continue.
pub fn project_income(
    settings: &IncomeSettings,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<IncomePeriod>, ValidationError> {
    settings.validate()?;
    Ok(
        project(settings.next_date, settings.frequency, range_start, range_end)
            .into_iter()
            .map(|date| IncomePeriod::from_settings(settings, date))
            .collect(),
    )
}
