//! Calendar arithmetic for the scheduler
//!
//! Everything the scheduler reasons about is day-granular. This module owns
//! the recurrence frequencies and the month arithmetic used by both the
//! recurrence projector and the obligation materializer.
//!
//! # Critical Invariants
//!
//! 1. Fixed-step frequencies advance by an exact number of days
//! 2. Monthly occurrences are computed from the anchor (`anchor ± k months`),
//!    never by accumulating one-month steps, so a 31st never drifts to the 28th
//! 3. Day-of-month values past the end of a month clamp to its last day

use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recurrence frequency of a paycheck or bill
///
/// Semimonthly is a fixed 15-day step, not "1st and 16th" calendar semantics.
/// Over many cycles it drifts against the calendar.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::Frequency;
///
/// let anchor = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
/// assert_eq!(
///     Frequency::Biweekly.nth_from(anchor, 1),
///     NaiveDate::from_ymd_opt(2026, 1, 16)
/// );
/// assert_eq!(
///     Frequency::Monthly.nth_from(anchor, -1),
///     NaiveDate::from_ymd_opt(2025, 12, 2)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Every 7 days
    Weekly,
    /// Every 14 days
    Biweekly,
    /// Every 15 days
    Semimonthly,
    /// Same day of every calendar month
    Monthly,
}

impl Frequency {
    /// Step length in days, or `None` for calendar-month recurrences
    pub fn fixed_step_days(&self) -> Option<i64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::Biweekly => Some(14),
            Frequency::Semimonthly => Some(15),
            Frequency::Monthly => None,
        }
    }

    /// The `k`-th occurrence counted from `anchor` (negative `k` walks backward)
    ///
    /// Returns `None` only when the result falls outside chrono's date range.
    pub fn nth_from(&self, anchor: NaiveDate, k: i64) -> Option<NaiveDate> {
        match self.fixed_step_days() {
            Some(step) => anchor.checked_add_signed(Duration::days(step.checked_mul(k)?)),
            None => shift_months(anchor, k),
        }
    }

    /// The occurrence immediately after `date`
    pub fn next_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.nth_from(date, 1)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Semimonthly => "semimonthly",
            Frequency::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

/// Shift a date by whole calendar months, clamping to month end
pub fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months >= 0 {
        date.checked_add_months(Months::new(magnitude))
    } else {
        date.checked_sub_months(Months::new(magnitude))
    }
}

/// Shift a date by a signed number of days
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Number of days in the given month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = first.checked_add_months(Months::new(1))?;
    Some(next_first.signed_duration_since(first).num_days() as u32)
}

/// Date for `day` in the given month, clamped to the month's last day
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::core::time::clamp_day_of_month;
///
/// assert_eq!(
///     clamp_day_of_month(2027, 2, 31),
///     NaiveDate::from_ymd_opt(2027, 2, 28)
/// );
/// ```
pub fn clamp_day_of_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Occurrence of `due_day` in the month `offset` months away from `reference`
pub fn due_day_in_month_offset(reference: NaiveDate, due_day: u32, offset: i64) -> Option<NaiveDate> {
    let first_of_month = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)?;
    let target = shift_months(first_of_month, offset)?;
    clamp_day_of_month(target.year(), target.month(), due_day)
}

/// Calendar day used when a caller does not supply "today" explicitly
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fixed_steps() {
        assert_eq!(Frequency::Weekly.nth_from(d(2026, 3, 1), 2), Some(d(2026, 3, 15)));
        assert_eq!(Frequency::Semimonthly.nth_from(d(2026, 3, 1), 1), Some(d(2026, 3, 16)));
        assert_eq!(Frequency::Semimonthly.nth_from(d(2026, 3, 16), 1), Some(d(2026, 3, 31)));
    }

    #[test]
    fn test_monthly_from_anchor_does_not_drift() {
        let anchor = d(2026, 1, 31);
        assert_eq!(Frequency::Monthly.nth_from(anchor, 1), Some(d(2026, 2, 28)));
        assert_eq!(Frequency::Monthly.nth_from(anchor, 2), Some(d(2026, 3, 31)));
        assert_eq!(Frequency::Monthly.nth_from(anchor, -2), Some(d(2025, 11, 30)));
    }

    #[test]
    fn test_days_in_month_leap_year() {
        assert_eq!(days_in_month(2028, 2), Some(29));
        assert_eq!(days_in_month(2026, 2), Some(28));
        assert_eq!(days_in_month(2026, 12), Some(31));
        assert_eq!(days_in_month(2026, 13), None);
    }

    #[test]
    fn test_due_day_in_month_offset_clamps() {
        let reference = d(2026, 1, 15);
        assert_eq!(due_day_in_month_offset(reference, 30, 1), Some(d(2026, 2, 28)));
        assert_eq!(due_day_in_month_offset(reference, 30, -1), Some(d(2025, 12, 30)));
    }
}
