//! Income model
//!
//! `IncomeSettings` is the stored paycheck definition. `IncomePeriod` is one
//! projected occurrence of it. Periods are re-derived on every run and never
//! stored as final entities, so their ids must be deterministic: the same
//! settings and date always produce the same id.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::core::time::Frequency;
use crate::models::validation::{require_id, require_positive, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recurring paycheck definition (consumed data contract)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeSettings {
    pub id: String,
    pub name: String,
    /// Net amount per paycheck (cents)
    pub net_amount: i64,
    pub frequency: Frequency,
    /// Any known paycheck date; occurrences are projected around it
    pub next_date: NaiveDate,
}

impl IncomeSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_positive("net_amount", self.net_amount)
    }
}

/// One concrete paycheck occurrence
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::{Frequency, IncomePeriod, IncomeSettings};
///
/// let settings = IncomeSettings {
///     id: "job".to_string(),
///     name: "Day job".to_string(),
///     net_amount: 210_000,
///     frequency: Frequency::Biweekly,
///     next_date: NaiveDate::from_ymd_opt(2026, 10, 23).unwrap(),
/// };
/// let period = IncomePeriod::from_settings(&settings, settings.next_date);
/// assert_eq!(period.id, "job:2026-10-23");
/// assert_eq!(period.amount, 210_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomePeriod {
    /// Deterministic id: `"{settings id}:{YYYY-MM-DD}"`
    pub id: String,
    pub source_id: String,
    pub source_name: String,
    /// Paycheck amount (cents, > 0)
    pub amount: i64,
    pub date: NaiveDate,
    pub frequency: Frequency,
}

impl IncomePeriod {
    pub fn from_settings(settings: &IncomeSettings, date: NaiveDate) -> Self {
        Self {
            id: Self::period_id(&settings.id, date),
            source_id: settings.id.clone(),
            source_name: settings.name.clone(),
            amount: settings.net_amount,
            date,
            frequency: settings.frequency,
        }
    }

    pub fn period_id(source_id: &str, date: NaiveDate) -> String {
        format!("{}:{}", source_id, date.format("%Y-%m-%d"))
    }

    /// Date this paycheck would recur next
    ///
    /// Closes the pay cycle of the last projected period.
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        self.frequency.next_after(self.date)
    }
}
