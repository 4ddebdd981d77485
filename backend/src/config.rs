//! Household scheduling configuration
//!
//! Household-wide settings shared by the payoff simulator, the materializer
//! and the allocation scheduler. The configuration is passed explicitly into
//! every pass; nothing reads it from ambient state.

use crate::core::time::{local_today, shift_days, shift_months};
use crate::payoff::strategy::PayoffStrategy;
use crate::scheduler::ScheduleError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default lock window: periods up to a week out are frozen
pub const DEFAULT_LOCK_WINDOW_DAYS: i64 = 7;

/// Default projection window on each side of today
pub const DEFAULT_WINDOW_MONTHS: u32 = 6;

/// Default distance for matching transactions to obligations
pub const DEFAULT_RECONCILIATION_WINDOW_DAYS: i64 = 7;

/// Complete configuration of one household scheduling pass
///
/// # Fields
///
/// * `household_id` - Store partition key
/// * `today` - The pass's notion of "now" (day granularity)
/// * `strategy` - Debt payoff strategy selecting the focus debt
/// * `extra_payment` - Household-wide monthly extra debt payment (cents)
/// * `lock_window_days` - Periods dated up to `today + lock_window_days` are locked
/// * `window_months` - Months projected on each side of `today`
/// * `reconciliation_window_days` - Max days between a transaction and a due date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub household_id: String,
    pub today: NaiveDate,
    pub strategy: PayoffStrategy,
    pub extra_payment: i64,
    pub lock_window_days: i64,
    pub window_months: u32,
    pub reconciliation_window_days: i64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            household_id: String::new(),
            today: local_today(),
            strategy: PayoffStrategy::default(),
            extra_payment: 0,
            lock_window_days: DEFAULT_LOCK_WINDOW_DAYS,
            window_months: DEFAULT_WINDOW_MONTHS,
            reconciliation_window_days: DEFAULT_RECONCILIATION_WINDOW_DAYS,
        }
    }
}

impl HouseholdConfig {
    /// Configuration with defaults for everything except identity and date
    pub fn new(household_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            household_id: household_id.into(),
            today,
            ..Self::default()
        }
    }

    /// Builder: payoff strategy
    pub fn with_strategy(mut self, strategy: PayoffStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builder: household extra payment (cents)
    pub fn with_extra_payment(mut self, extra_payment: i64) -> Self {
        self.extra_payment = extra_payment;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.household_id.trim().is_empty() {
            return Err(ScheduleError::InvalidConfig(
                "household_id must not be empty".to_string(),
            ));
        }

        if self.extra_payment < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "extra_payment must be >= 0, got {}",
                self.extra_payment
            )));
        }

        if self.lock_window_days < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "lock_window_days must be >= 0, got {}",
                self.lock_window_days
            )));
        }

        if self.window_months == 0 {
            return Err(ScheduleError::InvalidConfig(
                "window_months must be > 0".to_string(),
            ));
        }

        if self.reconciliation_window_days < 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "reconciliation_window_days must be >= 0, got {}",
                self.reconciliation_window_days
            )));
        }

        if self.window().is_none() || self.lock_horizon().is_none() {
            return Err(ScheduleError::InvalidConfig(format!(
                "window around {} is out of calendar range",
                self.today
            )));
        }

        Ok(())
    }

    /// Projection window `[today - window_months, today + window_months]`
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let months = i64::from(self.window_months);
        Some((
            shift_months(self.today, -months)?,
            shift_months(self.today, months)?,
        ))
    }

    /// Last date that is still inside the lock window
    pub fn lock_horizon(&self) -> Option<NaiveDate> {
        shift_days(self.today, self.lock_window_days)
    }
}
