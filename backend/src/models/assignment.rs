//! Scheduled assignment model
//!
//! Links one income period to one obligation instance (or one split part).
//!
//! Paid status has two writers: the user, through an explicit toggle, and
//! reconciliation against recorded transactions. A user toggle is the source
//! of truth; once set, reconciliation never changes the flag again.

use crate::models::obligation::{Obligation, ObligationKey};
use serde::{Deserialize, Serialize};

/// Who last decided the paid flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidSource {
    /// Explicit user toggle
    User,
    /// Matched against a recorded transaction
    Reconciliation,
}

/// One obligation paid from one income period
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::{Obligation, ObligationDetail, PaidSource, ScheduledAssignment};
///
/// let due = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();
/// let ob = Obligation::new("food", "Food", 40_000, due, ObligationDetail::BudgetCategoryAllotment);
/// let mut assignment = ScheduledAssignment::new("job:2026-10-30".to_string(), ob);
///
/// assignment.set_paid(false, PaidSource::User);
/// // A later transaction match does not override the user
/// assert!(!assignment.set_paid(true, PaidSource::Reconciliation));
/// assert!(!assignment.is_paid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledAssignment {
    income_period_id: String,
    obligation: Obligation,
    is_paid: bool,
    #[serde(default)]
    paid_toggled_by_user: bool,
}

impl ScheduledAssignment {
    pub fn new(income_period_id: String, obligation: Obligation) -> Self {
        Self {
            income_period_id,
            obligation,
            is_paid: false,
            paid_toggled_by_user: false,
        }
    }

    pub fn income_period_id(&self) -> &str {
        &self.income_period_id
    }

    pub fn obligation(&self) -> &Obligation {
        &self.obligation
    }

    pub fn key(&self) -> ObligationKey {
        self.obligation.key()
    }

    pub fn amount(&self) -> i64 {
        self.obligation.amount
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn paid_toggled_by_user(&self) -> bool {
        self.paid_toggled_by_user
    }

    pub fn is_split(&self) -> bool {
        self.obligation.split.is_some()
    }

    pub fn split_label(&self) -> Option<String> {
        self.obligation.split.map(|part| part.label())
    }

    /// Update the paid flag; returns whether the flag changed
    ///
    /// Reconciliation is ignored once the user has toggled the flag.
    pub fn set_paid(&mut self, paid: bool, source: PaidSource) -> bool {
        match source {
            PaidSource::User => {
                self.paid_toggled_by_user = true;
            }
            PaidSource::Reconciliation => {
                if self.paid_toggled_by_user {
                    return false;
                }
            }
        }

        let changed = self.is_paid != paid;
        self.is_paid = paid;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::obligation::{ObligationDetail, SplitPart};
    use chrono::NaiveDate;

    fn assignment() -> ScheduledAssignment {
        let due = NaiveDate::from_ymd_opt(2026, 11, 12).unwrap();
        let ob = Obligation::new(
            "visa",
            "Visa",
            15_000,
            due,
            ObligationDetail::DebtMinimumPayment { balance: 400_000 },
        );
        ScheduledAssignment::new("job:2026-11-06".to_string(), ob)
    }

    #[test]
    fn test_reconciliation_marks_paid() {
        let mut a = assignment();
        assert!(a.set_paid(true, PaidSource::Reconciliation));
        assert!(a.is_paid());
        assert!(!a.paid_toggled_by_user());
    }

    #[test]
    fn test_user_toggle_wins() {
        let mut a = assignment();
        a.set_paid(true, PaidSource::User);
        assert!(!a.set_paid(false, PaidSource::Reconciliation));
        assert!(a.is_paid());
        assert!(a.set_paid(false, PaidSource::User));
        assert!(!a.is_paid());
    }

    #[test]
    fn test_split_label() {
        let a = assignment();
        assert!(!a.is_split());
        assert_eq!(a.split_label(), None);

        let part = a.obligation().split_part(SplitPart { index: 1, count: 3 }, 5_000);
        let split = ScheduledAssignment::new("job:2026-11-06".to_string(), part);
        assert!(split.is_split());
        assert_eq!(split.split_label().as_deref(), Some("Part 1 of 3"));
    }
}
