//! Obligation model
//!
//! An obligation is a single due-dated payment requirement derived from a
//! bill, a debt minimum, a debt extra payment or a budget allotment.
//!
//! The variant-specific data lives in [`ObligationDetail`], a tagged union.
//! Its discriminator ([`ObligationKind`]) is what the scheduler switches on,
//! and only for ordering tie-breaks.
//!
//! An obligation *instance* is identified by [`ObligationKey`]:
//! kind + source id + due date (+ split part). The key is the unit of
//! locking, dismissal and persistence.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::core::time::Frequency;
use crate::payoff::strategy::PayoffStrategy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Kind discriminator
///
/// Declaration order is the ordering rank used when due dates tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    RecurringBill,
    DebtMinimumPayment,
    DebtExtraPayment,
    BudgetCategoryAllotment,
}

impl ObligationKind {
    /// Discretionary obligations may be deferred ahead of fixed ones
    pub fn is_discretionary(&self) -> bool {
        matches!(
            self,
            ObligationKind::DebtExtraPayment | ObligationKind::BudgetCategoryAllotment
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationKind::RecurringBill => "bill",
            ObligationKind::DebtMinimumPayment => "debt_minimum",
            ObligationKind::DebtExtraPayment => "debt_extra",
            ObligationKind::BudgetCategoryAllotment => "budget",
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one obligation instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObligationKey {
    pub kind: ObligationKind,
    pub source_id: String,
    pub due_date: NaiveDate,
    /// 1-based split part, `None` for an unsplit obligation
    #[serde(default)]
    pub part: Option<u8>,
}

impl ObligationKey {
    pub fn new(kind: ObligationKind, source_id: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            kind,
            source_id: source_id.into(),
            due_date,
            part: None,
        }
    }

    /// The key of the whole obligation this part was split from
    pub fn unsplit(&self) -> ObligationKey {
        ObligationKey {
            part: None,
            ..self.clone()
        }
    }
}

impl fmt::Display for ObligationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind,
            self.source_id,
            self.due_date.format("%Y-%m-%d")
        )?;
        if let Some(part) = self.part {
            write!(f, "#{}", part)?;
        }
        Ok(())
    }
}

/// Variant-specific payload of an obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObligationDetail {
    RecurringBill {
        frequency: Frequency,
    },
    DebtMinimumPayment {
        /// Debt balance when the obligation was materialized (cents)
        balance: i64,
    },
    /// Discretionary, deferrable payment toward the focus debt
    DebtExtraPayment {
        strategy: PayoffStrategy,
    },
    BudgetCategoryAllotment,
}

impl ObligationDetail {
    pub fn kind(&self) -> ObligationKind {
        match self {
            ObligationDetail::RecurringBill { .. } => ObligationKind::RecurringBill,
            ObligationDetail::DebtMinimumPayment { .. } => ObligationKind::DebtMinimumPayment,
            ObligationDetail::DebtExtraPayment { .. } => ObligationKind::DebtExtraPayment,
            ObligationDetail::BudgetCategoryAllotment => ObligationKind::BudgetCategoryAllotment,
        }
    }
}

/// Position of a split part within its parent obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPart {
    /// 1-based
    pub index: u8,
    pub count: u8,
}

impl SplitPart {
    pub fn label(&self) -> String {
        format!("Part {} of {}", self.index, self.count)
    }
}

/// A due-date-stamped obligation instance
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::{Frequency, Obligation, ObligationDetail, ObligationKind};
///
/// let due = NaiveDate::from_ymd_opt(2026, 11, 3).unwrap();
/// let rent = Obligation::new(
///     "rent",
///     "Rent",
///     150_000,
///     due,
///     ObligationDetail::RecurringBill { frequency: Frequency::Monthly },
/// );
/// assert_eq!(rent.kind(), ObligationKind::RecurringBill);
/// assert!(!rent.is_discretionary());
/// assert_eq!(rent.id, "bill:rent:2026-11-03");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    /// Display form of the key, stable across runs
    pub id: String,
    pub name: String,
    /// Amount due (cents, > 0)
    pub amount: i64,
    pub due_date: NaiveDate,
    pub source_id: String,
    #[serde(flatten)]
    pub detail: ObligationDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitPart>,
}

impl Obligation {
    pub fn new(
        source_id: impl Into<String>,
        name: impl Into<String>,
        amount: i64,
        due_date: NaiveDate,
        detail: ObligationDetail,
    ) -> Self {
        let source_id = source_id.into();
        let id = ObligationKey::new(detail.kind(), source_id.clone(), due_date).to_string();
        Self {
            id,
            name: name.into(),
            amount,
            due_date,
            source_id,
            detail,
            split: None,
        }
    }

    pub fn kind(&self) -> ObligationKind {
        self.detail.kind()
    }

    pub fn is_discretionary(&self) -> bool {
        self.kind().is_discretionary()
    }

    pub fn key(&self) -> ObligationKey {
        ObligationKey {
            kind: self.kind(),
            source_id: self.source_id.clone(),
            due_date: self.due_date,
            part: self.split.map(|s| s.index),
        }
    }

    /// Derive one split part of this obligation
    pub fn split_part(&self, part: SplitPart, amount: i64) -> Obligation {
        let mut child = Obligation {
            split: Some(part),
            amount,
            ..self.clone()
        };
        child.id = child.key().to_string();
        child
    }

    /// Allocation order: due date, fixed before discretionary, kind rank,
    /// smaller amount first, then identity
    pub fn allocation_order(&self, other: &Obligation) -> Ordering {
        self.due_date
            .cmp(&other.due_date)
            .then_with(|| self.is_discretionary().cmp(&other.is_discretionary()))
            .then_with(|| self.kind().cmp(&other.kind()))
            .then_with(|| self.amount.cmp(&other.amount))
            .then_with(|| self.source_id.cmp(&other.source_id))
            .then_with(|| self.split.map(|s| s.index).cmp(&other.split.map(|s| s.index)))
    }
}
