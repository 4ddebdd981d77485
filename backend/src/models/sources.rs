//! Obligation source records
//!
//! These are the data contracts consumed from the household's CRUD store.
//! The scheduler never writes them.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::core::time::Frequency;
use crate::models::income::IncomeSettings;
use crate::models::obligation::ObligationKind;
use crate::models::validation::{
    require_due_day, require_id, require_non_negative, require_positive, require_rate,
    ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recurring bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub company: String,
    pub amount: i64,
    pub due_day_of_month: u32,
    pub frequency: Frequency,
}

impl Bill {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_positive("amount", self.amount)?;
        require_due_day(self.due_day_of_month)
    }
}

/// Debt account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,
    pub name: String,
    pub balance: i64,
    pub annual_rate_percent: f64,
    pub minimum_payment: i64,
    pub due_day_of_month: u32,
    /// Household-wide extra payment, mirrored on every debt record
    #[serde(default)]
    pub extra_payment: i64,
    #[serde(default)]
    pub exclude_from_payoff: bool,
}

impl Debt {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_non_negative("balance", self.balance)?;
        require_rate(self.annual_rate_percent)?;
        require_positive("minimum_payment", self.minimum_payment)?;
        require_non_negative("extra_payment", self.extra_payment)?;
        require_due_day(self.due_day_of_month)
    }
}

/// Monthly budget category allotment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategoryAllotment {
    pub id: String,
    pub name: String,
    pub monthly_amount: i64,
    pub due_day_of_month: u32,
}

impl BudgetCategoryAllotment {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(&self.id)?;
        require_positive("monthly_amount", self.monthly_amount)?;
        require_due_day(self.due_day_of_month)
    }
}

/// Recorded transaction (read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: i64,
    #[serde(default)]
    pub linked_debt_id: Option<String>,
    #[serde(default)]
    pub linked_bill_id: Option<String>,
}

impl TransactionRecord {
    /// Whether this transaction pays an obligation of `kind` from `source_id`
    ///
    /// Bills match on the linked bill, debt minimums and extras on the
    /// linked debt. Budget allotments are never linked.
    pub fn pays(&self, kind: ObligationKind, source_id: &str) -> bool {
        let linked = match kind {
            ObligationKind::RecurringBill => self.linked_bill_id.as_deref(),
            ObligationKind::DebtMinimumPayment | ObligationKind::DebtExtraPayment => {
                self.linked_debt_id.as_deref()
            }
            ObligationKind::BudgetCategoryAllotment => None,
        };
        linked == Some(source_id)
    }
}

/// Every source a scheduling pass reads for one household
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdSources {
    #[serde(default)]
    pub income: Vec<IncomeSettings>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub budget_categories: Vec<BudgetCategoryAllotment>,
}
