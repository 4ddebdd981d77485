//! Debt state and payment ledger
//!
//! `DebtState` is the scheduler's view of one debt. Its balance moves only
//! through [`DebtState::record_payment`] and [`DebtState::reverse_payment`].
//!
//! # Critical Invariants
//!
//! 1. Balance never increases, except when a recorded payment is reversed
//! 2. A reversal restores exactly the principal the payment credited
//! 3. A receipt can be reversed at most once
//!
//! CRITICAL: All money values are i64 (cents)

use crate::models::sources::Debt;
use crate::payoff::amortization::{monthly_interest, monthly_rate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during debt ledger operations
#[derive(Debug, Error, PartialEq)]
pub enum DebtError {
    #[error("Payment amount must be positive, got {0}")]
    NonPositivePayment(i64),

    #[error("Payment {receipt_id} was already reversed")]
    AlreadyReversed { receipt_id: String },

    #[error("Receipt {receipt_id} belongs to debt {receipt_debt}, not {debt_id}")]
    ReceiptMismatch {
        receipt_id: String,
        receipt_debt: String,
        debt_id: String,
    },
}

/// Record of one payment applied to a debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: String,
    pub debt_id: String,
    pub amount: i64,
    pub interest_portion: i64,
    /// Principal actually credited against the balance
    pub principal_credited: i64,
}

/// One debt as seen by the payoff simulator and the materializer
///
/// # Example
/// ```
/// use household_scheduler_core::DebtState;
///
/// let mut card = DebtState::new("visa", "Visa", 120_000, 12.0, 12_000);
/// let receipt = card.record_payment(12_000).unwrap();
/// assert_eq!(receipt.interest_portion, 1_200);
/// assert_eq!(receipt.principal_credited, 10_800);
/// assert_eq!(card.balance(), 109_200);
///
/// card.reverse_payment(&receipt).unwrap();
/// assert_eq!(card.balance(), 120_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtState {
    id: String,
    name: String,
    balance: i64,
    annual_rate_percent: f64,
    minimum_payment: i64,
    /// Household-wide extra payment mirrored from the debt record
    extra_payment: i64,
    exclude_from_payoff: bool,
    /// Receipt ids already reversed
    reversed: Vec<String>,
}

impl DebtState {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        balance: i64,
        annual_rate_percent: f64,
        minimum_payment: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance: balance.max(0),
            annual_rate_percent,
            minimum_payment,
            extra_payment: 0,
            exclude_from_payoff: false,
            reversed: Vec::new(),
        }
    }

    /// Builder: exclude this debt from payoff ordering
    pub fn excluded_from_payoff(mut self) -> Self {
        self.exclude_from_payoff = true;
        self
    }

    /// Builder: set the mirrored household extra payment
    pub fn with_extra_payment(mut self, extra_payment: i64) -> Self {
        self.extra_payment = extra_payment.max(0);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate_percent)
    }

    pub fn minimum_payment(&self) -> i64 {
        self.minimum_payment
    }

    pub fn extra_payment(&self) -> i64 {
        self.extra_payment
    }

    pub fn exclude_from_payoff(&self) -> bool {
        self.exclude_from_payoff
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance == 0
    }

    /// Apply a payment: interest first, the rest reduces the balance
    ///
    /// Principal credited is capped at the outstanding balance, so the
    /// balance never goes below zero.
    pub fn record_payment(&mut self, amount: i64) -> Result<PaymentReceipt, DebtError> {
        if amount <= 0 {
            return Err(DebtError::NonPositivePayment(amount));
        }

        let interest = monthly_interest(self.balance, self.monthly_rate());
        let interest_portion = interest.min(amount);
        let principal_credited = (amount - interest_portion).min(self.balance);
        self.balance -= principal_credited;

        Ok(PaymentReceipt {
            id: uuid::Uuid::new_v4().to_string(),
            debt_id: self.id.clone(),
            amount,
            interest_portion,
            principal_credited,
        })
    }

    /// Undo a recorded payment, restoring exactly its credited principal
    pub fn reverse_payment(&mut self, receipt: &PaymentReceipt) -> Result<(), DebtError> {
        if receipt.debt_id != self.id {
            return Err(DebtError::ReceiptMismatch {
                receipt_id: receipt.id.clone(),
                receipt_debt: receipt.debt_id.clone(),
                debt_id: self.id.clone(),
            });
        }
        if self.reversed.iter().any(|id| id == &receipt.id) {
            return Err(DebtError::AlreadyReversed {
                receipt_id: receipt.id.clone(),
            });
        }

        self.balance += receipt.principal_credited;
        self.reversed.push(receipt.id.clone());
        Ok(())
    }
}

impl From<&Debt> for DebtState {
    fn from(debt: &Debt) -> Self {
        let state = DebtState::new(
            debt.id.clone(),
            debt.name.clone(),
            debt.balance,
            debt.annual_rate_percent,
            debt.minimum_payment,
        )
        .with_extra_payment(debt.extra_payment);
        if debt.exclude_from_payoff {
            state.excluded_from_payoff()
        } else {
            state
        }
    }
}
