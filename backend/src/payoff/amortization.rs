//! Amortization Engine
//!
//! Simulates one debt's balance decay under a fixed monthly payment.
//!
//! Each month:
//!
//! ```text
//! interest  = round(balance × annual% / 100 / 12)
//! principal = min(payment − interest, balance)
//! balance  -= principal
//! ```
//!
//! The final step pays off exactly the remaining balance, so the principal
//! portions always sum to the starting balance.
//!
//! # Non-amortizing debts
//!
//! When the payment does not exceed the first month's interest the balance
//! would never reach zero. [`amortize`] reports this as
//! [`Amortization::NonAmortizing`] up front instead of iterating. It is a
//! defined terminal state (infinite horizon), not an error.
//!
//! CRITICAL: All money values are i64 (cents)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Safety cap on simulated months (100 years)
pub const MAX_AMORTIZATION_MONTHS: u32 = 1200;

/// Monthly rate as a fraction, from an annual percentage
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// One month of interest on `balance`, rounded to the nearest cent
pub fn monthly_interest(balance: i64, monthly_rate: f64) -> i64 {
    if balance <= 0 || monthly_rate <= 0.0 {
        return 0;
    }
    (balance as f64 * monthly_rate).round() as i64
}

/// One month of a debt's amortization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationStep {
    /// 1-based month counter
    pub month_index: u32,
    pub interest_portion: i64,
    pub principal_portion: i64,
    pub ending_balance: i64,
}

impl AmortizationStep {
    /// Total paid this month
    pub fn payment(&self) -> i64 {
        self.interest_portion + self.principal_portion
    }

    pub fn is_terminal(&self) -> bool {
        self.ending_balance == 0
    }
}

/// Apply one month of interest and payment to `balance`
///
/// When the payment does not cover interest the principal portion is zero
/// and the balance is unchanged; unpaid interest is not capitalized.
pub fn amortization_step(
    month_index: u32,
    balance: i64,
    monthly_rate: f64,
    payment: i64,
) -> AmortizationStep {
    let interest = monthly_interest(balance, monthly_rate);
    let principal = (payment - interest).clamp(0, balance.max(0));
    AmortizationStep {
        month_index,
        interest_portion: interest.min(payment.max(0)),
        principal_portion: principal,
        ending_balance: balance - principal,
    }
}

/// Lazy sequence of amortization steps
///
/// Ends when the balance reaches zero or after
/// [`MAX_AMORTIZATION_MONTHS`] steps.
#[derive(Debug, Clone)]
pub struct AmortizationSteps {
    balance: i64,
    monthly_rate: f64,
    payment: i64,
    month_index: u32,
}

impl Iterator for AmortizationSteps {
    type Item = AmortizationStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.balance <= 0 || self.month_index >= MAX_AMORTIZATION_MONTHS {
            return None;
        }

        self.month_index += 1;
        let step = amortization_step(self.month_index, self.balance, self.monthly_rate, self.payment);
        if step.principal_portion == 0 {
            // Rounding can only shrink interest as the balance falls, so
            // this is unreachable for sequences built by `amortize`.
            self.balance = 0;
            return None;
        }
        self.balance = step.ending_balance;
        Some(step)
    }
}

/// Payoff horizon of a debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffHorizon {
    /// Paid off after this many months (0 = already paid)
    Months(u32),
    /// Never paid off at the given payment
    Never,
}

impl fmt::Display for PayoffHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffHorizon::Months(months) => write!(f, "{} months", months),
            PayoffHorizon::Never => f.write_str("∞"),
        }
    }
}

/// Totals over a finished amortization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub months: u32,
    pub total_interest: i64,
    pub total_principal: i64,
}

/// Result of [`amortize`]
#[derive(Debug, Clone)]
pub enum Amortization {
    /// The payment retires the balance; iterate the steps lazily
    Amortizing(AmortizationSteps),
    /// The payment never exceeds interest
    NonAmortizing {
        monthly_interest: i64,
        payment: i64,
    },
}

impl Amortization {
    pub fn is_amortizing(&self) -> bool {
        matches!(self, Amortization::Amortizing(_))
    }

    /// Consume the steps into totals (`None` when non-amortizing)
    pub fn summarize(self) -> Option<AmortizationSummary> {
        match self {
            Amortization::Amortizing(steps) => {
                let mut summary = AmortizationSummary {
                    months: 0,
                    total_interest: 0,
                    total_principal: 0,
                };
                for step in steps {
                    summary.months = step.month_index;
                    summary.total_interest += step.interest_portion;
                    summary.total_principal += step.principal_portion;
                }
                Some(summary)
            }
            Amortization::NonAmortizing { .. } => None,
        }
    }

    pub fn horizon(self) -> PayoffHorizon {
        match self.summarize() {
            Some(summary) => PayoffHorizon::Months(summary.months),
            None => PayoffHorizon::Never,
        }
    }
}

/// Amortize `balance` at a fixed monthly `payment`
///
/// # Example
///
/// ```rust
/// use household_scheduler_core::payoff::{amortize, Amortization};
///
/// // $1,200.00 at 12% APR, paying $120.00 a month
/// let Amortization::Amortizing(steps) = amortize(120_000, 12.0, 12_000) else {
///     panic!("expected an amortizing debt");
/// };
/// let steps: Vec<_> = steps.collect();
/// assert_eq!(steps.len(), 11);
/// assert_eq!(steps[0].interest_portion, 1_200);
/// assert_eq!(steps[0].principal_portion, 10_800);
/// assert_eq!(steps.iter().map(|s| s.principal_portion).sum::<i64>(), 120_000);
///
/// // $1,000.00 at 2% a month, paying $15.00 against $20.00 interest
/// assert!(!amortize(100_000, 24.0, 1_500).is_amortizing());
/// ```
pub fn amortize(balance: i64, annual_rate_percent: f64, payment: i64) -> Amortization {
    let rate = monthly_rate(annual_rate_percent);
    let balance = balance.max(0);

    if balance > 0 {
        let interest = monthly_interest(balance, rate);
        if payment <= interest {
            return Amortization::NonAmortizing {
                monthly_interest: interest,
                payment,
            };
        }
    }

    Amortization::Amortizing(AmortizationSteps {
        balance,
        monthly_rate: rate,
        payment,
        month_index: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_balance_has_no_steps() {
        let amortization = amortize(0, 18.0, 5_000);
        assert!(amortization.is_amortizing());
        assert_eq!(amortization.horizon(), PayoffHorizon::Months(0));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let summary = amortize(10_000, 0.0, 2_500).summarize().unwrap();
        assert_eq!(summary.months, 4);
        assert_eq!(summary.total_interest, 0);
        assert_eq!(summary.total_principal, 10_000);
    }

    #[test]
    fn test_final_step_pays_only_remaining_balance() {
        let steps: Vec<_> = match amortize(120_000, 12.0, 12_000) {
            Amortization::Amortizing(steps) => steps.collect(),
            Amortization::NonAmortizing { .. } => panic!("should amortize"),
        };
        let last = steps.last().unwrap();
        assert!(last.is_terminal());
        assert!(last.payment() < 12_000);
        assert!(steps[..steps.len() - 1].iter().all(|s| s.payment() == 12_000));
    }

    #[test]
    fn test_zero_payment_on_zero_rate_is_non_amortizing() {
        assert!(!amortize(10_000, 0.0, 0).is_amortizing());
    }

    #[test]
    fn test_horizon_display() {
        assert_eq!(PayoffHorizon::Months(11).to_string(), "11 months");
        assert_eq!(PayoffHorizon::Never.to_string(), "∞");
    }
}
