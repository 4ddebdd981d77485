//! Payoff Strategy Simulator
//!
//! Orders debts by strategy and runs a month-by-month simulation with
//! extra-payment rollover on top of the amortization engine.
//!
//! # Ordering
//!
//! - **Avalanche**: descending annual rate
//! - **Snowball**: ascending balance
//!
//! Ties keep input order (stable sort). Debts flagged `exclude_from_payoff`
//! are removed from the ordered list: they still amortize at their own
//! minimum but never receive extra money and are never the focus.
//!
//! # Rollover
//!
//! ```text
//! each month:
//!   every debt with a balance gets its minimum payment
//!   pool = extra payment + minimums freed by ordered debts already paid off
//!   pool goes to the ordered debts in order (focus first), each taking at
//!   most what retires it this month; the remainder flows to the next
//! ```
//!
//! The simulation stops when every balance is zero, when a month makes no
//! principal progress on any debt, or at the safety cap.
//!
//! CRITICAL: All money values are i64 (cents)

use crate::core::time::shift_months;
use crate::models::debt::DebtState;
use crate::payoff::amortization::{
    amortization_step, monthly_interest, AmortizationStep, PayoffHorizon, MAX_AMORTIZATION_MONTHS,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Household debt payoff strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStrategy {
    /// Highest interest rate first
    #[default]
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl PayoffStrategy {
    pub const ALL: [PayoffStrategy; 2] = [PayoffStrategy::Avalanche, PayoffStrategy::Snowball];

    /// Comparator placing the debt to pay first at the front
    pub fn compare(&self, a: &DebtState, b: &DebtState) -> Ordering {
        match self {
            PayoffStrategy::Avalanche => b
                .annual_rate_percent()
                .partial_cmp(&a.annual_rate_percent())
                .unwrap_or(Ordering::Equal),
            PayoffStrategy::Snowball => a.balance().cmp(&b.balance()),
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayoffStrategy::Avalanche => f.write_str("avalanche"),
            PayoffStrategy::Snowball => f.write_str("snowball"),
        }
    }
}

/// Indices of the debts eligible for extra payment, in payoff order
fn ordered_indices(debts: &[DebtState], strategy: PayoffStrategy) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..debts.len())
        .filter(|&i| !debts[i].exclude_from_payoff())
        .collect();
    indices.sort_by(|&a, &b| strategy.compare(&debts[a], &debts[b]));
    indices
}

/// Debts eligible for extra payment, in payoff order
pub fn order_debts(debts: &[DebtState], strategy: PayoffStrategy) -> Vec<&DebtState> {
    ordered_indices(debts, strategy)
        .into_iter()
        .map(|i| &debts[i])
        .collect()
}

/// The first ordered debt with a balance: the one receiving the extra payment
///
/// # Example
/// ```
/// use household_scheduler_core::DebtState;
/// use household_scheduler_core::payoff::{focus_debt, PayoffStrategy};
///
/// let debts = vec![
///     DebtState::new("A", "Card A", 500_000, 22.0, 15_000),
///     DebtState::new("B", "Card B", 100_000, 8.0, 5_000),
/// ];
/// assert_eq!(focus_debt(&debts, PayoffStrategy::Avalanche).unwrap().id(), "A");
/// assert_eq!(focus_debt(&debts, PayoffStrategy::Snowball).unwrap().id(), "B");
/// ```
pub fn focus_debt(debts: &[DebtState], strategy: PayoffStrategy) -> Option<&DebtState> {
    order_debts(debts, strategy)
        .into_iter()
        .find(|debt| debt.balance() > 0)
}

/// Simulated payoff of one debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoffSchedule {
    pub debt_id: String,
    pub steps: Vec<AmortizationStep>,
    /// Sum of interest portions (cents)
    pub total_interest: i64,
    pub horizon: PayoffHorizon,
    /// Anchor plus payoff months; `None` for an infinite horizon
    pub payoff_date: Option<NaiveDate>,
    /// Whether the debt takes part in the extra-payment ordering
    pub receives_extra: bool,
}

impl DebtPayoffSchedule {
    pub fn is_amortizing(&self) -> bool {
        self.horizon != PayoffHorizon::Never
    }
}

/// Result of one strategy simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub strategy: PayoffStrategy,
    pub extra_payment: i64,
    pub anchor: NaiveDate,
    /// Ids of the ordered (non-excluded) debts, focus first
    pub order: Vec<String>,
    pub schedules: BTreeMap<String, DebtPayoffSchedule>,
}

impl PayoffPlan {
    pub fn schedule(&self, debt_id: &str) -> Option<&DebtPayoffSchedule> {
        self.schedules.get(debt_id)
    }

    /// Interest across debts that pay off
    pub fn total_interest(&self) -> i64 {
        self.schedules
            .values()
            .filter(|s| s.is_amortizing())
            .map(|s| s.total_interest)
            .sum()
    }

    /// Date the last amortizing debt is retired
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.schedules.values().filter_map(|s| s.payoff_date).max()
    }

    /// Months until the last amortizing debt is retired
    pub fn months_to_payoff(&self) -> Option<u32> {
        self.schedules
            .values()
            .filter_map(|s| match s.horizon {
                PayoffHorizon::Months(months) => Some(months),
                PayoffHorizon::Never => None,
            })
            .max()
    }

    pub fn non_amortizing_debt_ids(&self) -> Vec<String> {
        self.schedules
            .values()
            .filter(|s| !s.is_amortizing())
            .map(|s| s.debt_id.clone())
            .collect()
    }
}

/// Simulate paying off `debts` under `strategy` with a household extra payment
///
/// # Arguments
///
/// * `debts` - Current debt states (input order breaks ordering ties)
/// * `strategy` - Avalanche or snowball
/// * `extra_payment` - Monthly amount on top of minimums (cents)
/// * `anchor` - Month zero, used for payoff dates
pub fn simulate(
    debts: &[DebtState],
    strategy: PayoffStrategy,
    extra_payment: i64,
    anchor: NaiveDate,
) -> PayoffPlan {
    let ordered = ordered_indices(debts, strategy);
    let mut balances: Vec<i64> = debts.iter().map(|d| d.balance()).collect();
    let mut steps: Vec<Vec<AmortizationStep>> = vec![Vec::new(); debts.len()];
    let mut paid_off_month: Vec<Option<u32>> = balances
        .iter()
        .map(|&b| if b == 0 { Some(0) } else { None })
        .collect();
    let mut rollover: i64 = 0;
    let mut month: u32 = 0;

    while month < MAX_AMORTIZATION_MONTHS && balances.iter().any(|&b| b > 0) {
        month += 1;

        let mut payments: Vec<i64> = debts
            .iter()
            .zip(&balances)
            .map(|(debt, &balance)| if balance > 0 { debt.minimum_payment() } else { 0 })
            .collect();

        let mut pool = extra_payment.max(0) + rollover;
        for &i in &ordered {
            if pool == 0 {
                break;
            }
            if balances[i] == 0 {
                continue;
            }
            let payoff_amount = balances[i] + monthly_interest(balances[i], debts[i].monthly_rate());
            let room = (payoff_amount - payments[i]).max(0);
            let allotted = room.min(pool);
            payments[i] += allotted;
            pool -= allotted;
        }

        let mut progressed = false;
        for (i, debt) in debts.iter().enumerate() {
            if balances[i] == 0 {
                continue;
            }
            let step = amortization_step(month, balances[i], debt.monthly_rate(), payments[i]);
            progressed |= step.principal_portion > 0;
            balances[i] = step.ending_balance;
            steps[i].push(step);

            if balances[i] == 0 {
                paid_off_month[i] = Some(month);
                if ordered.contains(&i) {
                    rollover += debt.minimum_payment();
                }
            }
        }

        if !progressed {
            break;
        }
    }

    let schedules = debts
        .iter()
        .zip(steps)
        .zip(paid_off_month)
        .map(|((debt, steps), paid_month)| {
            let horizon = match paid_month {
                Some(months) => PayoffHorizon::Months(months),
                None => PayoffHorizon::Never,
            };
            let payoff_date = paid_month.and_then(|m| shift_months(anchor, i64::from(m)));
            let schedule = DebtPayoffSchedule {
                debt_id: debt.id().to_string(),
                total_interest: steps.iter().map(|s| s.interest_portion).sum(),
                steps,
                horizon,
                payoff_date,
                receives_extra: !debt.exclude_from_payoff(),
            };
            (debt.id().to_string(), schedule)
        })
        .collect();

    PayoffPlan {
        strategy,
        extra_payment,
        anchor,
        order: ordered.iter().map(|&i| debts[i].id().to_string()).collect(),
        schedules,
    }
}

/// Headline numbers of one strategy, for side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffComparison {
    pub strategy: PayoffStrategy,
    /// Interest across amortizing debts (cents)
    pub total_interest: i64,
    /// When the last amortizing debt is retired
    pub payoff_date: Option<NaiveDate>,
    pub months_to_payoff: Option<u32>,
    /// Debts left out of the comparison (infinite horizon)
    pub non_amortizing_debt_ids: Vec<String>,
}

impl From<&PayoffPlan> for PayoffComparison {
    fn from(plan: &PayoffPlan) -> Self {
        Self {
            strategy: plan.strategy,
            total_interest: plan.total_interest(),
            payoff_date: plan.payoff_date(),
            months_to_payoff: plan.months_to_payoff(),
            non_amortizing_debt_ids: plan.non_amortizing_debt_ids(),
        }
    }
}

/// Simulate every strategy and summarize each
pub fn compare_strategies(
    debts: &[DebtState],
    extra_payment: i64,
    anchor: NaiveDate,
) -> Vec<PayoffComparison> {
    PayoffStrategy::ALL
        .iter()
        .map(|&strategy| PayoffComparison::from(&simulate(debts, strategy, extra_payment, anchor)))
        .collect()
}
