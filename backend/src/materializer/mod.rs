//! Obligation Materializer
//!
//! Turns bills, debts and budget categories into due-date-stamped obligation
//! instances covering a window.
//!
//! # Due dates
//!
//! Every source carries a day of month (1-31). The materializer finds the
//! next occurrence on or after today, then walks whole months backward and
//! forward from it until the window is covered. Each month is computed from
//! the anchor month, so a day-31 bill lands on Feb 28 and returns to Mar 31.
//!
//! Bills with a weekly, biweekly or semimonthly frequency use that next
//! occurrence as the anchor of a fixed-step projection instead.
//!
//! # Debts
//!
//! Due dates from today on follow the payoff simulation month by month:
//!
//! - One `DebtMinimumPayment` per due date, never more than the simulated
//!   payoff amount. Once the simulated balance reaches zero the debt emits
//!   nothing further; a debt with zero balance emits nothing at all.
//! - While `extra_payment > 0`, the part of a month's simulated payment above
//!   the minimum becomes a discretionary `DebtExtraPayment`. It follows the
//!   focus debt, including the rollover to the next debt in payoff order.
//!
//! Due dates before today are stamped with the current balance, and only the
//! current focus debt carries an extra payment there.
//!
//! Invalid source records are skipped with a warning and a `SourceSkipped`
//! event; the rest of the run continues.
//!
//! CRITICAL: All money values are i64 (cents)

pub mod splitting;

use crate::config::HouseholdConfig;
use crate::core::time::{due_day_in_month_offset, Frequency};
use crate::models::debt::DebtState;
use crate::models::event::{Event, EventLog};
use crate::models::obligation::{Obligation, ObligationDetail};
use crate::models::sources::{Bill, BudgetCategoryAllotment, Debt};
use crate::models::validation::ValidationError;
use crate::payoff::strategy::{focus_debt, simulate, DebtPayoffSchedule};
use crate::recurrence;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

pub use splitting::{apply_split_directives, SplitDirective};

/// Output of one materialization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Materialized {
    /// Obligations in allocation order
    pub obligations: Vec<Obligation>,
    /// Debt receiving the extra payment, if any
    pub focus_debt_id: Option<String>,
    pub events: EventLog,
}

// ============================================================================
// Due date generation
// ============================================================================

/// First occurrence of `due_day` on or after `today`
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::materializer::next_due_on_or_after;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// assert_eq!(next_due_on_or_after(today, 19), Some(today));
/// assert_eq!(next_due_on_or_after(today, 3), NaiveDate::from_ymd_opt(2026, 11, 3));
/// ```
pub fn next_due_on_or_after(today: NaiveDate, due_day: u32) -> Option<NaiveDate> {
    let this_month = due_day_in_month_offset(today, due_day, 0)?;
    if this_month >= today {
        Some(this_month)
    } else {
        due_day_in_month_offset(today, due_day, 1)
    }
}

/// Monthly occurrences of `due_day` within `[window_start, window_end]`
pub fn monthly_due_dates(
    today: NaiveDate,
    due_day: u32,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    if window_start > window_end {
        return Vec::new();
    }
    // Month offset of the next occurrence on or after today
    let anchor_offset: i64 = match due_day_in_month_offset(today, due_day, 0) {
        Some(this_month) if this_month >= today => 0,
        Some(_) => 1,
        None => return Vec::new(),
    };

    let mut dates = Vec::new();

    // Backward, anchor included
    let mut k = anchor_offset;
    while let Some(date) = due_day_in_month_offset(today, due_day, k) {
        if date < window_start {
            break;
        }
        if date <= window_end {
            dates.push(date);
        }
        k -= 1;
    }

    // Forward
    let mut k = anchor_offset + 1;
    while let Some(date) = due_day_in_month_offset(today, due_day, k) {
        if date > window_end {
            break;
        }
        if date >= window_start {
            dates.push(date);
        }
        k += 1;
    }

    dates.sort();
    dates.dedup();
    dates
}

fn bill_due_dates(
    bill: &Bill,
    today: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    match bill.frequency {
        Frequency::Monthly => {
            monthly_due_dates(today, bill.due_day_of_month, window_start, window_end)
        }
        frequency => match next_due_on_or_after(today, bill.due_day_of_month) {
            Some(anchor) => recurrence::project(anchor, frequency, window_start, window_end),
            None => Vec::new(),
        },
    }
}

// ============================================================================
// Debt installments
// ============================================================================

/// Amounts due on one debt due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DebtInstallment {
    /// Balance before this payment
    balance: i64,
    minimum: i64,
    extra: i64,
}

/// Whole calendar months from `from` to `to`
fn month_offset(from: NaiveDate, to: NaiveDate) -> usize {
    let months = (i64::from(to.year()) * 12 + i64::from(to.month0()))
        - (i64::from(from.year()) * 12 + i64::from(from.month0()));
    usize::try_from(months).unwrap_or(0)
}

/// Installment of the `offset`-th future due date (0 = next one)
///
/// Reads the simulated month; `None` once the simulated balance is zero.
/// A debt still open past the simulated horizon keeps paying its minimum.
fn projected_installment(
    schedule: &DebtPayoffSchedule,
    opening_balance: i64,
    minimum_payment: i64,
    offset: usize,
) -> Option<DebtInstallment> {
    let previous = offset
        .checked_sub(1)
        .and_then(|i| schedule.steps.get(i).or_else(|| schedule.steps.last()));
    let balance = previous.map_or(opening_balance, |step| step.ending_balance);
    if balance == 0 {
        return None;
    }

    match schedule.steps.get(offset) {
        Some(step) => {
            let paid = step.payment();
            let minimum = minimum_payment.min(paid);
            Some(DebtInstallment {
                balance,
                minimum,
                extra: paid - minimum,
            })
        }
        None => Some(DebtInstallment {
            balance,
            minimum: minimum_payment.min(balance),
            extra: 0,
        }),
    }
}

// ============================================================================
// Materialization
// ============================================================================

fn skip_source(events: &mut EventLog, source_kind: &str, source_id: &str, err: &ValidationError) {
    warn!(
        "event=source_skipped source_kind={} source_id={} reason=\"{}\"",
        source_kind, source_id, err
    );
    events.log(Event::SourceSkipped {
        source_kind: source_kind.to_string(),
        source_id: source_id.to_string(),
        reason: err.to_string(),
    });
}

/// Materialize every source into obligation instances within the window
///
/// # Arguments
///
/// * `bills`, `debts`, `budget_categories` - Source records
/// * `window_start`, `window_end` - Inclusive window
/// * `config` - Supplies today, the payoff strategy and the extra payment
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::config::HouseholdConfig;
/// use household_scheduler_core::materializer::materialize;
/// use household_scheduler_core::models::sources::Bill;
/// use household_scheduler_core::Frequency;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
/// let config = HouseholdConfig::new("home", d(10, 19));
/// let rent = Bill {
///     id: "rent".to_string(),
///     company: "Landlord".to_string(),
///     amount: 150_000,
///     due_day_of_month: 1,
///     frequency: Frequency::Monthly,
/// };
///
/// let out = materialize(&[rent], &[], &[], d(10, 1), d(12, 31), &config);
/// let dates: Vec<_> = out.obligations.iter().map(|o| o.due_date).collect();
/// assert_eq!(dates, vec![d(10, 1), d(11, 1), d(12, 1)]);
/// ```
pub fn materialize(
    bills: &[Bill],
    debts: &[Debt],
    budget_categories: &[BudgetCategoryAllotment],
    window_start: NaiveDate,
    window_end: NaiveDate,
    config: &HouseholdConfig,
) -> Materialized {
    let mut out = Materialized::default();
    let today = config.today;

    for bill in bills {
        if let Err(err) = bill.validate() {
            skip_source(&mut out.events, "bill", &bill.id, &err);
            continue;
        }
        for due in bill_due_dates(bill, today, window_start, window_end) {
            out.obligations.push(Obligation::new(
                bill.id.clone(),
                bill.company.clone(),
                bill.amount,
                due,
                ObligationDetail::RecurringBill {
                    frequency: bill.frequency,
                },
            ));
        }
    }

    let mut valid_debts: Vec<&Debt> = Vec::with_capacity(debts.len());
    for debt in debts {
        match debt.validate() {
            Ok(()) => valid_debts.push(debt),
            Err(err) => skip_source(&mut out.events, "debt", &debt.id, &err),
        }
    }

    let states: Vec<DebtState> = valid_debts.iter().map(|d| DebtState::from(*d)).collect();
    let extra_payment = config.extra_payment.max(0);
    if extra_payment > 0 {
        if let Some(focus) = focus_debt(&states, config.strategy) {
            debug!(
                "event=focus_debt_selected debt_id={} strategy={}",
                focus.id(),
                config.strategy
            );
            out.focus_debt_id = Some(focus.id().to_string());
            out.events.log(Event::FocusDebtSelected {
                debt_id: focus.id().to_string(),
                strategy: config.strategy,
            });
        }
    }

    // Future installments follow the payoff simulation. Without an extra
    // payment every debt pays its own minimum and nothing rolls over.
    let projection_states: Vec<DebtState> = if extra_payment > 0 {
        states
    } else {
        states
            .into_iter()
            .map(DebtState::excluded_from_payoff)
            .collect()
    };
    let projection = simulate(&projection_states, config.strategy, extra_payment, today);

    for debt in valid_debts {
        if debt.balance == 0 {
            continue;
        }
        let Some(schedule) = projection.schedule(&debt.id) else {
            continue;
        };
        let Some(first_future) = next_due_on_or_after(today, debt.due_day_of_month) else {
            continue;
        };

        // Past due dates are stamped with today's balance
        let minimum = debt.minimum_payment.min(debt.balance);
        let is_focus = out.focus_debt_id.as_deref() == Some(debt.id.as_str());
        let current = DebtInstallment {
            balance: debt.balance,
            minimum,
            extra: if is_focus {
                extra_payment.min((debt.balance - minimum).max(0))
            } else {
                0
            },
        };

        for due in monthly_due_dates(today, debt.due_day_of_month, window_start, window_end) {
            let installment = if due < today {
                current
            } else {
                let offset = month_offset(first_future, due);
                match projected_installment(schedule, debt.balance, debt.minimum_payment, offset) {
                    Some(installment) => installment,
                    None => break,
                }
            };

            if installment.minimum > 0 {
                out.obligations.push(Obligation::new(
                    debt.id.clone(),
                    debt.name.clone(),
                    installment.minimum,
                    due,
                    ObligationDetail::DebtMinimumPayment {
                        balance: installment.balance,
                    },
                ));
            }
            if extra_payment > 0 && installment.extra > 0 {
                out.obligations.push(Obligation::new(
                    debt.id.clone(),
                    format!("{} (extra)", debt.name),
                    installment.extra,
                    due,
                    ObligationDetail::DebtExtraPayment {
                        strategy: config.strategy,
                    },
                ));
            }
        }
    }

    for category in budget_categories {
        if let Err(err) = category.validate() {
            skip_source(&mut out.events, "budget_category", &category.id, &err);
            continue;
        }
        for due in monthly_due_dates(today, category.due_day_of_month, window_start, window_end) {
            out.obligations.push(Obligation::new(
                category.id.clone(),
                category.name.clone(),
                category.monthly_amount,
                due,
                ObligationDetail::BudgetCategoryAllotment,
            ));
        }
    }

    out.obligations.sort_by(|a, b| a.allocation_order(b));
    debug!(
        "event=materialized obligations={} skipped={}",
        out.obligations.len(),
        out.events.events_of_type("SourceSkipped").len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::obligation::ObligationKind;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_next_due_rolls_to_next_month() {
        assert_eq!(next_due_on_or_after(d(2026, 10, 19), 18), Some(d(2026, 11, 18)));
        assert_eq!(next_due_on_or_after(d(2027, 1, 31), 31), Some(d(2027, 1, 31)));
        assert_eq!(next_due_on_or_after(d(2027, 2, 1), 31), Some(d(2027, 2, 28)));
    }

    #[test]
    fn test_monthly_due_dates_clamp_without_drift() {
        let dates = monthly_due_dates(d(2027, 1, 10), 31, d(2027, 1, 1), d(2027, 4, 30));
        assert_eq!(
            dates,
            vec![d(2027, 1, 31), d(2027, 2, 28), d(2027, 3, 31), d(2027, 4, 30)]
        );
    }

    #[test]
    fn test_monthly_due_dates_cover_past_months() {
        let dates = monthly_due_dates(d(2026, 10, 19), 5, d(2026, 8, 1), d(2026, 11, 30));
        assert_eq!(dates, vec![d(2026, 8, 5), d(2026, 9, 5), d(2026, 10, 5), d(2026, 11, 5)]);
    }

    #[test]
    fn test_invalid_budget_category_is_skipped() {
        let config = HouseholdConfig::new("h", d(2026, 10, 19));
        let bad = BudgetCategoryAllotment {
            id: "fun".to_string(),
            name: "Fun".to_string(),
            monthly_amount: 0,
            due_day_of_month: 1,
        };
        let good = BudgetCategoryAllotment {
            id: "food".to_string(),
            name: "Food".to_string(),
            monthly_amount: 40_000,
            due_day_of_month: 1,
        };
        let out = materialize(&[], &[], &[bad, good], d(2026, 11, 1), d(2026, 11, 30), &config);
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(out.obligations[0].kind(), ObligationKind::BudgetCategoryAllotment);
        assert_eq!(out.events.events_of_type("SourceSkipped").len(), 1);
    }
}
