//! Paid-status reconciliation
//!
//! Marks assignments paid from recorded transactions. A transaction pays an
//! assignment when it is linked to the obligation's source (bill or debt)
//! and its date lies within the reconciliation window of the due date.
//!
//! Matching is one-to-one: candidate pairs are taken greedily by ascending
//! day distance (ties: earlier due date, then assignment order, then
//! transaction order). Assignments the user has toggled are never touched.

use crate::models::assignment::{PaidSource, ScheduledAssignment};
use crate::models::obligation::ObligationKey;
use crate::models::sources::TransactionRecord;
use log::debug;
use serde::{Deserialize, Serialize};

/// One transaction matched to one assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationMatch {
    pub key: ObligationKey,
    pub income_period_id: String,
    pub transaction_id: String,
    /// Absolute distance between transaction date and due date
    pub days_apart: i64,
}

/// Set `is_paid` on assignments that have a matching transaction
///
/// Returns the matches that changed an assignment.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::models::sources::TransactionRecord;
/// use household_scheduler_core::scheduler::reconcile_paid;
/// use household_scheduler_core::{Frequency, Obligation, ObligationDetail, ScheduledAssignment};
///
/// let d = |day| NaiveDate::from_ymd_opt(2026, 11, day).unwrap();
/// let power = Obligation::new(
///     "power", "Power Co", 9_000, d(10),
///     ObligationDetail::RecurringBill { frequency: Frequency::Monthly },
/// );
/// let mut assignments = vec![ScheduledAssignment::new("job:2026-11-06".to_string(), power)];
/// let paid = TransactionRecord {
///     id: "t1".to_string(),
///     date: d(13),
///     amount: 9_000,
///     linked_debt_id: None,
///     linked_bill_id: Some("power".to_string()),
/// };
///
/// let matches = reconcile_paid(&mut assignments, &[paid], 7);
/// assert_eq!(matches[0].days_apart, 3);
/// assert!(assignments[0].is_paid());
/// ```
pub fn reconcile_paid(
    assignments: &mut [ScheduledAssignment],
    transactions: &[TransactionRecord],
    window_days: i64,
) -> Vec<ReconciliationMatch> {
    // (distance, due date, assignment index, transaction index)
    let mut candidates = Vec::new();
    for (a, assignment) in assignments.iter().enumerate() {
        if assignment.is_paid() || assignment.paid_toggled_by_user() {
            continue;
        }
        let obligation = assignment.obligation();
        for (t, tx) in transactions.iter().enumerate() {
            if !tx.pays(obligation.kind(), &obligation.source_id) {
                continue;
            }
            let distance = (tx.date - obligation.due_date).num_days().abs();
            if distance <= window_days {
                candidates.push((distance, obligation.due_date, a, t));
            }
        }
    }
    candidates.sort();

    let mut assignment_used = vec![false; assignments.len()];
    let mut transaction_used = vec![false; transactions.len()];
    let mut matches = Vec::new();

    for (distance, _, a, t) in candidates {
        if assignment_used[a] || transaction_used[t] {
            continue;
        }
        assignment_used[a] = true;
        transaction_used[t] = true;

        let assignment = &mut assignments[a];
        if assignment.set_paid(true, PaidSource::Reconciliation) {
            debug!(
                "event=paid_reconciled key={} transaction={} days_apart={}",
                assignment.key(),
                transactions[t].id,
                distance
            );
            matches.push(ReconciliationMatch {
                key: assignment.key(),
                income_period_id: assignment.income_period_id().to_string(),
                transaction_id: transactions[t].id.clone(),
                days_apart: distance,
            });
        }
    }

    matches
}
