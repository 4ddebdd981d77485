//! User-directed obligation splitting
//!
//! A split directive replaces one materialized obligation instance with N
//! part instances. Each part keeps the parent's due date, kind and source,
//! gets its own key (`part = Some(i)`) and is scheduled independently.
//!
//! A directive is rejected, with a warning and a `SplitRejected` event, when
//! it names no materialized obligation, has fewer than two parts or more than
//! 255, contains a non-positive part, or its parts do not sum to the
//! obligation amount.

use crate::models::event::{Event, EventLog};
use crate::models::obligation::{Obligation, ObligationKey, SplitPart};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Split one obligation instance into parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDirective {
    /// Key of the whole obligation (`part` must be `None`)
    pub key: ObligationKey,
    /// Part amounts in order (cents)
    pub parts: Vec<i64>,
}

impl SplitDirective {
    pub fn new(key: ObligationKey, parts: Vec<i64>) -> Self {
        Self { key, parts }
    }

    fn check(&self, obligation: &Obligation) -> Result<u8, String> {
        let count = u8::try_from(self.parts.len())
            .map_err(|_| format!("too many parts ({})", self.parts.len()))?;
        if count < 2 {
            return Err("a split needs at least two parts".to_string());
        }
        if let Some(bad) = self.parts.iter().find(|&&amount| amount <= 0) {
            return Err(format!("part amount must be > 0, got {}", bad));
        }
        let total: i64 = self.parts.iter().sum();
        if total != obligation.amount {
            return Err(format!(
                "parts sum to {} but the obligation is {}",
                total, obligation.amount
            ));
        }
        Ok(count)
    }
}

/// Replace split obligations with their parts
///
/// Obligations without a directive pass through unchanged. When several
/// directives name the same key, the last one wins.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use household_scheduler_core::materializer::{apply_split_directives, SplitDirective};
/// use household_scheduler_core::models::EventLog;
/// use household_scheduler_core::{Frequency, Obligation, ObligationDetail};
///
/// let due = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
/// let rent = Obligation::new(
///     "rent",
///     "Rent",
///     150_000,
///     due,
///     ObligationDetail::RecurringBill { frequency: Frequency::Monthly },
/// );
/// let directive = SplitDirective::new(rent.key(), vec![100_000, 50_000]);
///
/// let mut events = EventLog::new();
/// let out = apply_split_directives(vec![rent], &[directive], &mut events);
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[1].split.unwrap().label(), "Part 2 of 2");
/// ```
pub fn apply_split_directives(
    obligations: Vec<Obligation>,
    directives: &[SplitDirective],
    events: &mut EventLog,
) -> Vec<Obligation> {
    if directives.is_empty() {
        return obligations;
    }

    let mut pending: HashMap<&ObligationKey, &SplitDirective> =
        directives.iter().map(|d| (&d.key, d)).collect();
    let mut out = Vec::with_capacity(obligations.len() + directives.len());

    for obligation in obligations {
        let key = obligation.key();
        let Some(directive) = pending.remove(&key) else {
            out.push(obligation);
            continue;
        };

        match directive.check(&obligation) {
            Ok(count) => {
                debug!("event=split_applied key={} parts={}", key, count);
                events.log(Event::SplitApplied {
                    key,
                    parts: usize::from(count),
                });
                for (i, &amount) in directive.parts.iter().enumerate() {
                    // count <= 255 so every index fits
                    let index = (i + 1) as u8;
                    out.push(obligation.split_part(SplitPart { index, count }, amount));
                }
            }
            Err(reason) => {
                warn!("event=split_rejected key={} reason=\"{}\"", key, reason);
                events.log(Event::SplitRejected { key, reason });
                out.push(obligation);
            }
        }
    }

    let mut unmatched: Vec<&ObligationKey> = pending.into_keys().collect();
    unmatched.sort();
    for key in unmatched {
        let reason = "no materialized obligation has this key".to_string();
        warn!("event=split_rejected key={} reason=\"{}\"", key, reason);
        events.log(Event::SplitRejected {
            key: key.clone(),
            reason,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::obligation::{ObligationDetail, ObligationKind};
    use chrono::NaiveDate;

    fn groceries() -> Obligation {
        Obligation::new(
            "groceries",
            "Groceries",
            60_000,
            NaiveDate::from_ymd_opt(2026, 11, 15).unwrap(),
            ObligationDetail::BudgetCategoryAllotment,
        )
    }

    #[test]
    fn test_parts_must_sum_to_amount() {
        let ob = groceries();
        let directive = SplitDirective::new(ob.key(), vec![30_000, 20_000]);
        let mut events = EventLog::new();
        let out = apply_split_directives(vec![ob.clone()], &[directive], &mut events);
        assert_eq!(out, vec![ob]);
        assert_eq!(events.events_of_type("SplitRejected").len(), 1);
    }

    #[test]
    fn test_single_part_rejected() {
        let ob = groceries();
        let directive = SplitDirective::new(ob.key(), vec![60_000]);
        let mut events = EventLog::new();
        let out = apply_split_directives(vec![ob], &[directive], &mut events);
        assert_eq!(out.len(), 1);
        assert!(out[0].split.is_none());
    }

    #[test]
    fn test_three_way_split_keys() {
        let ob = groceries();
        let directive = SplitDirective::new(ob.key(), vec![20_000, 20_000, 20_000]);
        let mut events = EventLog::new();
        let out = apply_split_directives(vec![ob.clone()], &[directive], &mut events);

        let parts: Vec<Option<u8>> = out.iter().map(|o| o.key().part).collect();
        assert_eq!(parts, vec![Some(1), Some(2), Some(3)]);
        assert!(out.iter().all(|o| o.key().unsplit() == ob.key()));
        assert_eq!(events.events_of_type("SplitApplied").len(), 1);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let key = ObligationKey::new(
            ObligationKind::RecurringBill,
            "ghost",
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        );
        let mut events = EventLog::new();
        let out = apply_split_directives(
            vec![groceries()],
            &[SplitDirective::new(key, vec![1, 2])],
            &mut events,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(events.events_of_type("SplitRejected").len(), 1);
    }
}
