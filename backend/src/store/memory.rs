//! In-memory schedule store
//!
//! Reference adapter used by the CLI and the tests. It can be switched
//! offline to exercise the fatal-error path.

use super::{ScheduleStore, StoreError};
use crate::models::assignment::{PaidSource, ScheduledAssignment};
use crate::models::obligation::ObligationKey;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default)]
struct HouseholdRecords {
    /// Persisted assignments by income period id
    periods: BTreeMap<String, Vec<ScheduledAssignment>>,
    dismissed: HashSet<ObligationKey>,
    /// Last user decision per key
    paid_toggles: HashMap<ObligationKey, bool>,
}

/// Schedule store holding every household in process memory
///
/// # Example
/// ```
/// use household_scheduler_core::store::{InMemoryScheduleStore, ScheduleStore, StoreError};
///
/// let mut store = InMemoryScheduleStore::new();
/// store.save_period("home", "job:2026-10-23", &[]).unwrap();
/// assert_eq!(store.load_period("home", "job:2026-10-23").unwrap(), Some(vec![]));
///
/// // First writer wins
/// assert!(matches!(
///     store.save_period("home", "job:2026-10-23", &[]),
///     Err(StoreError::Conflict { .. })
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleStore {
    households: HashMap<String, HouseholdRecords>,
    offline: bool,
    period_writes: usize,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing store becoming unreachable (or recovering)
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// Number of successful `save_period` writes
    pub fn period_writes(&self) -> usize {
        self.period_writes
    }

    /// Ids of the periods persisted for a household, ascending
    pub fn persisted_period_ids(&self, household_id: &str) -> Vec<String> {
        self.households
            .get(household_id)
            .map(|records| records.periods.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn household_mut(&mut self, household_id: &str) -> &mut HouseholdRecords {
        self.households.entry(household_id.to_string()).or_default()
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn load_period(
        &self,
        household_id: &str,
        period_id: &str,
    ) -> Result<Option<Vec<ScheduledAssignment>>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .households
            .get(household_id)
            .and_then(|records| records.periods.get(period_id))
            .cloned())
    }

    fn save_period(
        &mut self,
        household_id: &str,
        period_id: &str,
        assignments: &[ScheduledAssignment],
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        let records = self.household_mut(household_id);
        if records.periods.contains_key(period_id) {
            return Err(StoreError::Conflict {
                period_id: period_id.to_string(),
            });
        }
        records
            .periods
            .insert(period_id.to_string(), assignments.to_vec());
        self.period_writes += 1;
        Ok(())
    }

    fn scheduled_keys(&self, household_id: &str) -> Result<HashSet<ObligationKey>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .households
            .get(household_id)
            .map(|records| {
                records
                    .periods
                    .values()
                    .flatten()
                    .map(|assignment| assignment.key())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn set_paid(
        &mut self,
        household_id: &str,
        key: &ObligationKey,
        paid: bool,
        source: PaidSource,
    ) -> Result<bool, StoreError> {
        self.ensure_online()?;
        let toggle_changed = match source {
            PaidSource::User => {
                let records = self.household_mut(household_id);
                records.paid_toggles.insert(key.clone(), paid) != Some(paid)
            }
            PaidSource::Reconciliation => false,
        };
        let Some(records) = self.households.get_mut(household_id) else {
            return Ok(false);
        };
        let found = records
            .periods
            .values_mut()
            .flatten()
            .find(|assignment| &assignment.key() == key);
        Ok(match found {
            Some(assignment) => assignment.set_paid(paid, source),
            None => toggle_changed,
        })
    }

    fn dismiss(&mut self, household_id: &str, key: &ObligationKey) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.household_mut(household_id).dismissed.insert(key.clone());
        Ok(())
    }

    fn restore(&mut self, household_id: &str, key: &ObligationKey) -> Result<bool, StoreError> {
        self.ensure_online()?;
        Ok(self
            .households
            .get_mut(household_id)
            .map(|records| records.dismissed.remove(key))
            .unwrap_or(false))
    }

    fn dismissed_keys(&self, household_id: &str) -> Result<HashSet<ObligationKey>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .households
            .get(household_id)
            .map(|records| records.dismissed.clone())
            .unwrap_or_default())
    }

    fn paid_toggles(
        &self,
        household_id: &str,
    ) -> Result<HashMap<ObligationKey, bool>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .households
            .get(household_id)
            .map(|records| records.paid_toggles.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::obligation::{Obligation, ObligationDetail, ObligationKind};
    use chrono::NaiveDate;

    fn assignment(source: &str) -> ScheduledAssignment {
        let ob = Obligation::new(
            source,
            source,
            10_000,
            NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            ObligationDetail::BudgetCategoryAllotment,
        );
        ScheduledAssignment::new("job:2026-10-23".to_string(), ob)
    }

    #[test]
    fn test_households_are_isolated() {
        let mut store = InMemoryScheduleStore::new();
        store
            .save_period("a", "job:2026-10-23", &[assignment("food")])
            .unwrap();
        assert_eq!(store.load_period("b", "job:2026-10-23").unwrap(), None);
        assert!(store.scheduled_keys("b").unwrap().is_empty());
        assert_eq!(store.scheduled_keys("a").unwrap().len(), 1);
    }

    #[test]
    fn test_set_paid_respects_user_toggle() {
        let mut store = InMemoryScheduleStore::new();
        let a = assignment("food");
        let key = a.key();
        store.save_period("h", "job:2026-10-23", &[a]).unwrap();

        // Flag unchanged, but the toggle is recorded
        assert!(!store.set_paid("h", &key, false, PaidSource::User).unwrap());
        assert!(!store
            .set_paid("h", &key, true, PaidSource::Reconciliation)
            .unwrap());
        let stored = store.load_period("h", "job:2026-10-23").unwrap().unwrap();
        assert!(!stored[0].is_paid());
        assert!(stored[0].paid_toggled_by_user());
    }

    #[test]
    fn test_user_toggle_remembered_without_persisted_assignment() {
        let mut store = InMemoryScheduleStore::new();
        let key = assignment("food").key();

        assert!(store.set_paid("h", &key, true, PaidSource::User).unwrap());
        assert!(!store.set_paid("h", &key, true, PaidSource::User).unwrap());
        assert!(!store
            .set_paid("h", &key, false, PaidSource::Reconciliation)
            .unwrap());
        assert_eq!(store.paid_toggles("h").unwrap().get(&key), Some(&true));
        assert!(store.paid_toggles("other").unwrap().is_empty());
    }

    #[test]
    fn test_dismiss_and_restore() {
        let mut store = InMemoryScheduleStore::new();
        let key = ObligationKey::new(
            ObligationKind::RecurringBill,
            "gym",
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        );
        store.dismiss("h", &key).unwrap();
        assert!(store.dismissed_keys("h").unwrap().contains(&key));
        assert!(store.restore("h", &key).unwrap());
        assert!(!store.restore("h", &key).unwrap());
    }

    #[test]
    fn test_offline_store_fails() {
        let mut store = InMemoryScheduleStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.load_period("h", "p"),
            Err(StoreError::Unavailable(_))
        ));
        assert_eq!(store.period_writes(), 0);
    }
}
