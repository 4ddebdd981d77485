//! Schedule Store Adapter
//!
//! The scheduler's only persistence seam. Implementations wrap whatever keyed
//! store the household planner uses; this crate ships an in-memory adapter.
//!
//! # Contract
//!
//! - Assignments are stored per (household, income period). Each record is
//!   addressed by (household, kind, source id, due date[, part]).
//! - [`ScheduleStore::save_period`] is first-writer-wins: when the period
//!   already holds assignments the adapter returns [`StoreError::Conflict`]
//!   and leaves the stored set untouched.
//! - Persisted assignments change afterwards only through
//!   [`ScheduleStore::set_paid`].
//! - Dismissal tombstones share the obligation key.
//! - User paid toggles are remembered by obligation key as well, so a toggle
//!   on an assignment of an open period outlives the recomputation of that
//!   period. The scheduler applies them before a period is saved.
//!
//! [`StoreError::Unavailable`] is fatal for the pass and is propagated to
//! the caller. The scheduler does not retry.

pub mod memory;

use crate::models::assignment::{PaidSource, ScheduledAssignment};
use crate::models::obligation::ObligationKey;
use crate::models::sources::TransactionRecord;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub use memory::InMemoryScheduleStore;

/// Errors reported by a store adapter
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Schedule store unavailable: {0}")]
    Unavailable(String),

    #[error("Period {period_id} already holds persisted assignments")]
    Conflict { period_id: String },
}

/// Persistence of locked period assignments, paid flags and dismissals
pub trait ScheduleStore {
    /// Persisted assignments of one period, `None` if it was never written
    fn load_period(
        &self,
        household_id: &str,
        period_id: &str,
    ) -> Result<Option<Vec<ScheduledAssignment>>, StoreError>;

    /// Write a period's assignments once
    ///
    /// An empty set is a valid write: it seals the period.
    fn save_period(
        &mut self,
        household_id: &str,
        period_id: &str,
        assignments: &[ScheduledAssignment],
    ) -> Result<(), StoreError>;

    /// Keys of every persisted assignment of the household
    fn scheduled_keys(&self, household_id: &str) -> Result<HashSet<ObligationKey>, StoreError>;

    /// Update the paid flag of an assignment
    ///
    /// A [`PaidSource::User`] toggle is always remembered by key, persisted
    /// or not. Returns whether the persisted flag changed, or for a key with
    /// no persisted assignment whether the remembered toggle changed.
    fn set_paid(
        &mut self,
        household_id: &str,
        key: &ObligationKey,
        paid: bool,
        source: PaidSource,
    ) -> Result<bool, StoreError>;

    /// Record a dismissal tombstone
    fn dismiss(&mut self, household_id: &str, key: &ObligationKey) -> Result<(), StoreError>;

    /// Remove a dismissal tombstone; returns whether one existed
    fn restore(&mut self, household_id: &str, key: &ObligationKey) -> Result<bool, StoreError>;

    /// Every dismissed key of the household
    fn dismissed_keys(&self, household_id: &str) -> Result<HashSet<ObligationKey>, StoreError>;

    /// Paid flags last set by the user, by obligation key
    fn paid_toggles(&self, household_id: &str)
        -> Result<HashMap<ObligationKey, bool>, StoreError>;
}

/// Read-only access to recorded transactions
pub trait TransactionLog {
    fn transactions(&self, household_id: &str) -> Result<Vec<TransactionRecord>, StoreError>;
}

impl TransactionLog for [TransactionRecord] {
    fn transactions(&self, _household_id: &str) -> Result<Vec<TransactionRecord>, StoreError> {
        Ok(self.to_vec())
    }
}

impl TransactionLog for Vec<TransactionRecord> {
    fn transactions(&self, household_id: &str) -> Result<Vec<TransactionRecord>, StoreError> {
        self.as_slice().transactions(household_id)
    }
}
