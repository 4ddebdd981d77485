//! Event logging for scheduling passes.
//!
//! Every scheduling pass returns an [`EventLog`] recording its decisions in
//! the order they were made. Events enable:
//! - Auditing (why was this bill deferred?)
//! - Debugging (which periods were frozen, which were persisted)
//! - Replay comparison between two passes
//!
//! # Event Types
//!
//! Events are categorized by pipeline phase:
//! - **Input**: a source record was skipped or a split directive applied
//! - **Lock**: a locked period was loaded verbatim from the store
//! - **Allocation**: obligation assigned, deferred, unschedulable, dismissed
//! - **Persistence**: locked period written, or a write conflict
//! - **Reconciliation**: paid flag set from a matching transaction
//!
//! # Example
//!
//! ```rust
//! use household_scheduler_core::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::PersistenceConflict {
//!     period_id: "job:2026-10-23".to_string(),
//! });
//! assert_eq!(log.events_of_type("PersistenceConflict").len(), 1);
//! ```

use crate::models::obligation::ObligationKey;
use crate::payoff::strategy::PayoffStrategy;
use serde::{Deserialize, Serialize};

/// Scheduling event capturing one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A source record failed validation and was left out of the run
    SourceSkipped {
        source_kind: String,
        source_id: String,
        reason: String,
    },

    /// A user split directive replaced an obligation with parts
    SplitApplied { key: ObligationKey, parts: usize },

    /// A split directive could not be applied
    SplitRejected { key: ObligationKey, reason: String },

    /// Payoff strategy selected the debt receiving the extra payment
    FocusDebtSelected {
        debt_id: String,
        strategy: PayoffStrategy,
    },

    /// Locked period loaded from the store instead of being recomputed
    PeriodFrozen {
        period_id: String,
        assignment_count: usize,
    },

    /// Obligation assigned to an income period
    ObligationAssigned {
        period_id: String,
        key: ObligationKey,
        amount: i64,
        /// Remaining period income after this assignment (cents)
        available_after: i64,
    },

    /// Obligation did not fit in its pay cycle (budget shortfall)
    ObligationDeferred {
        period_id: String,
        key: ObligationKey,
        amount: i64,
    },

    /// No schedulable income period covers the obligation's due date
    ObligationUnschedulable { key: ObligationKey, amount: i64 },

    /// Obligation carries a dismissal tombstone
    ObligationDismissed { key: ObligationKey },

    /// Locked period's assignments written through the store
    PeriodPersisted {
        period_id: String,
        assignment_count: usize,
    },

    /// Store already held assignments for a locked period; write skipped
    PersistenceConflict { period_id: String },

    /// Assignment marked paid from a recorded transaction
    PaidReconciled {
        key: ObligationKey,
        transaction_id: String,
        days_apart: i64,
    },
}

impl Event {
    /// Get event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::SourceSkipped { .. } => "SourceSkipped",
            Event::SplitApplied { .. } => "SplitApplied",
            Event::SplitRejected { .. } => "SplitRejected",
            Event::FocusDebtSelected { .. } => "FocusDebtSelected",
            Event::PeriodFrozen { .. } => "PeriodFrozen",
            Event::ObligationAssigned { .. } => "ObligationAssigned",
            Event::ObligationDeferred { .. } => "ObligationDeferred",
            Event::ObligationUnschedulable { .. } => "ObligationUnschedulable",
            Event::ObligationDismissed { .. } => "ObligationDismissed",
            Event::PeriodPersisted { .. } => "PeriodPersisted",
            Event::PersistenceConflict { .. } => "PersistenceConflict",
            Event::PaidReconciled { .. } => "PaidReconciled",
        }
    }

    /// Obligation key (if applicable)
    pub fn key(&self) -> Option<&ObligationKey> {
        match self {
            Event::SplitApplied { key, .. }
            | Event::SplitRejected { key, .. }
            | Event::ObligationAssigned { key, .. }
            | Event::ObligationDeferred { key, .. }
            | Event::ObligationUnschedulable { key, .. }
            | Event::ObligationDismissed { key }
            | Event::PaidReconciled { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Income period id (if applicable)
    pub fn period_id(&self) -> Option<&str> {
        match self {
            Event::PeriodFrozen { period_id, .. }
            | Event::ObligationAssigned { period_id, .. }
            | Event::ObligationDeferred { period_id, .. }
            | Event::PeriodPersisted { period_id, .. }
            | Event::PersistenceConflict { period_id } => Some(period_id),
            _ => None,
        }
    }
}

/// Ordered log of scheduling events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Move every event of `other` to the end of this log
    pub fn append(&mut self, other: &mut EventLog) {
        self.events.append(&mut other.events);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific obligation instance
    pub fn events_for_key(&self, key: &ObligationKey) -> Vec<&Event> {
        self.events.iter().filter(|e| e.key() == Some(key)).collect()
    }

    /// Get events for a specific income period
    pub fn events_for_period(&self, period_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.period_id() == Some(period_id))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
