//! Schedule snapshot
//!
//! Captures the outcome of a pass (assignments and unassigned keys) in a
//! serializable form with a SHA-256 fingerprint. Two passes over identical
//! input produce equal fingerprints; the per-run id and the event log are
//! not part of the snapshot.
//!
//! # Critical Invariants
//!
//! - **Determinism**: Same input produces the same fingerprint
//! - **Integrity**: An obligation key appears at most once across
//!   assignments, and never both assigned and unassigned

use crate::config::HouseholdConfig;
use crate::models::assignment::ScheduledAssignment;
use crate::models::obligation::ObligationKey;
use crate::scheduler::engine::ScheduleResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while capturing or checking a snapshot
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),

    #[error("Fingerprint mismatch: expected {expected}, computed {computed}")]
    FingerprintMismatch { expected: String, computed: String },

    #[error("Obligation {0} is assigned more than once")]
    DuplicateAssignment(ObligationKey),

    #[error("Obligation {0} is both assigned and unassigned")]
    AssignedAndUnassigned(ObligationKey),
}

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Serializable outcome of a scheduling pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub household_id: String,
    pub today: chrono::NaiveDate,
    pub assignments: Vec<ScheduledAssignment>,
    pub unassigned: Vec<ObligationKey>,
    /// SHA-256 over the canonical JSON of the fields above
    pub fingerprint: String,
}

#[derive(Serialize)]
struct SnapshotBody<'a> {
    household_id: &'a str,
    today: chrono::NaiveDate,
    assignments: &'a [ScheduledAssignment],
    unassigned: &'a [ObligationKey],
}

impl ScheduleSnapshot {
    /// Snapshot a pass
    pub fn capture(config: &HouseholdConfig, result: &ScheduleResult) -> Result<Self, SnapshotError> {
        let unassigned: Vec<ObligationKey> = result.unassigned.iter().map(|o| o.key()).collect();
        let fingerprint = compute_fingerprint(
            &result.household_id,
            config.today,
            &result.assignments,
            &unassigned,
        )?;
        Ok(Self {
            household_id: result.household_id.clone(),
            today: config.today,
            assignments: result.assignments.clone(),
            unassigned,
            fingerprint,
        })
    }

    /// Recompute the fingerprint and check the key invariants
    pub fn verify(&self) -> Result<(), SnapshotError> {
        let computed = compute_fingerprint(
            &self.household_id,
            self.today,
            &self.assignments,
            &self.unassigned,
        )?;
        if computed != self.fingerprint {
            return Err(SnapshotError::FingerprintMismatch {
                expected: self.fingerprint.clone(),
                computed,
            });
        }

        let mut assigned = HashSet::new();
        for assignment in &self.assignments {
            let key = assignment.key();
            if !assigned.insert(key.clone()) {
                return Err(SnapshotError::DuplicateAssignment(key));
            }
        }
        if let Some(key) = self.unassigned.iter().find(|k| assigned.contains(*k)) {
            return Err(SnapshotError::AssignedAndUnassigned(key.clone()));
        }
        Ok(())
    }
}

// ============================================================================
// Fingerprint
// ============================================================================

/// Deterministic SHA-256 of a schedule outcome
///
/// Every serialized collection is a `Vec` or a struct, so serde_json output
/// is already canonical.
pub fn compute_fingerprint(
    household_id: &str,
    today: chrono::NaiveDate,
    assignments: &[ScheduledAssignment],
    unassigned: &[ObligationKey],
) -> Result<String, SnapshotError> {
    let body = SnapshotBody {
        household_id,
        today,
        assignments,
        unassigned,
    };
    let json =
        serde_json::to_string(&body).map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
