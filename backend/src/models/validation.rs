//! Per-record input validation
//!
//! A record that fails validation is skipped by the projector or the
//! materializer. The rest of the run continues.

use thiserror::Error;

/// Malformed amount, date or frequency on a single source record
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be positive, got {value}")]
    NonPositiveAmount { field: &'static str, value: i64 },

    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: i64 },

    #[error("due day of month must be within 1..=31, got {0}")]
    InvalidDueDay(u32),

    #[error("annual rate must be a finite, non-negative percentage, got {0}")]
    InvalidRate(f64),

    #[error("record id must not be empty")]
    EmptyId,
}

pub(crate) fn require_positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount { field, value })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeAmount { field, value })
    }
}

pub(crate) fn require_due_day(day: u32) -> Result<(), ValidationError> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDueDay(day))
    }
}

pub(crate) fn require_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidRate(rate))
    }
}

pub(crate) fn require_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        Err(ValidationError::EmptyId)
    } else {
        Ok(())
    }
}
