//! Core calendar primitives

pub mod time;

pub use time::{clamp_day_of_month, local_today, shift_days, shift_months, Frequency};
