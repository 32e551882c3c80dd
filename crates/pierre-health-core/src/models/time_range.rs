// ABOUTME: Validated time ranges and millisecond instant conversion
// ABOUTME: Converts epoch-millisecond caller input into UTC instants before any store call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::units::MS_PER_SECOND;
use crate::errors::{AppError, AppResult};

const NANOS_PER_MILLI: f64 = 1_000_000.0;
const MAX_SUBSEC_NANOS: u32 = 999_999_999;

/// Convert epoch milliseconds into an instant, keeping sub-millisecond precision
///
/// # Errors
///
/// Returns `InvalidArgument` when the value is not finite or out of range
pub fn datetime_from_millis(ms: f64) -> AppResult<DateTime<Utc>> {
    if !ms.is_finite() {
        return Err(AppError::invalid_argument(format!(
            "Invalid timestamp: {ms}"
        )));
    }
    let millis_per_second = MS_PER_SECOND as f64;
    let secs = (ms / millis_per_second).floor();
    let remainder_ms = secs.mul_add(-millis_per_second, ms);
    let nanos = ((remainder_ms * NANOS_PER_MILLI).round() as u32).min(MAX_SUBSEC_NANOS);
    DateTime::from_timestamp(secs as i64, nanos)
        .ok_or_else(|| AppError::invalid_argument(format!("Timestamp out of range: {ms}")))
}

/// Query interval `[start, end)` with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting `start > end`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `start` is after `end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start > end {
            return Err(AppError::invalid_argument(format!(
                "Start time {start} is after end time {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Build a range from epoch milliseconds
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for non-finite instants or `start > end`
    pub fn from_millis(start_ms: f64, end_ms: f64) -> AppResult<Self> {
        Self::new(datetime_from_millis(start_ms)?, datetime_from_millis(end_ms)?)
    }

    /// Whether an instant lies in `[start, end)`
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}
