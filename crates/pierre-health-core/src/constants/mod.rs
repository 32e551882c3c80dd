// ABOUTME: Shared constants for the health sync engine organized by domain
// ABOUTME: Unit conversion factors, sentinel values and wire formats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Unit conversion factors
pub mod units;

/// Source name reported when a sample carries neither a name nor a bundle identifier
pub const UNKNOWN_SOURCE_NAME: &str = "Unknown";

/// Sleep category value meaning "in bed"
pub const SLEEP_IN_BED_VALUE: i64 = 0;

/// Default half-width of the delete window in milliseconds
pub const DEFAULT_DELETE_TOLERANCE_MS: i64 = 1000;

/// Widest daily activity range, in days, served by one call
pub const MAX_DAILY_ACTIVITY_DAYS: i64 = 3660;

/// Instant used by write-permission probes (2000-01-01T00:00:00Z)
pub const WRITE_PROBE_EPOCH_SECS: i64 = 946_684_800;

/// Glucose value saved by the write-permission probe, in mg/dL
pub const GLUCOSE_PROBE_VALUE: f64 = 1.0;

/// Insulin value saved by the write-permission probe, in IU
pub const INSULIN_PROBE_VALUE: f64 = 0.1;

/// Calendar day format used for daily bucket keys
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Default application identity for the ownership tier of delete resolution
pub const DEFAULT_APP_IDENTITY: &str = "com.pierre.health";
