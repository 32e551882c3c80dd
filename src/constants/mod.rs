// ABOUTME: Application constants for the health sync engine organized by domain
// ABOUTME: Environment variable names, bridge method names and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable names read by `EngineConfig::from_env`
pub mod env_config {
    /// Caller's own application identity
    pub const APP_IDENTITY: &str = "PIERRE_HEALTH_APP_IDENTITY";
    /// Delete window half-width in milliseconds
    pub const DELETE_TOLERANCE_MS: &str = "PIERRE_HEALTH_DELETE_TOLERANCE_MS";
    /// Comma-separated kinds watched by the background observer
    pub const OBSERVED_KINDS: &str = "PIERRE_HEALTH_OBSERVED_KINDS";
    /// Background delivery frequency for watched kinds
    pub const BACKGROUND_FREQUENCY: &str = "PIERRE_HEALTH_BACKGROUND_FREQUENCY";
    /// Calendar offset for daily buckets, in minutes east of UTC
    pub const UTC_OFFSET_MINUTES: &str = "PIERRE_HEALTH_UTC_OFFSET_MINUTES";
}

/// Defaults applied when configuration is absent
pub mod defaults {
    /// Kinds watched by the background observer
    pub const OBSERVED_KINDS: &str = "STEPS,BLOOD_GLUCOSE";
    /// Background delivery frequency
    pub const BACKGROUND_FREQUENCY: &str = "immediate";
}

/// Service identity used in logs
pub mod service_names {
    /// Service name
    pub const PIERRE_HEALTH_SYNC: &str = "pierre-health-sync";
}

/// Method names accepted by the host bridge
pub mod methods {
    /// Availability query
    pub const IS_HEALTH_DATA_AVAILABLE: &str = "isHealthDataAvailable";
    /// Combined authorization request
    pub const REQUEST_AUTHORIZATION: &str = "requestAuthorization";
    /// Generic typed read
    pub const READ: &str = "read";
    /// Typed read, host channel name
    pub const READ_HEALTH_DATA: &str = "readHealthData";
    /// Generic write
    pub const WRITE: &str = "write";
    /// Generic write, host channel name
    pub const WRITE_HEALTH_DATA: &str = "writeHealthData";
    /// Glucose write
    pub const WRITE_BLOOD_GLUCOSE: &str = "writeBloodGlucose";
    /// Insulin write
    pub const WRITE_INSULIN: &str = "writeInsulin";
    /// Generic delete
    pub const DELETE: &str = "delete";
    /// Generic delete, host channel name
    pub const DELETE_HEALTH_DATA: &str = "deleteHealthData";
    /// Glucose delete
    pub const DELETE_BLOOD_GLUCOSE: &str = "deleteBloodGlucose";
    /// Insulin delete
    pub const DELETE_INSULIN_DELIVERY: &str = "deleteInsulinDelivery";
    /// Daily steps and distance
    pub const FETCH_DAILY_ACTIVITY: &str = "fetchDailyActivity";
    /// Start observing
    pub const START_OBSERVING: &str = "startObserving";
    /// Start observing, host channel name
    pub const START_BACKGROUND_OBSERVER: &str = "startBackgroundObserver";
    /// Stop observing
    pub const STOP_OBSERVING: &str = "stopObserving";
    /// Stop observing, host channel name
    pub const STOP_BACKGROUND_OBSERVER: &str = "stopBackgroundObserver";
    /// Glucose write-permission probe
    pub const TEST_BLOOD_GLUCOSE_WRITE_PERMISSION: &str = "testBloodGlucoseWritePermission";
    /// Insulin write-permission probe
    pub const TEST_INSULIN_WRITE_PERMISSION: &str = "testInsulinWritePermission";
}

/// Argument keys of bridge method calls
pub mod arguments {
    /// Kind string
    pub const TYPE: &str = "type";
    /// Range start, epoch milliseconds
    pub const START_TIME: &str = "startTime";
    /// Range end, epoch milliseconds
    pub const END_TIME: &str = "endTime";
    /// Numeric value
    pub const VALUE: &str = "value";
    /// Glucose meal timing
    pub const MEAL_TIME: &str = "mealTime";
    /// Insulin delivery reason
    pub const REASON: &str = "reason";
    /// Delete target, epoch milliseconds
    pub const TIMESTAMP: &str = "timestamp";
}
