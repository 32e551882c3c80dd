// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, in-memory store and engine fixtures, and sample builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_health_sync`

use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use pierre_health_core::models::SampleKind;
use pierre_health_core::units::HealthUnit;
use pierre_health_store::{
    BackgroundDeliveryFrequency, HealthStore, InMemoryHealthStore, NewSample, Quantity,
    SampleType, SourceRevision, WorkoutData,
};
use pierre_health_sync::bridge::HealthBridge;
use pierre_health_sync::config::EngineConfig;
use pierre_health_sync::engine::HealthSyncEngine;

/// Bundle identifier of the application under test
pub const APP_ID: &str = "com.pierre.health";

/// Bundle identifier of another application writing to the same store
pub const FOREIGN_APP_ID: &str = "com.vendor.glucometer";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// UTC instant from calendar fields
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// Epoch milliseconds of an instant, as the host sends them
pub fn millis(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64
}

/// Configuration with a UTC calendar and the test app identity
pub fn test_config() -> EngineConfig {
    EngineConfig {
        app_identity: APP_ID.to_owned(),
        delete_tolerance: Duration::milliseconds(1000),
        observed_kinds: vec![SampleKind::Steps, SampleKind::BloodGlucose],
        background_frequency: BackgroundDeliveryFrequency::Immediate,
        utc_offset: FixedOffset::east_opt(0).unwrap(),
    }
}

/// Empty in-memory store owned by the test app
pub fn create_test_store() -> Arc<InMemoryHealthStore> {
    init_test_logging();
    Arc::new(InMemoryHealthStore::with_app_identity(APP_ID))
}

/// Engine over `store` with the test configuration
pub fn create_test_engine(store: &Arc<InMemoryHealthStore>) -> HealthSyncEngine {
    create_engine_with_config(store, &test_config())
}

/// Engine over `store` with a custom configuration
pub fn create_engine_with_config(
    store: &Arc<InMemoryHealthStore>,
    config: &EngineConfig,
) -> HealthSyncEngine {
    let shared: Arc<dyn HealthStore> = store.clone();
    HealthSyncEngine::new(shared, config)
}

/// Bridge over `store` with the test configuration
pub fn create_test_bridge(store: &Arc<InMemoryHealthStore>) -> HealthBridge {
    HealthBridge::new(Arc::new(create_test_engine(store)))
}

/// Source of another application
pub fn foreign_source() -> SourceRevision {
    SourceRevision::new("Glucometer", FOREIGN_APP_ID)
}

/// Source of the application under test
pub fn own_source() -> SourceRevision {
    SourceRevision::new("Pierre Health", APP_ID)
}

/// Instantaneous glucose sample in mg/dL
pub fn glucose_sample(mg_dl: f64, at: DateTime<Utc>) -> NewSample {
    NewSample::quantity(
        SampleType::BloodGlucose,
        Quantity::new(mg_dl, HealthUnit::MilligramsPerDeciliter),
        at,
        at,
    )
}

/// Step count sample over one minute starting at `at`
pub fn steps_sample(count: f64, at: DateTime<Utc>) -> NewSample {
    NewSample::quantity(
        SampleType::StepCount,
        Quantity::new(count, HealthUnit::Count),
        at,
        at + Duration::minutes(1),
    )
}

/// Walking distance sample in meters over one minute starting at `at`
pub fn distance_sample(meters: f64, at: DateTime<Utc>) -> NewSample {
    NewSample::quantity(
        SampleType::DistanceWalkingRunning,
        Quantity::new(meters, HealthUnit::Meter),
        at,
        at + Duration::minutes(1),
    )
}

/// Sleep analysis sample with a raw category value
pub fn sleep_sample(value: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> NewSample {
    NewSample::category(SampleType::SleepAnalysis, value, start, end)
}

/// Workout session without energy or distance totals
pub fn workout_sample(activity_type: u32, start: DateTime<Utc>, end: DateTime<Utc>) -> NewSample {
    let duration_secs = (end - start).num_seconds() as f64;
    NewSample::workout(
        WorkoutData {
            activity_type,
            duration_secs,
            total_energy_burned: None,
            total_distance: None,
        },
        start,
        end,
    )
}
