// ABOUTME: Integration tests for the daily aggregation engine
// ABOUTME: Covers the step/distance join, unit conversion, partial failures and local-day bucketing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use pierre_health_core::constants::MAX_DAILY_ACTIVITY_DAYS;
use pierre_health_core::errors::ErrorCode;
use pierre_health_core::models::{DailyBucket, TimeRange};
use pierre_health_store::{SampleType, StoreOperation};

use common::{
    create_engine_with_config, create_test_engine, create_test_store, distance_sample,
    foreign_source, own_source, steps_sample, test_config, utc,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn assert_distance(bucket: &DailyBucket, expected_km: f64) {
    assert!(
        (bucket.distance_km - expected_km).abs() < 1e-9,
        "expected {expected_km} km on {}, got {}",
        bucket.date,
        bucket.distance_km
    );
}

// ============================================================================
// Join Semantics
// ============================================================================

#[tokio::test]
async fn test_days_present_in_one_series_are_kept() {
    let store = create_test_store();
    let day1 = utc(2024, 3, 1, 0, 0, 0);
    let day2 = utc(2024, 3, 2, 0, 0, 0);
    store
        .insert(steps_sample(4200.0, day1 + Duration::hours(9)), own_source())
        .await;
    store
        .insert(
            distance_sample(3100.0, day2 + Duration::hours(18)),
            own_source(),
        )
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(day1, day2 + Duration::days(1)).unwrap())
        .await
        .unwrap();

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].date, date(2024, 3, 1));
    assert_eq!(buckets[0].steps, 4200);
    assert_distance(&buckets[0], 0.0);
    assert_eq!(buckets[1].date, date(2024, 3, 2));
    assert_eq!(buckets[1].steps, 0);
    assert_distance(&buckets[1], 3.1);
}

#[tokio::test]
async fn test_sums_across_sources_and_converts_to_kilometers() {
    let store = create_test_store();
    let day = utc(2024, 3, 1, 0, 0, 0);
    store
        .insert(steps_sample(1000.0, day + Duration::hours(8)), own_source())
        .await;
    store
        .insert(
            steps_sample(2500.0, day + Duration::hours(12)),
            foreign_source(),
        )
        .await;
    store
        .insert(distance_sample(800.0, day + Duration::hours(8)), own_source())
        .await;
    store
        .insert(
            distance_sample(1700.0, day + Duration::hours(12)),
            foreign_source(),
        )
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(day, day + Duration::days(1)).unwrap())
        .await
        .unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].steps, 3500);
    assert_distance(&buckets[0], 2.5);
}

#[tokio::test]
async fn test_days_without_data_are_emitted_with_zeros() {
    let store = create_test_store();
    let start = utc(2024, 3, 1, 0, 0, 0);
    store
        .insert(steps_sample(500.0, start + Duration::hours(10)), own_source())
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(start, start + Duration::days(3)).unwrap())
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = buckets.iter().map(|bucket| bucket.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
    );
    assert_eq!(buckets[1].steps, 0);
    assert_eq!(buckets[2].steps, 0);
}

#[tokio::test]
async fn test_samples_outside_range_are_ignored() {
    let store = create_test_store();
    let start = utc(2024, 3, 1, 0, 0, 0);
    let end = start + Duration::days(1);
    store
        .insert(steps_sample(999.0, start - Duration::hours(1)), own_source())
        .await;
    store.insert(steps_sample(777.0, end), own_source()).await;
    store
        .insert(steps_sample(100.0, start + Duration::hours(1)), own_source())
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(start, end).unwrap())
        .await
        .unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].steps, 100);
}

// ============================================================================
// Partial Failures
// ============================================================================

#[tokio::test]
async fn test_failed_distance_query_keeps_steps() {
    let store = create_test_store();
    let day = utc(2024, 3, 1, 0, 0, 0);
    store
        .insert(steps_sample(4200.0, day + Duration::hours(9)), own_source())
        .await;
    store
        .insert(distance_sample(3000.0, day + Duration::hours(9)), own_source())
        .await;
    store
        .inject_failure(
            StoreOperation::Statistics,
            Some(SampleType::DistanceWalkingRunning),
            "Statistics unavailable",
        )
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(day, day + Duration::days(1)).unwrap())
        .await
        .unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].steps, 4200);
    assert_distance(&buckets[0], 0.0);
}

#[tokio::test]
async fn test_failed_step_query_keeps_distance() {
    let store = create_test_store();
    let day = utc(2024, 3, 1, 0, 0, 0);
    store
        .insert(distance_sample(1200.0, day + Duration::hours(9)), own_source())
        .await;
    store
        .inject_failure(
            StoreOperation::Statistics,
            Some(SampleType::StepCount),
            "Statistics unavailable",
        )
        .await;
    let engine = create_test_engine(&store);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(day, day + Duration::days(1)).unwrap())
        .await
        .unwrap();

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].steps, 0);
    assert_distance(&buckets[0], 1.2);
}

#[tokio::test]
async fn test_both_queries_failing_returns_empty() {
    let store = create_test_store();
    store
        .inject_failure(StoreOperation::Statistics, None, "Statistics unavailable")
        .await;
    let engine = create_test_engine(&store);
    let day = utc(2024, 3, 1, 0, 0, 0);

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(day, day + Duration::days(2)).unwrap())
        .await
        .unwrap();
    assert!(buckets.is_empty());
}

#[tokio::test]
async fn test_unavailable_store() {
    let store = create_test_store();
    store.set_available(false);
    let engine = create_test_engine(&store);
    let day = utc(2024, 3, 1, 0, 0, 0);

    let error = engine
        .fetch_daily_activity(TimeRange::new(day, day + Duration::days(1)).unwrap())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::Unavailable);
}

// ============================================================================
// Range Limits
// ============================================================================

#[tokio::test]
async fn test_range_at_day_limit_is_served() {
    let store = create_test_store();
    let engine = create_test_engine(&store);
    let start = utc(2000, 1, 1, 0, 0, 0);

    let buckets = engine
        .fetch_daily_activity(
            TimeRange::new(start, start + Duration::days(MAX_DAILY_ACTIVITY_DAYS)).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(buckets.len(), usize::try_from(MAX_DAILY_ACTIVITY_DAYS).unwrap());
}

#[tokio::test]
async fn test_range_beyond_day_limit_is_invalid_argument() {
    let store = create_test_store();
    let engine = create_test_engine(&store);
    let start = utc(2000, 1, 1, 0, 0, 0);

    let error = engine
        .fetch_daily_activity(
            TimeRange::new(
                start,
                start + Duration::days(MAX_DAILY_ACTIVITY_DAYS) + Duration::hours(1),
            )
            .unwrap(),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidArgument);
}

#[tokio::test]
async fn test_unrepresentable_local_day_is_invalid_argument() {
    let store = create_test_store();
    let mut config = test_config();
    config.utc_offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let engine = create_engine_with_config(&store, &config);
    let earliest = DateTime::<Utc>::MIN_UTC;

    let error = engine
        .fetch_daily_activity(TimeRange::new(earliest, earliest + Duration::hours(1)).unwrap())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidArgument);
}

#[tokio::test]
async fn test_range_ending_at_latest_instant_is_served() {
    let store = create_test_store();
    let engine = create_test_engine(&store);
    let latest = DateTime::<Utc>::MAX_UTC;

    let buckets = engine
        .fetch_daily_activity(TimeRange::new(latest - Duration::hours(1), latest).unwrap())
        .await
        .unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].date, latest.date_naive());
}

// ============================================================================
// Local Calendar
// ============================================================================

#[tokio::test]
async fn test_days_follow_configured_offset() {
    let store = create_test_store();
    let mut config = test_config();
    // UTC-05:00
    config.utc_offset = FixedOffset::west_opt(5 * 3600).unwrap();

    // 2024-03-01 23:30 local
    store
        .insert(steps_sample(300.0, utc(2024, 3, 2, 4, 30, 0)), own_source())
        .await;
    // 2024-03-02 00:30 local
    store
        .insert(steps_sample(700.0, utc(2024, 3, 2, 5, 30, 0)), own_source())
        .await;
    let engine = create_engine_with_config(&store, &config);

    let local_midnight = utc(2024, 3, 1, 5, 0, 0);
    let buckets = engine
        .fetch_daily_activity(
            TimeRange::new(local_midnight, local_midnight + Duration::days(2)).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].date, date(2024, 3, 1));
    assert_eq!(buckets[0].steps, 300);
    assert_eq!(buckets[1].date, date(2024, 3, 2));
    assert_eq!(buckets[1].steps, 700);
}

#[tokio::test]
async fn test_bucket_serializes_with_camel_case_fields() {
    let bucket = DailyBucket {
        date: date(2024, 3, 1),
        steps: 4200,
        distance_km: 3.1,
    };
    let json = serde_json::to_value(&bucket).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"date": "2024-03-01", "steps": 4200, "distanceKm": 3.1})
    );
}
