// ABOUTME: Integration tests for the typed read dispatcher
// ABOUTME: Covers window selection, ordering, unit conversion, metadata, categories and workouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use pierre_health_core::errors::ErrorCode;
use pierre_health_core::models::{
    HealthRecord, InsulinDeliveryReason, MealTime, SampleKind, TimeRange,
};
use pierre_health_core::units::HealthUnit;
use pierre_health_store::{
    MetadataKey, MetadataValue, NewSample, Quantity, SampleType, SourceRevision, StoreOperation,
    WorkoutData,
};

use common::{
    create_test_engine, create_test_store, foreign_source, glucose_sample, own_source,
    sleep_sample, utc, workout_sample,
};

fn quantity(record: &HealthRecord) -> &pierre_health_core::models::QuantityRecord {
    match record {
        HealthRecord::Quantity(record) => record,
        other => panic!("expected quantity record, got {other:?}"),
    }
}

// ============================================================================
// Window Selection
// ============================================================================

#[tokio::test]
async fn test_read_returns_only_samples_in_range_newest_first() {
    let store = create_test_store();
    let start = utc(2024, 3, 1, 0, 0, 0);
    let end = utc(2024, 3, 2, 0, 0, 0);

    for (value, at) in [
        (90.0, start - Duration::seconds(1)),
        (100.0, start),
        (110.0, start + Duration::hours(6)),
        (120.0, start + Duration::hours(12)),
        (130.0, end),
    ] {
        store.insert(glucose_sample(value, at), own_source()).await;
    }
    let engine = create_test_engine(&store);

    let records = engine
        .read(SampleKind::BloodGlucose, TimeRange::new(start, end).unwrap())
        .await
        .unwrap();

    let values: Vec<i64> = records.iter().map(|r| quantity(r).value as i64).collect();
    assert_eq!(values, vec![120, 110, 100]);
    assert!(records
        .iter()
        .all(|r| r.start_time() >= start && r.start_time() < end));
}

#[tokio::test]
async fn test_empty_window_returns_empty() {
    let store = create_test_store();
    let engine = create_test_engine(&store);
    let at = utc(2024, 3, 1, 8, 0, 0);

    let records = engine
        .read(SampleKind::Steps, TimeRange::new(at, at).unwrap())
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_range_rejects_start_after_end() {
    let error = TimeRange::new(utc(2024, 3, 2, 0, 0, 0), utc(2024, 3, 1, 0, 0, 0)).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidArgument);

    let error = TimeRange::from_millis(f64::NAN, 0.0).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidArgument);
}

#[test]
fn test_unknown_kind_is_invalid_type() {
    let error = "HEART_RATE".parse::<SampleKind>().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidType);
    assert_eq!(error.message, "Unsupported type: HEART_RATE");

    assert_eq!(
        "glucose".parse::<SampleKind>().unwrap(),
        SampleKind::BloodGlucose
    );
    assert_eq!(
        "MENSTRUATION".parse::<SampleKind>().unwrap(),
        SampleKind::MenstrualFlow
    );
}

// ============================================================================
// Quantity Kinds
// ============================================================================

#[tokio::test]
async fn test_glucose_converted_to_mg_dl_with_meal_time() {
    let store = create_test_store();
    let at = utc(2024, 3, 1, 8, 0, 0);
    let sample = NewSample::quantity(
        SampleType::BloodGlucose,
        Quantity::new(5.5, HealthUnit::MillimolesPerLiter),
        at,
        at,
    )
    .with_metadata(MetadataKey::BloodGlucoseMealTime, MetadataValue::Integer(2));
    store.insert(sample, foreign_source()).await;
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::BloodGlucose,
            TimeRange::new(at, at + Duration::minutes(1)).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = quantity(&records[0]);
    assert!((record.value - 99.085_734).abs() < 1e-3);
    assert_eq!(record.unit, "mg/dL");
    assert_eq!(record.meal_time, Some(MealTime::Postprandial));
    assert_eq!(record.reason, None);
    assert_eq!(record.data_source, "Glucometer");
}

#[tokio::test]
async fn test_insulin_reason_decoded() {
    let store = create_test_store();
    let at = utc(2024, 3, 1, 12, 0, 0);
    let sample = NewSample::quantity(
        SampleType::InsulinDelivery,
        Quantity::new(4.0, HealthUnit::InternationalUnit),
        at,
        at,
    )
    .with_metadata(MetadataKey::InsulinDeliveryReason, MetadataValue::Integer(1));
    store.insert(sample, own_source()).await;
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::InsulinDelivery,
            TimeRange::new(at, at + Duration::seconds(1)).unwrap(),
        )
        .await
        .unwrap();

    let record = quantity(&records[0]);
    assert_eq!(record.unit, "IU");
    assert_eq!(record.reason, Some(InsulinDeliveryReason::Basal));
    assert_eq!(record.meal_time, None);
}

#[tokio::test]
async fn test_weight_and_water_units() {
    let store = create_test_store();
    let at = utc(2024, 3, 1, 7, 0, 0);
    store
        .insert(
            NewSample::quantity(
                SampleType::BodyMass,
                Quantity::new(154.0, HealthUnit::Pound),
                at,
                at,
            ),
            own_source(),
        )
        .await;
    store
        .insert(
            NewSample::quantity(
                SampleType::DietaryWater,
                Quantity::new(0.5, HealthUnit::Liter),
                at,
                at,
            ),
            own_source(),
        )
        .await;
    let engine = create_test_engine(&store);
    let range = TimeRange::new(at, at + Duration::hours(1)).unwrap();

    let weight = engine.read(SampleKind::Weight, range).await.unwrap();
    let weight = quantity(&weight[0]);
    assert_eq!(weight.unit, "kg");
    assert!((weight.value - 69.853_225).abs() < 1e-4);

    let water = engine.read(SampleKind::Water, range).await.unwrap();
    let water = quantity(&water[0]);
    assert_eq!(water.unit, "mL");
    assert!((water.value - 500.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_source_name_fallbacks() {
    let store = create_test_store();
    let at = utc(2024, 3, 1, 9, 0, 0);
    store
        .insert(
            glucose_sample(100.0, at),
            SourceRevision::from_bundle("com.vendor.meter"),
        )
        .await;
    store
        .insert(
            glucose_sample(101.0, at + Duration::minutes(1)),
            SourceRevision::default(),
        )
        .await;
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::BloodGlucose,
            TimeRange::new(at, at + Duration::hours(1)).unwrap(),
        )
        .await
        .unwrap();

    let sources: Vec<&str> = records.iter().map(HealthRecord::data_source).collect();
    assert_eq!(sources, vec!["Unknown", "com.vendor.meter"]);
}

// ============================================================================
// Category Kinds
// ============================================================================

#[tokio::test]
async fn test_sleep_keeps_only_in_bed_samples() {
    let store = create_test_store();
    let night = utc(2024, 3, 1, 22, 0, 0);
    for (offset, value) in [(0, 0), (1, 1), (2, 2), (3, 0)] {
        let start = night + Duration::hours(offset);
        store
            .insert(
                sleep_sample(value, start, start + Duration::minutes(50)),
                own_source(),
            )
            .await;
    }
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::Sleep,
            TimeRange::new(night, night + Duration::hours(8)).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    for record in &records {
        match record {
            HealthRecord::Category(category) => assert_eq!(category.value, 0),
            other => panic!("expected category record, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_menstrual_flow_keeps_raw_values() {
    let store = create_test_store();
    let day = utc(2024, 3, 1, 0, 0, 0);
    for (offset, value) in [(0, 2), (1, 3)] {
        let start = day + Duration::days(offset);
        store
            .insert(
                NewSample::category(
                    SampleType::MenstrualFlow,
                    value,
                    start,
                    start + Duration::days(1),
                ),
                own_source(),
            )
            .await;
    }
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::MenstrualFlow,
            TimeRange::new(day, day + Duration::days(2)).unwrap(),
        )
        .await
        .unwrap();

    let values: Vec<i64> = records
        .iter()
        .map(|record| match record {
            HealthRecord::Category(category) => category.value,
            other => panic!("expected category record, got {other:?}"),
        })
        .collect();
    assert_eq!(values, vec![3, 2]);
}

// ============================================================================
// Workouts
// ============================================================================

#[tokio::test]
async fn test_workout_totals_default_to_zero() {
    let store = create_test_store();
    let start = utc(2024, 3, 1, 17, 0, 0);
    let end = start + Duration::minutes(45);
    store
        .insert(workout_sample(37, start, end), own_source())
        .await;
    let engine = create_test_engine(&store);

    let records = engine
        .read(
            SampleKind::Workout,
            TimeRange::new(start, start + Duration::hours(1)).unwrap(),
        )
        .await
        .unwrap();

    match &records[0] {
        HealthRecord::Workout(workout) => {
            assert_eq!(workout.workout_activity_type, 37);
            assert!((workout.duration - 2700.0).abs() < f64::EPSILON);
            assert!(workout.total_energy_burned.abs() < f64::EPSILON);
            assert!(workout.total_distance.abs() < f64::EPSILON);
            assert_eq!(workout.data_source, "Pierre Health");
        }
        other => panic!("expected workout record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_workout_distance_in_meters() {
    let store = create_test_store();
    let start = utc(2024, 3, 1, 6, 0, 0);
    let end = start + Duration::minutes(30);
    store
        .insert(
            NewSample::workout(
                WorkoutData {
                    activity_type: 52,
                    duration_secs: 1800.0,
                    total_energy_burned: Some(Quantity::new(320.0, HealthUnit::Kilocalorie)),
                    total_distance: Some(Quantity::new(5.2, HealthUnit::Kilometer)),
                },
                start,
                end,
            ),
            foreign_source(),
        )
        .await;
    let engine = create_test_engine(&store);

    let records = engine
        .read(SampleKind::Workout, TimeRange::new(start, end).unwrap())
        .await
        .unwrap();

    match &records[0] {
        HealthRecord::Workout(workout) => {
            assert!((workout.total_energy_burned - 320.0).abs() < 1e-9);
            assert!((workout.total_distance - 5200.0).abs() < 1e-9);
        }
        other => panic!("expected workout record, got {other:?}"),
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_store_failure_is_query_error() {
    let store = create_test_store();
    store
        .inject_failure(
            StoreOperation::Query,
            Some(SampleType::StepCount),
            "Protected data is unavailable while the device is locked",
        )
        .await;
    let engine = create_test_engine(&store);
    let at = utc(2024, 3, 1, 0, 0, 0);

    let error = engine
        .read(
            SampleKind::Steps,
            TimeRange::new(at, at + Duration::days(1)).unwrap(),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::QueryError);
    assert!(error
        .message
        .contains("Protected data is unavailable while the device is locked"));

    // Other kinds are unaffected
    assert!(engine
        .read(
            SampleKind::BloodGlucose,
            TimeRange::new(at, at + Duration::days(1)).unwrap(),
        )
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unavailable_store() {
    let store = create_test_store();
    store.set_available(false);
    let engine = create_test_engine(&store);
    let at = utc(2024, 3, 1, 0, 0, 0);

    let error = engine
        .read(SampleKind::Steps, TimeRange::new(at, at).unwrap())
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::Unavailable);
}
