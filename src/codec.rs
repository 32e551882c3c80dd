// ABOUTME: Record codec between caller-facing kinds/records and the store-native sample model
// ABOUTME: Maps kinds to store types, resolves source names, decodes records and metadata tags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Record Codec
//!
//! Pure conversion functions with no store access. Every other component
//! goes through this module to translate between [`SampleKind`] and
//! [`SampleType`], to turn [`StoredSample`]s into caller records, and to map
//! store failures into the verb-specific [`ErrorCode`].

use pierre_health_core::constants::UNKNOWN_SOURCE_NAME;
use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::{
    CategoryRecord, HealthRecord, InsulinDeliveryReason, KindCategory, MealTime, QuantityRecord,
    SampleKind, WorkoutRecord,
};
use pierre_health_core::units::HealthUnit;
use pierre_health_store::{
    MetadataKey, MetadataValue, Quantity, SampleType, SourceRevision, StoreError, StoredSample,
};

/// Store type backing a kind
#[must_use]
pub const fn sample_type_for(kind: SampleKind) -> SampleType {
    match kind {
        SampleKind::BloodGlucose => SampleType::BloodGlucose,
        SampleKind::InsulinDelivery => SampleType::InsulinDelivery,
        SampleKind::Steps => SampleType::StepCount,
        SampleKind::Distance => SampleType::DistanceWalkingRunning,
        SampleKind::Weight => SampleType::BodyMass,
        SampleKind::Water => SampleType::DietaryWater,
        SampleKind::Sleep => SampleType::SleepAnalysis,
        SampleKind::MenstrualFlow => SampleType::MenstrualFlow,
        SampleKind::Mindfulness => SampleType::MindfulSession,
        SampleKind::Workout => SampleType::Workout,
    }
}

/// Kind exposed for a store type
#[must_use]
pub const fn kind_for(sample_type: SampleType) -> SampleKind {
    match sample_type {
        SampleType::BloodGlucose => SampleKind::BloodGlucose,
        SampleType::InsulinDelivery => SampleKind::InsulinDelivery,
        SampleType::StepCount => SampleKind::Steps,
        SampleType::DistanceWalkingRunning => SampleKind::Distance,
        SampleType::BodyMass => SampleKind::Weight,
        SampleType::DietaryWater => SampleKind::Water,
        SampleType::SleepAnalysis => SampleKind::Sleep,
        SampleType::MenstrualFlow => SampleKind::MenstrualFlow,
        SampleType::MindfulSession => SampleKind::Mindfulness,
        SampleType::Workout => SampleKind::Workout,
    }
}

/// Display name of a sample's producer: name, then bundle identifier, then "Unknown"
#[must_use]
pub fn resolve_source_name(source: &SourceRevision) -> String {
    source
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            source
                .bundle_identifier
                .as_deref()
                .filter(|bundle| !bundle.is_empty())
        })
        .unwrap_or(UNKNOWN_SOURCE_NAME)
        .to_owned()
}

/// Map a store failure to `code`, keeping the store message verbatim
///
/// A store reporting itself unavailable always maps to `Unavailable`.
#[must_use]
pub fn store_error(code: ErrorCode, error: StoreError) -> AppError {
    if matches!(error, StoreError::Unavailable) {
        return AppError::unavailable().with_source(error);
    }
    AppError::new(code, error.to_string()).with_source(error)
}

/// Metadata entry tagging a glucose reading with its meal timing
#[must_use]
pub const fn meal_time_metadata(meal_time: MealTime) -> (MetadataKey, MetadataValue) {
    (
        MetadataKey::BloodGlucoseMealTime,
        MetadataValue::Integer(meal_time.raw_value()),
    )
}

/// Metadata entry tagging an insulin dose with its delivery reason
#[must_use]
pub const fn delivery_reason_metadata(
    reason: InsulinDeliveryReason,
) -> (MetadataKey, MetadataValue) {
    (
        MetadataKey::InsulinDeliveryReason,
        MetadataValue::Integer(reason.raw_value()),
    )
}

/// Meal timing tag of a sample, if present and recognized
#[must_use]
pub fn decode_meal_time(sample: &StoredSample) -> Option<MealTime> {
    sample
        .metadata_integer(MetadataKey::BloodGlucoseMealTime)
        .and_then(MealTime::from_raw)
}

/// Delivery reason tag of a sample, if present and recognized
#[must_use]
pub fn decode_delivery_reason(sample: &StoredSample) -> Option<InsulinDeliveryReason> {
    sample
        .metadata_integer(MetadataKey::InsulinDeliveryReason)
        .and_then(InsulinDeliveryReason::from_raw)
}

fn unexpected_payload(sample: &StoredSample, expected: &str) -> AppError {
    AppError::query(format!(
        "Sample {} of type {} has no {expected} payload",
        sample.handle, sample.sample_type
    ))
}

fn quantity_in(quantity: &Quantity, unit: HealthUnit) -> AppResult<f64> {
    quantity
        .value_in(unit)
        .map_err(|e| store_error(ErrorCode::QueryError, e))
}

/// Decode a point-quantity sample in the kind's read unit
///
/// # Errors
///
/// Returns `QueryError` when the sample has no quantity or cannot be
/// expressed in the read unit
pub fn decode_quantity(kind: SampleKind, sample: &StoredSample) -> AppResult<QuantityRecord> {
    let unit = kind
        .read_unit()
        .ok_or_else(|| AppError::invalid_type(kind.identifier()))?;
    let quantity = sample
        .quantity()
        .ok_or_else(|| unexpected_payload(sample, "quantity"))?;

    let (meal_time, reason) = match kind {
        SampleKind::BloodGlucose => (decode_meal_time(sample), None),
        SampleKind::InsulinDelivery => (None, decode_delivery_reason(sample)),
        _ => (None, None),
    };

    Ok(QuantityRecord {
        value: quantity_in(quantity, unit)?,
        start_time: sample.start,
        end_time: sample.end,
        unit: unit.unit_string().to_owned(),
        data_source: resolve_source_name(&sample.source),
        meal_time,
        reason,
    })
}

/// Decode a workout session; absent energy and distance become 0
///
/// # Errors
///
/// Returns `QueryError` when the sample has no workout payload or its totals
/// cannot be expressed in kcal and meters
pub fn decode_workout(sample: &StoredSample) -> AppResult<WorkoutRecord> {
    let workout = sample
        .workout()
        .ok_or_else(|| unexpected_payload(sample, "workout"))?;

    let total_energy_burned = workout
        .total_energy_burned
        .as_ref()
        .map(|energy| quantity_in(energy, HealthUnit::Kilocalorie))
        .transpose()?
        .unwrap_or(0.0);
    let total_distance = workout
        .total_distance
        .as_ref()
        .map(|distance| quantity_in(distance, HealthUnit::Meter))
        .transpose()?
        .unwrap_or(0.0);

    Ok(WorkoutRecord {
        start_time: sample.start,
        end_time: sample.end,
        workout_activity_type: workout.activity_type,
        duration: workout.duration_secs,
        total_energy_burned,
        total_distance,
        data_source: resolve_source_name(&sample.source),
    })
}

/// Decode a categorical sample with its raw value
///
/// # Errors
///
/// Returns `QueryError` when the sample has no category payload
pub fn decode_category(sample: &StoredSample) -> AppResult<CategoryRecord> {
    let value = sample
        .category_value()
        .ok_or_else(|| unexpected_payload(sample, "category"))?;
    Ok(CategoryRecord {
        start_time: sample.start,
        end_time: sample.end,
        value,
        data_source: resolve_source_name(&sample.source),
    })
}

/// Decode a sample according to the query shape of `kind`
///
/// # Errors
///
/// Propagates the errors of the shape-specific decoders
pub fn decode(kind: SampleKind, sample: &StoredSample) -> AppResult<HealthRecord> {
    match kind.category() {
        KindCategory::Quantity => decode_quantity(kind, sample).map(HealthRecord::Quantity),
        KindCategory::Workout => decode_workout(sample).map(HealthRecord::Workout),
        KindCategory::Category => decode_category(sample).map(HealthRecord::Category),
    }
}
