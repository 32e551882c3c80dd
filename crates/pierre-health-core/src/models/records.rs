// ABOUTME: Caller-facing read records for quantity, workout and category samples
// ABOUTME: Serialized in the host channel shape with epoch-millisecond instants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::kind::{InsulinDeliveryReason, MealTime};

/// A point-quantity sample converted to its kind's read unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityRecord {
    /// Value in `unit`
    pub value: f64,
    /// Sample start
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    /// Sample end
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    /// Unit string
    pub unit: String,
    /// Resolved source name
    pub data_source: String,
    /// Meal timing, glucose only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_time: Option<MealTime>,
    /// Delivery reason, insulin only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<InsulinDeliveryReason>,
}

/// A workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    /// Session start
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    /// Session end
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    /// Store activity-type code
    pub workout_activity_type: u32,
    /// Duration in seconds
    pub duration: f64,
    /// Energy in kcal, 0 when the store has none
    pub total_energy_burned: f64,
    /// Distance in meters, 0 when the store has none
    pub total_distance: f64,
    /// Resolved source name
    pub data_source: String,
}

/// A categorical sample with its raw category code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    /// Sample start
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    /// Sample end
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    /// Raw category value
    pub value: i64,
    /// Resolved source name
    pub data_source: String,
}

/// Any record returned by a typed read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthRecord {
    /// Workout session
    Workout(WorkoutRecord),
    /// Point quantity
    Quantity(QuantityRecord),
    /// Category sample
    Category(CategoryRecord),
}

impl HealthRecord {
    /// Start instant of the underlying sample
    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        match self {
            Self::Workout(record) => record.start_time,
            Self::Quantity(record) => record.start_time,
            Self::Category(record) => record.start_time,
        }
    }

    /// Resolved source name of the underlying sample
    #[must_use]
    pub fn data_source(&self) -> &str {
        match self {
            Self::Workout(record) => &record.data_source,
            Self::Quantity(record) => &record.data_source,
            Self::Category(record) => &record.data_source,
        }
    }
}

/// Steps and distance summed over one local calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    /// Local calendar day, serialized `YYYY-MM-DD`
    pub date: NaiveDate,
    /// Step total
    pub steps: i64,
    /// Distance total in kilometers
    pub distance_km: f64,
}
