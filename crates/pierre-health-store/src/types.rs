// ABOUTME: Store-native sample model: sample types, quantities, metadata and source revisions
// ABOUTME: Weakly typed records as the health store holds them, with no stable caller-side key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use pierre_health_core::units::HealthUnit;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

/// Sample types known to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    /// Blood glucose quantity
    BloodGlucose,
    /// Insulin delivery quantity
    InsulinDelivery,
    /// Step count quantity
    StepCount,
    /// Walking and running distance quantity
    DistanceWalkingRunning,
    /// Body mass quantity
    BodyMass,
    /// Dietary water quantity
    DietaryWater,
    /// Sleep analysis category
    SleepAnalysis,
    /// Menstrual flow category
    MenstrualFlow,
    /// Mindful session category
    MindfulSession,
    /// Workout sessions
    Workout,
}

impl SampleType {
    /// Unit quantities of this type are stored in; `None` for non-quantity types
    #[must_use]
    pub const fn canonical_unit(self) -> Option<HealthUnit> {
        match self {
            Self::BloodGlucose => Some(HealthUnit::MilligramsPerDeciliter),
            Self::InsulinDelivery => Some(HealthUnit::InternationalUnit),
            Self::StepCount => Some(HealthUnit::Count),
            Self::DistanceWalkingRunning => Some(HealthUnit::Meter),
            Self::BodyMass => Some(HealthUnit::Kilogram),
            Self::DietaryWater => Some(HealthUnit::Milliliter),
            Self::SleepAnalysis | Self::MenstrualFlow | Self::MindfulSession | Self::Workout => {
                None
            }
        }
    }

    /// Whether samples of this type carry a category code
    #[must_use]
    pub const fn is_category(self) -> bool {
        matches!(
            self,
            Self::SleepAnalysis | Self::MenstrualFlow | Self::MindfulSession
        )
    }

    /// Store identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BloodGlucose => "blood_glucose",
            Self::InsulinDelivery => "insulin_delivery",
            Self::StepCount => "step_count",
            Self::DistanceWalkingRunning => "distance_walking_running",
            Self::BodyMass => "body_mass",
            Self::DietaryWater => "dietary_water",
            Self::SleepAnalysis => "sleep_analysis",
            Self::MenstrualFlow => "menstrual_flow",
            Self::MindfulSession => "mindful_session",
            Self::Workout => "workout",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store operation, used to tag backend failures and injected faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    /// Authorization request
    Authorization,
    /// Sample query
    Query,
    /// Sample save
    Save,
    /// Sample deletion
    Delete,
    /// Statistics collection query
    Statistics,
    /// Observer registration
    Observe,
    /// Background delivery enablement
    BackgroundDelivery,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::Query => "query",
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Statistics => "statistics",
            Self::Observe => "observe",
            Self::BackgroundDelivery => "background_delivery",
        };
        f.write_str(name)
    }
}

/// Opaque store-assigned handle of a saved sample
///
/// Handles are only meaningful to the store that issued them; callers never
/// learn the handle of a sample they wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleHandle(Uuid);

impl SampleHandle {
    /// Allocate a fresh handle
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SampleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Application or device that produced a sample
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRevision {
    /// Device-declared display name
    #[serde(default)]
    pub name: Option<String>,
    /// Bundle identifier of the producing application
    #[serde(default)]
    pub bundle_identifier: Option<String>,
}

impl SourceRevision {
    /// Source with both a display name and a bundle identifier
    #[must_use]
    pub fn new(name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            bundle_identifier: Some(bundle_identifier.into()),
        }
    }

    /// Source known only by bundle identifier
    #[must_use]
    pub fn from_bundle(bundle_identifier: impl Into<String>) -> Self {
        Self {
            name: None,
            bundle_identifier: Some(bundle_identifier.into()),
        }
    }
}

/// Unit-tagged numeric value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Numeric value
    pub value: f64,
    /// Unit of `value`
    pub unit: HealthUnit,
}

impl Quantity {
    /// Create a quantity
    #[must_use]
    pub const fn new(value: f64, unit: HealthUnit) -> Self {
        Self { value, unit }
    }

    /// Express this quantity in `unit`
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleUnit` when the units measure different dimensions
    pub fn value_in(&self, unit: HealthUnit) -> StoreResult<f64> {
        self.unit
            .convert(self.value, unit)
            .ok_or(StoreError::IncompatibleUnit {
                from: self.unit,
                to: unit,
            })
    }
}

/// Workout payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutData {
    /// Activity-type code
    pub activity_type: u32,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Energy burned, if recorded
    #[serde(default)]
    pub total_energy_burned: Option<Quantity>,
    /// Distance covered, if recorded
    #[serde(default)]
    pub total_distance: Option<Quantity>,
}

/// Payload of a sample, shaped by its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SampleData {
    /// Point quantity
    Quantity(Quantity),
    /// Raw category code
    Category {
        /// Category value
        value: i64,
    },
    /// Workout session
    Workout(WorkoutData),
}

/// Metadata keys the store understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataKey {
    /// Meal timing of a glucose reading
    BloodGlucoseMealTime,
    /// Reason an insulin dose was delivered
    InsulinDeliveryReason,
    /// Sample was entered manually
    WasUserEntered,
}

/// Small scalar metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Boolean flag
    Flag(bool),
    /// Integer, used for enum raw values
    Integer(i64),
    /// Real number
    Real(f64),
    /// Free text
    Text(String),
}

impl MetadataValue {
    /// Integer payload, if this is an integer
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }
}

/// Sample metadata
pub type Metadata = BTreeMap<MetadataKey, MetadataValue>;

/// Sample submitted to the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSample {
    /// Sample type
    pub sample_type: SampleType,
    /// Start instant
    pub start: DateTime<Utc>,
    /// End instant, never before `start`
    pub end: DateTime<Utc>,
    /// Payload
    pub data: SampleData,
    /// Metadata
    #[serde(default)]
    pub metadata: Metadata,
}

impl NewSample {
    /// Quantity sample over `[start, end]`
    #[must_use]
    pub fn quantity(
        sample_type: SampleType,
        quantity: Quantity,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            sample_type,
            start,
            end,
            data: SampleData::Quantity(quantity),
            metadata: Metadata::new(),
        }
    }

    /// Category sample over `[start, end]`
    #[must_use]
    pub fn category(
        sample_type: SampleType,
        value: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            sample_type,
            start,
            end,
            data: SampleData::Category { value },
            metadata: Metadata::new(),
        }
    }

    /// Workout session over `[start, end]`
    #[must_use]
    pub fn workout(workout: WorkoutData, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            sample_type: SampleType::Workout,
            start,
            end,
            data: SampleData::Workout(workout),
            metadata: Metadata::new(),
        }
    }

    /// Attach one metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: MetadataKey, value: MetadataValue) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Sample as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSample {
    /// Store-assigned handle
    pub handle: SampleHandle,
    /// Sample type
    pub sample_type: SampleType,
    /// Start instant
    pub start: DateTime<Utc>,
    /// End instant
    pub end: DateTime<Utc>,
    /// Payload
    pub data: SampleData,
    /// Metadata
    pub metadata: Metadata,
    /// Producing application or device
    pub source: SourceRevision,
}

impl StoredSample {
    /// Stamp a submitted sample with a handle and source
    #[must_use]
    pub fn from_new(sample: NewSample, source: SourceRevision) -> Self {
        Self {
            handle: SampleHandle::generate(),
            sample_type: sample.sample_type,
            start: sample.start,
            end: sample.end,
            data: sample.data,
            metadata: sample.metadata,
            source,
        }
    }

    /// Quantity payload
    #[must_use]
    pub const fn quantity(&self) -> Option<&Quantity> {
        match &self.data {
            SampleData::Quantity(quantity) => Some(quantity),
            _ => None,
        }
    }

    /// Category code
    #[must_use]
    pub const fn category_value(&self) -> Option<i64> {
        match &self.data {
            SampleData::Category { value } => Some(*value),
            _ => None,
        }
    }

    /// Workout payload
    #[must_use]
    pub const fn workout(&self) -> Option<&WorkoutData> {
        match &self.data {
            SampleData::Workout(workout) => Some(workout),
            _ => None,
        }
    }

    /// Integer metadata value for `key`
    #[must_use]
    pub fn metadata_integer(&self, key: MetadataKey) -> Option<i64> {
        self.metadata.get(&key).and_then(MetadataValue::as_integer)
    }
}

/// Sample loaded from a seed file together with its producing source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedSample {
    /// Sample fields
    #[serde(flatten)]
    pub sample: NewSample,
    /// Producing source; empty when the seed omits it
    #[serde(default)]
    pub source: SourceRevision,
}
