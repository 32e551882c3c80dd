// ABOUTME: Registry of health sample kinds exchanged with callers
// ABOUTME: Parses kind strings, classifies kinds by query shape, and fixes read units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::units::HealthUnit;

/// Kind of health sample a caller can read, write, delete or observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleKind {
    /// Blood glucose concentration
    BloodGlucose,
    /// Insulin delivery
    InsulinDelivery,
    /// Step count
    Steps,
    /// Walking and running distance
    Distance,
    /// Body mass
    Weight,
    /// Dietary water
    Water,
    /// Sleep analysis
    Sleep,
    /// Menstrual flow
    #[serde(rename = "MENSTRUATION")]
    MenstrualFlow,
    /// Mindful session
    Mindfulness,
    /// Workout
    Workout,
}

/// Query shape used to read a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindCategory {
    /// Point samples carrying a unit-tagged numeric value
    Quantity,
    /// Samples carrying a raw category code
    Category,
    /// Workout sessions
    Workout,
}

impl SampleKind {
    /// Every supported kind, in declaration order
    pub const ALL: [Self; 10] = [
        Self::BloodGlucose,
        Self::InsulinDelivery,
        Self::Steps,
        Self::Distance,
        Self::Weight,
        Self::Water,
        Self::Sleep,
        Self::MenstrualFlow,
        Self::Mindfulness,
        Self::Workout,
    ];

    /// Wire identifier of this kind
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::BloodGlucose => "BLOOD_GLUCOSE",
            Self::InsulinDelivery => "INSULIN_DELIVERY",
            Self::Steps => "STEPS",
            Self::Distance => "DISTANCE",
            Self::Weight => "WEIGHT",
            Self::Water => "WATER",
            Self::Sleep => "SLEEP",
            Self::MenstrualFlow => "MENSTRUATION",
            Self::Mindfulness => "MINDFULNESS",
            Self::Workout => "WORKOUT",
        }
    }

    /// Query shape for this kind
    #[must_use]
    pub const fn category(self) -> KindCategory {
        match self {
            Self::BloodGlucose
            | Self::InsulinDelivery
            | Self::Steps
            | Self::Distance
            | Self::Weight
            | Self::Water => KindCategory::Quantity,
            Self::Sleep | Self::MenstrualFlow | Self::Mindfulness => KindCategory::Category,
            Self::Workout => KindCategory::Workout,
        }
    }

    /// Fixed unit quantity kinds are converted to at read time
    #[must_use]
    pub const fn read_unit(self) -> Option<HealthUnit> {
        match self {
            Self::BloodGlucose => Some(HealthUnit::MilligramsPerDeciliter),
            Self::InsulinDelivery => Some(HealthUnit::InternationalUnit),
            Self::Steps => Some(HealthUnit::Count),
            Self::Distance => Some(HealthUnit::Meter),
            Self::Weight => Some(HealthUnit::Kilogram),
            Self::Water => Some(HealthUnit::Milliliter),
            Self::Sleep | Self::MenstrualFlow | Self::Mindfulness | Self::Workout => None,
        }
    }

    /// Whether callers may write and delete samples of this kind
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::BloodGlucose | Self::InsulinDelivery)
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for SampleKind {
    type Err = AppError;

    /// Accepts wire identifiers in any case plus the short verb-surface aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blood_glucose" | "glucose" => Ok(Self::BloodGlucose),
            "insulin_delivery" | "insulin" => Ok(Self::InsulinDelivery),
            "steps" => Ok(Self::Steps),
            "distance" => Ok(Self::Distance),
            "weight" => Ok(Self::Weight),
            "water" => Ok(Self::Water),
            "sleep" => Ok(Self::Sleep),
            "menstruation" | "menstrual_flow" => Ok(Self::MenstrualFlow),
            "mindfulness" => Ok(Self::Mindfulness),
            "workout" | "workouts" => Ok(Self::Workout),
            _ => Err(AppError::invalid_type(s)),
        }
    }
}

/// Meal timing attached to glucose samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    /// Before a meal
    Preprandial,
    /// After a meal
    Postprandial,
}

impl MealTime {
    /// Recognize the two literal wire strings; anything else is `None`
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "preprandial" => Some(Self::Preprandial),
            "postprandial" => Some(Self::Postprandial),
            _ => None,
        }
    }

    /// Wire string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preprandial => "preprandial",
            Self::Postprandial => "postprandial",
        }
    }

    /// Integer stored in sample metadata
    #[must_use]
    pub const fn raw_value(self) -> i64 {
        match self {
            Self::Preprandial => 1,
            Self::Postprandial => 2,
        }
    }

    /// Decode a metadata integer
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Self::Preprandial),
            2 => Some(Self::Postprandial),
            _ => None,
        }
    }
}

/// Reason an insulin dose was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsulinDeliveryReason {
    /// Background dose
    Basal,
    /// Meal or correction dose
    #[default]
    Bolus,
}

impl InsulinDeliveryReason {
    /// `"basal"` maps to basal; absent or any other string falls back to bolus
    #[must_use]
    pub fn from_wire_or_default(value: Option<&str>) -> Self {
        match value {
            Some("basal") => Self::Basal,
            _ => Self::Bolus,
        }
    }

    /// Wire string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basal => "basal",
            Self::Bolus => "bolus",
        }
    }

    /// Integer stored in sample metadata
    #[must_use]
    pub const fn raw_value(self) -> i64 {
        match self {
            Self::Basal => 1,
            Self::Bolus => 2,
        }
    }

    /// Decode a metadata integer
    #[must_use]
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Self::Basal),
            2 => Some(Self::Bolus),
            _ => None,
        }
    }
}
