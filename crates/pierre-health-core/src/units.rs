// ABOUTME: Health measurement units with dimension-checked conversion
// ABOUTME: Covers glucose concentration, insulin units, counts, length, mass, volume, energy, and time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::units::{
    GRAMS_PER_KILOGRAM, GRAMS_PER_POUND, MG_DL_PER_MMOL_L, METERS_PER_KM, ML_PER_LITER,
};

/// Physical dimension a unit measures; conversion only happens within one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitDimension {
    /// Blood glucose concentration
    GlucoseConcentration,
    /// Insulin dose
    InsulinDose,
    /// Dimensionless count
    Count,
    /// Length
    Length,
    /// Mass
    Mass,
    /// Volume
    Volume,
    /// Energy
    Energy,
    /// Time
    Time,
}

/// Units a health store can express quantities in
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthUnit {
    /// Milligrams per deciliter
    #[serde(rename = "mg/dL")]
    MilligramsPerDeciliter,
    /// Millimoles per liter (glucose)
    #[serde(rename = "mmol/L")]
    MillimolesPerLiter,
    /// International units
    #[serde(rename = "IU")]
    InternationalUnit,
    /// Plain count
    #[serde(rename = "count")]
    Count,
    /// Meters
    #[serde(rename = "m")]
    Meter,
    /// Kilometers
    #[serde(rename = "km")]
    Kilometer,
    /// Kilograms
    #[serde(rename = "kg")]
    Kilogram,
    /// Grams
    #[serde(rename = "g")]
    Gram,
    /// Pounds
    #[serde(rename = "lb")]
    Pound,
    /// Milliliters
    #[serde(rename = "mL")]
    Milliliter,
    /// Liters
    #[serde(rename = "L")]
    Liter,
    /// Kilocalories
    #[serde(rename = "kcal")]
    Kilocalorie,
    /// Seconds
    #[serde(rename = "s")]
    Second,
}

impl HealthUnit {
    /// Unit string reported to callers
    #[must_use]
    pub const fn unit_string(self) -> &'static str {
        match self {
            Self::MilligramsPerDeciliter => "mg/dL",
            Self::MillimolesPerLiter => "mmol/L",
            Self::InternationalUnit => "IU",
            Self::Count => "count",
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Pound => "lb",
            Self::Milliliter => "mL",
            Self::Liter => "L",
            Self::Kilocalorie => "kcal",
            Self::Second => "s",
        }
    }

    /// Dimension of this unit
    #[must_use]
    pub const fn dimension(self) -> UnitDimension {
        match self {
            Self::MilligramsPerDeciliter | Self::MillimolesPerLiter => {
                UnitDimension::GlucoseConcentration
            }
            Self::InternationalUnit => UnitDimension::InsulinDose,
            Self::Count => UnitDimension::Count,
            Self::Meter | Self::Kilometer => UnitDimension::Length,
            Self::Kilogram | Self::Gram | Self::Pound => UnitDimension::Mass,
            Self::Milliliter | Self::Liter => UnitDimension::Volume,
            Self::Kilocalorie => UnitDimension::Energy,
            Self::Second => UnitDimension::Time,
        }
    }

    /// Factor that converts a value in this unit to the dimension's base unit
    const fn to_base_factor(self) -> f64 {
        match self {
            Self::MillimolesPerLiter => MG_DL_PER_MMOL_L,
            Self::Kilometer => METERS_PER_KM,
            Self::Kilogram => GRAMS_PER_KILOGRAM,
            Self::Pound => GRAMS_PER_POUND,
            Self::Liter => ML_PER_LITER,
            Self::MilligramsPerDeciliter
            | Self::InternationalUnit
            | Self::Count
            | Self::Meter
            | Self::Gram
            | Self::Milliliter
            | Self::Kilocalorie
            | Self::Second => 1.0,
        }
    }

    /// Convert `value` expressed in `self` into `target`
    ///
    /// Returns `None` when the units measure different dimensions.
    #[must_use]
    pub fn convert(self, value: f64, target: Self) -> Option<f64> {
        if self == target {
            return Some(value);
        }
        if self.dimension() != target.dimension() {
            return None;
        }
        Some(value * self.to_base_factor() / target.to_base_factor())
    }
}

impl fmt::Display for HealthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversion() {
        let km = HealthUnit::Meter.convert(2500.0, HealthUnit::Kilometer);
        assert!((km.unwrap_or_default() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_glucose_conversion() {
        let mg_dl = HealthUnit::MillimolesPerLiter
            .convert(5.5, HealthUnit::MilligramsPerDeciliter)
            .unwrap_or_default();
        assert!((mg_dl - 99.085_734).abs() < 1e-4);
    }

    #[test]
    fn test_cross_dimension_rejected() {
        assert_eq!(HealthUnit::Kilogram.convert(1.0, HealthUnit::Liter), None);
        assert_eq!(HealthUnit::Count.convert(1.0, HealthUnit::Meter), None);
    }

    #[test]
    fn test_mass_conversion() {
        let kg = HealthUnit::Pound
            .convert(1.0, HealthUnit::Kilogram)
            .unwrap_or_default();
        assert!((kg - 0.453_592_37).abs() < 1e-9);
    }
}
