// ABOUTME: Unit conversion constants for glucose, length, mass, volume and time
// ABOUTME: Provides named constants to eliminate magic numbers in conversions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meters per kilometer conversion factor
pub const METERS_PER_KM: f64 = 1000.0;

/// Grams per kilogram
pub const GRAMS_PER_KILOGRAM: f64 = 1000.0;

/// Grams per avoirdupois pound
pub const GRAMS_PER_POUND: f64 = 453.592_37;

/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;

/// mg/dL per mmol/L of glucose (molar mass 180.15588 g/mol divided by 10)
pub const MG_DL_PER_MMOL_L: f64 = 18.015_588;

/// Milliseconds per second
pub const MS_PER_SECOND: i64 = 1000;
