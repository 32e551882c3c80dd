// ABOUTME: Caller-facing data models for the health sync engine
// ABOUTME: Re-exports sample kinds, metadata enums, time ranges, read records and daily buckets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Types exchanged with the caller of the sync engine. Store-native types
//! live in `pierre-health-store`; the engine's codec translates between the two.

mod kind;
mod records;
mod time_range;

pub use kind::{InsulinDeliveryReason, KindCategory, MealTime, SampleKind};
pub use records::{CategoryRecord, DailyBucket, HealthRecord, QuantityRecord, WorkoutRecord};
pub use time_range::{datetime_from_millis, TimeRange};
