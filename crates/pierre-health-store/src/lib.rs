// ABOUTME: Health record store boundary for the Pierre health sync engine
// ABOUTME: HealthStore trait, store-native sample types, StoreError and the in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Health Store
//!
//! The external per-device health record store as seen by the sync engine.
//! Concrete platform stores implement [`HealthStore`]; [`InMemoryHealthStore`]
//! is a complete implementation used for development and tests.

/// `HealthStore` trait, queries, statistics and observer plumbing
pub mod core;

/// Store error type
pub mod errors;

/// In-memory store implementation
pub mod memory;

/// Store-native sample model
pub mod types;

pub use crate::core::{
    BackgroundDeliveryFrequency, CompletionHandler, DatePredicate, HealthStore, ObserverHandler,
    ObserverToken, ObserverUpdate, SampleQuery, SortOrder, StatisticsBucket, StatisticsCollection,
    StatisticsQuery,
};
pub use errors::{StoreError, StoreResult};
pub use memory::{AuthorizationRequest, InMemoryHealthStore};
pub use types::{
    Metadata, MetadataKey, MetadataValue, NewSample, Quantity, SampleData, SampleHandle,
    SampleType, SeedSample, SourceRevision, StoreOperation, StoredSample, WorkoutData,
};
