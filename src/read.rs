// ABOUTME: Typed read dispatcher routing (kind, range) requests to the right query shape
// ABOUTME: Quantity, category and workout reads normalized into caller records, newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Typed Read Dispatcher
//!
//! Every read is a strict-start window query sorted by start descending.
//! The kind's category decides how samples are decoded:
//!
//! - **Quantity** kinds are converted to the kind's fixed read unit and carry
//!   meal-time or delivery-reason tags where applicable
//! - **Workout** reads report activity type, duration, energy and distance
//! - **Category** kinds report the raw category value; sleep keeps only the
//!   in-bed value

use std::sync::Arc;

use pierre_health_core::constants::SLEEP_IN_BED_VALUE;
use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::{HealthRecord, SampleKind, TimeRange};
use pierre_health_store::{DatePredicate, HealthStore, SampleQuery, SortOrder, StoredSample};
use tracing::{debug, instrument};

use crate::codec::{self, sample_type_for, store_error};

/// Routes typed reads to the store
pub struct TypedReadDispatcher {
    store: Arc<dyn HealthStore>,
}

impl TypedReadDispatcher {
    /// Create a dispatcher over `store`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Raw window query shared with the delete resolver
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store and `QueryError` when the store
    /// query fails
    pub async fn query_window(
        &self,
        kind: SampleKind,
        predicate: DatePredicate,
    ) -> AppResult<Vec<StoredSample>> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }
        let query = SampleQuery::new(sample_type_for(kind))
            .with_predicate(predicate)
            .sorted(SortOrder::StartDescending);
        self.store
            .query_samples(&query)
            .await
            .map_err(|e| store_error(ErrorCode::QueryError, e))
    }

    /// Read samples of `kind` starting inside `range`, newest first
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store and `QueryError` when the store
    /// query fails or a sample cannot be decoded
    #[instrument(skip(self), fields(kind = %kind, start = %range.start, end = %range.end))]
    pub async fn read(&self, kind: SampleKind, range: TimeRange) -> AppResult<Vec<HealthRecord>> {
        let samples = self
            .query_window(kind, DatePredicate::strict_start(range.start, range.end))
            .await?;

        let records = samples
            .iter()
            .filter(|sample| {
                kind != SampleKind::Sleep || sample.category_value() == Some(SLEEP_IN_BED_VALUE)
            })
            .map(|sample| codec::decode(kind, sample))
            .collect::<AppResult<Vec<_>>>()?;

        debug!(count = records.len(), "Typed read completed");
        Ok(records)
    }
}
