// ABOUTME: Daily aggregation engine joining concurrent step and distance statistics per calendar day
// ABOUTME: A failing sub-query is logged and contributes nothing; days are never dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Daily Aggregation Engine
//!
//! Issues two cumulative-sum statistics queries (steps and walking/running
//! distance) concurrently over the same range, both bucketed into calendar
//! days anchored at local midnight of the range start. The merge step runs
//! only after both queries reach a terminal state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use pierre_health_core::constants::MAX_DAILY_ACTIVITY_DAYS;
use pierre_health_core::errors::{AppError, AppResult};
use pierre_health_core::models::{DailyBucket, TimeRange};
use pierre_health_core::units::HealthUnit;
use pierre_health_store::{DatePredicate, HealthStore, SampleType, StatisticsQuery, StoreResult};
use tracing::{debug, instrument, warn};

/// Per-day totals of one metric
type DailySeries = BTreeMap<NaiveDate, f64>;

/// Builds per-day step and distance buckets
pub struct DailyAggregationEngine {
    store: Arc<dyn HealthStore>,
    utc_offset: FixedOffset,
}

impl DailyAggregationEngine {
    /// Create an engine bucketing days in the calendar at `utc_offset`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, utc_offset: FixedOffset) -> Self {
        Self { store, utc_offset }
    }

    fn offset(&self) -> Duration {
        Duration::seconds(i64::from(self.utc_offset.local_minus_utc()))
    }

    fn local_naive(&self, instant: DateTime<Utc>) -> Option<NaiveDateTime> {
        instant.naive_utc().checked_add_signed(self.offset())
    }

    /// Local midnight of the day containing `instant`, as a UTC instant
    ///
    /// `None` when the local day starts outside the representable instants.
    #[must_use]
    pub fn local_day_start(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local_midnight = self.local_naive(instant)?.date().and_time(NaiveTime::MIN);
        local_midnight
            .checked_sub_signed(self.offset())
            .map(|midnight| midnight.and_utc())
    }

    /// Local calendar day of `instant`
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> Option<NaiveDate> {
        self.local_naive(instant).map(|local| local.date())
    }

    /// Anchor of the first daily bucket, once `range` is known to be servable
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the range spans more than
    /// `MAX_DAILY_ACTIVITY_DAYS` or its local days are not representable
    pub fn daily_anchor(&self, range: TimeRange) -> AppResult<DateTime<Utc>> {
        let anchor = self
            .local_day_start(range.start)
            .filter(|_| self.local_date(range.end).is_some())
            .ok_or_else(|| {
                AppError::invalid_argument(format!(
                    "Time range {} to {} exceeds the supported date range",
                    range.start, range.end
                ))
            })?;
        if range.end.signed_duration_since(anchor) > Duration::days(MAX_DAILY_ACTIVITY_DAYS) {
            return Err(AppError::invalid_argument(format!(
                "Daily activity range exceeds {MAX_DAILY_ACTIVITY_DAYS} days"
            )));
        }
        Ok(anchor)
    }

    /// Steps and distance for every local day touched by `range`
    ///
    /// Buckets are returned in date order.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store and `InvalidArgument` for ranges
    /// rejected by [`Self::daily_anchor`]. Sub-query failures are logged and
    /// never fail the call.
    #[instrument(skip(self), fields(start = %range.start, end = %range.end))]
    pub async fn fetch_daily_activity(&self, range: TimeRange) -> AppResult<Vec<DailyBucket>> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }
        let anchor = self.daily_anchor(range)?;

        let (steps, distance) = tokio::join!(
            self.daily_series(range, anchor, SampleType::StepCount, HealthUnit::Count),
            self.daily_series(
                range,
                anchor,
                SampleType::DistanceWalkingRunning,
                HealthUnit::Kilometer
            ),
        );
        let steps = Self::or_empty(steps, SampleType::StepCount);
        let distance = Self::or_empty(distance, SampleType::DistanceWalkingRunning);

        let days: BTreeSet<NaiveDate> = steps.keys().chain(distance.keys()).copied().collect();
        let buckets: Vec<DailyBucket> = days
            .into_iter()
            .map(|date| DailyBucket {
                date,
                steps: steps.get(&date).copied().unwrap_or(0.0) as i64,
                distance_km: distance.get(&date).copied().unwrap_or(0.0),
            })
            .collect();

        debug!(days = buckets.len(), "Daily activity aggregated");
        Ok(buckets)
    }

    fn or_empty(series: StoreResult<DailySeries>, sample_type: SampleType) -> DailySeries {
        series.unwrap_or_else(|e| {
            warn!(%sample_type, error = %e, "Daily statistics query failed; contributing no data");
            DailySeries::new()
        })
    }

    async fn daily_series(
        &self,
        range: TimeRange,
        anchor: DateTime<Utc>,
        quantity_type: SampleType,
        unit: HealthUnit,
    ) -> StoreResult<DailySeries> {
        let query = StatisticsQuery {
            quantity_type,
            predicate: DatePredicate::strict_start(range.start, range.end),
            anchor,
            interval: Duration::days(1),
        };
        let collection = self.store.statistics_collection(&query).await?;

        let mut series = DailySeries::new();
        for bucket in collection.enumerate(range.start, range.end) {
            let value = match bucket.sum {
                Some(sum) => sum.value_in(unit)?,
                None => 0.0,
            };
            if let Some(date) = self.local_date(bucket.start) {
                *series.entry(date).or_insert(0.0) += value;
            }
        }
        Ok(series)
    }
}
