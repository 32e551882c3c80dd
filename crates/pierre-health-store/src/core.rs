// ABOUTME: HealthStore trait and the query, statistics and observer types it exchanges
// ABOUTME: Every store interaction is asynchronous and completes exactly once
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Health Store Boundary
//!
//! The sync engine never talks to a concrete health database. It talks to a
//! [`HealthStore`], an async trait mirroring the capabilities of a per-device
//! health record store:
//!
//! - **Authorization**: one combined share/read grant request
//! - **Sample queries**: date predicates with strict-start or overlap semantics
//! - **Save / delete**: deletion takes previously queried samples, not keys
//! - **Statistics collections**: cumulative sums bucketed by anchor and interval
//! - **Observers**: long-lived subscriptions that must acknowledge each delivery

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::errors::{StoreError, StoreResult};
use crate::types::{NewSample, Quantity, SampleType, StoredSample};

/// Date selection over sample start/end instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePredicate {
    /// Lower bound
    pub start: DateTime<Utc>,
    /// Upper bound, exclusive
    pub end: DateTime<Utc>,
    /// Require the sample start to fall inside `[start, end)` instead of mere overlap
    pub strict_start: bool,
}

impl DatePredicate {
    /// Samples starting inside `[start, end)`
    #[must_use]
    pub const fn strict_start(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            strict_start: true,
        }
    }

    /// Samples whose interval overlaps `[start, end)`
    #[must_use]
    pub const fn overlapping(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            strict_start: false,
        }
    }

    /// Whether a sample spanning `[sample_start, sample_end]` satisfies the predicate
    #[must_use]
    pub fn matches(&self, sample_start: DateTime<Utc>, sample_end: DateTime<Utc>) -> bool {
        if self.strict_start {
            self.start <= sample_start && sample_start < self.end
        } else {
            sample_start < self.end && sample_end >= self.start
        }
    }
}

/// Result ordering by sample start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first
    StartAscending,
    /// Newest first
    StartDescending,
}

/// Sample query over one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleQuery {
    /// Type to select
    pub sample_type: SampleType,
    /// Optional date predicate
    pub predicate: Option<DatePredicate>,
    /// Optional ordering; store order otherwise
    pub sort: Option<SortOrder>,
    /// Optional result cap
    pub limit: Option<usize>,
}

impl SampleQuery {
    /// Unbounded query over `sample_type`
    #[must_use]
    pub const fn new(sample_type: SampleType) -> Self {
        Self {
            sample_type,
            predicate: None,
            sort: None,
            limit: None,
        }
    }

    /// Restrict by date
    #[must_use]
    pub const fn with_predicate(mut self, predicate: DatePredicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Order results
    #[must_use]
    pub const fn sorted(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Cap the number of results
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Cumulative-sum statistics query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsQuery {
    /// Quantity type to sum
    pub quantity_type: SampleType,
    /// Samples contributing to the sums
    pub predicate: DatePredicate,
    /// Start of bucket zero
    pub anchor: DateTime<Utc>,
    /// Bucket width, must be positive
    pub interval: Duration,
}

/// One statistics interval
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsBucket {
    /// Interval start
    pub start: DateTime<Utc>,
    /// Interval end
    pub end: DateTime<Utc>,
    /// Sum in the type's canonical unit; `None` when nothing contributed
    pub sum: Option<Quantity>,
}

/// Sums keyed by interval index relative to an anchor
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsCollection {
    anchor: DateTime<Utc>,
    interval: Duration,
    sums: BTreeMap<i64, Quantity>,
}

impl StatisticsCollection {
    /// Empty collection
    #[must_use]
    pub const fn new(anchor: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            anchor,
            interval,
            sums: BTreeMap::new(),
        }
    }

    /// Index of the interval containing `instant`
    #[must_use]
    pub fn index_of(&self, instant: DateTime<Utc>) -> i64 {
        let width = self.interval.num_milliseconds().max(1);
        (instant - self.anchor).num_milliseconds().div_euclid(width)
    }

    /// Start of interval `index`, or `None` past the representable instants
    fn interval_start(&self, index: i64) -> Option<DateTime<Utc>> {
        let width = self.interval.num_milliseconds().max(1);
        let offset = Duration::try_milliseconds(index.checked_mul(width)?)?;
        self.anchor.checked_add_signed(offset)
    }

    /// Add `quantity` to the interval containing `instant`
    ///
    /// Quantities accumulated into one interval must share a unit.
    pub fn accumulate(&mut self, instant: DateTime<Utc>, quantity: Quantity) {
        let index = self.index_of(instant);
        self.sums
            .entry(index)
            .and_modify(|sum| sum.value += quantity.value)
            .or_insert(quantity);
    }

    /// Every interval overlapping `[from, to)`, including empty ones
    ///
    /// Enumeration stops at the last representable instant; the final
    /// interval is then clamped to `DateTime::<Utc>::MAX_UTC`.
    #[must_use]
    pub fn enumerate(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<StatisticsBucket> {
        let mut buckets = Vec::new();
        let mut index = self.index_of(from);
        while let Some(start) = self.interval_start(index) {
            if start >= to {
                break;
            }
            let next = index.checked_add(1);
            buckets.push(StatisticsBucket {
                start,
                end: next
                    .and_then(|next| self.interval_start(next))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
                sum: self.sums.get(&index).copied(),
            });
            let Some(next) = next else {
                break;
            };
            index = next;
        }
        buckets
    }
}

/// How often the store may wake the host for a watched type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundDeliveryFrequency {
    /// As soon as data changes
    #[default]
    Immediate,
    /// At most hourly
    Hourly,
    /// At most daily
    Daily,
    /// At most weekly
    Weekly,
}

impl BackgroundDeliveryFrequency {
    /// Parse a lowercase frequency name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" => Some(Self::Immediate),
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            _ => None,
        }
    }
}

/// Handle of a running observer query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverToken(pub u64);

impl fmt::Display for ObserverToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Acknowledgement the handler must give for each delivery
///
/// The store holds delivery resources until `complete` is called or the
/// handler is dropped.
#[derive(Debug)]
pub struct CompletionHandler {
    sender: oneshot::Sender<()>,
}

impl CompletionHandler {
    /// Create a handler and the receiver the store waits on
    #[must_use]
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    /// Acknowledge the delivery
    pub fn complete(self) {
        // Receiver gone means the store stopped waiting
        let _ = self.sender.send(());
    }
}

/// One observer firing
#[derive(Debug)]
pub struct ObserverUpdate {
    /// Type whose data changed
    pub sample_type: SampleType,
    /// Store-side error, if the observer query failed
    pub error: Option<StoreError>,
    /// Acknowledgement for this delivery
    pub completion: CompletionHandler,
}

/// Receiver of observer firings
#[async_trait]
pub trait ObserverHandler: Send + Sync {
    /// Handle one firing; must eventually call `update.completion.complete()`
    async fn on_update(&self, update: ObserverUpdate);
}

/// Per-device health record store
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &'static str;

    /// Whether a health store exists on this platform
    fn is_available(&self) -> bool;

    /// Request one combined share/read grant
    ///
    /// Success means the request was processed, not that every type was granted.
    async fn request_authorization(
        &self,
        share: &BTreeSet<SampleType>,
        read: &BTreeSet<SampleType>,
    ) -> StoreResult<bool>;

    /// Run a sample query
    async fn query_samples(&self, query: &SampleQuery) -> StoreResult<Vec<StoredSample>>;

    /// Save one sample, returning it as stored
    async fn save(&self, sample: NewSample) -> StoreResult<StoredSample>;

    /// Delete previously queried samples
    async fn delete(&self, samples: &[StoredSample]) -> StoreResult<bool>;

    /// Run a cumulative-sum statistics collection query
    async fn statistics_collection(
        &self,
        query: &StatisticsQuery,
    ) -> StoreResult<StatisticsCollection>;

    /// Start a long-lived observer query for `sample_type`
    async fn execute_observer(
        &self,
        sample_type: SampleType,
        handler: Arc<dyn ObserverHandler>,
    ) -> StoreResult<ObserverToken>;

    /// Stop an observer query; `false` if the token was not running
    async fn stop_observer(&self, token: ObserverToken) -> bool;

    /// Allow the store to wake the host for `sample_type`
    async fn enable_background_delivery(
        &self,
        sample_type: SampleType,
        frequency: BackgroundDeliveryFrequency,
    ) -> StoreResult<bool>;
}
