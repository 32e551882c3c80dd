// ABOUTME: In-memory HealthStore for development, the CLI and tests
// ABOUTME: Implements predicates, statistics bucketing, observers, authorization and fault injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! In-memory health store
//!
//! Holds samples in a `tokio::sync::RwLock`-guarded vector and behaves like
//! a device health store:
//!
//! - Saved samples are stamped with a fresh handle and the store's own source
//! - Insulin samples without a delivery reason are rejected
//! - Types can be denied for sharing, making save and delete fail
//! - Observers fire after every save, insert or delete of their type and the
//!   store waits for each delivery to be acknowledged
//! - Any operation can be made to fail with `inject_failure`

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use pierre_health_core::constants::DEFAULT_APP_IDENTITY;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::core::{
    BackgroundDeliveryFrequency, CompletionHandler, HealthStore, ObserverHandler, ObserverToken,
    ObserverUpdate, SampleQuery, SortOrder, StatisticsCollection, StatisticsQuery,
};
use crate::errors::{StoreError, StoreResult};
use crate::types::{
    MetadataKey, NewSample, Quantity, SampleData, SampleType, SeedSample, SourceRevision,
    StoreOperation, StoredSample,
};

/// Display name stamped on samples saved through the default store
const DEFAULT_SOURCE_NAME: &str = "Pierre Health";

/// Authorization request as received by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Types requested for sharing
    pub share: BTreeSet<SampleType>,
    /// Types requested for reading
    pub read: BTreeSet<SampleType>,
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    operation: StoreOperation,
    sample_type: Option<SampleType>,
    message: String,
}

struct ObserverRegistration {
    sample_type: SampleType,
    handler: Arc<dyn ObserverHandler>,
}

/// In-memory health store
pub struct InMemoryHealthStore {
    source: SourceRevision,
    available: AtomicBool,
    samples: RwLock<Vec<StoredSample>>,
    observers: RwLock<HashMap<ObserverToken, ObserverRegistration>>,
    next_token: AtomicU64,
    background_delivery: RwLock<HashMap<SampleType, BackgroundDeliveryFrequency>>,
    authorization_requests: RwLock<Vec<AuthorizationRequest>>,
    share_denied: RwLock<HashSet<SampleType>>,
    failures: RwLock<Vec<InjectedFailure>>,
}

impl InMemoryHealthStore {
    /// Empty store whose saved samples carry `source`
    #[must_use]
    pub fn new(source: SourceRevision) -> Self {
        Self {
            source,
            available: AtomicBool::new(true),
            samples: RwLock::new(Vec::new()),
            observers: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            background_delivery: RwLock::new(HashMap::new()),
            authorization_requests: RwLock::new(Vec::new()),
            share_denied: RwLock::new(HashSet::new()),
            failures: RwLock::new(Vec::new()),
        }
    }

    /// Empty store owned by the application `bundle_identifier`
    #[must_use]
    pub fn with_app_identity(bundle_identifier: &str) -> Self {
        Self::new(SourceRevision::new(DEFAULT_SOURCE_NAME, bundle_identifier))
    }

    /// Store reporting no health data on this platform
    #[must_use]
    pub fn unavailable() -> Self {
        let store = Self::default();
        store.set_available(false);
        store
    }

    /// Toggle platform availability
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Source stamped on saved samples
    #[must_use]
    pub const fn source(&self) -> &SourceRevision {
        &self.source
    }

    /// Make `operation` fail with `message`, for one type or all types
    pub async fn inject_failure(
        &self,
        operation: StoreOperation,
        sample_type: Option<SampleType>,
        message: impl Into<String>,
    ) {
        self.failures.write().await.push(InjectedFailure {
            operation,
            sample_type,
            message: message.into(),
        });
    }

    /// Remove every injected failure
    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    /// Refuse sharing (save and delete) for `sample_type`
    pub async fn deny_share(&self, sample_type: SampleType) {
        self.share_denied.write().await.insert(sample_type);
    }

    /// Insert a sample produced by `source`, bypassing authorization
    ///
    /// Used for seeding and for simulating writes by other applications.
    /// Observers of the type are notified.
    pub async fn insert(&self, sample: NewSample, source: SourceRevision) -> StoredSample {
        let stored = StoredSample::from_new(sample, source);
        self.samples.write().await.push(stored.clone());
        self.notify_observers(stored.sample_type).await;
        stored
    }

    /// Insert every seed sample in order
    pub async fn insert_seed(&self, seeds: Vec<SeedSample>) -> Vec<StoredSample> {
        let mut stored = Vec::with_capacity(seeds.len());
        for seed in seeds {
            stored.push(self.insert(seed.sample, seed.source).await);
        }
        stored
    }

    /// Snapshot of all samples in insertion order
    pub async fn samples(&self) -> Vec<StoredSample> {
        self.samples.read().await.clone()
    }

    /// Number of stored samples of `sample_type`
    pub async fn sample_count(&self, sample_type: SampleType) -> usize {
        self.samples
            .read()
            .await
            .iter()
            .filter(|sample| sample.sample_type == sample_type)
            .count()
    }

    /// Number of running observer queries for `sample_type`
    pub async fn observer_count(&self, sample_type: SampleType) -> usize {
        self.observers
            .read()
            .await
            .values()
            .filter(|registration| registration.sample_type == sample_type)
            .count()
    }

    /// Background delivery frequency enabled for `sample_type`
    pub async fn background_delivery(
        &self,
        sample_type: SampleType,
    ) -> Option<BackgroundDeliveryFrequency> {
        self.background_delivery
            .read()
            .await
            .get(&sample_type)
            .copied()
    }

    /// Authorization requests received so far
    pub async fn authorization_requests(&self) -> Vec<AuthorizationRequest> {
        self.authorization_requests.read().await.clone()
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    async fn check_injected(
        &self,
        operation: StoreOperation,
        sample_type: Option<SampleType>,
    ) -> StoreResult<()> {
        let failures = self.failures.read().await;
        let hit = failures.iter().find(|failure| {
            failure.operation == operation
                && (failure.sample_type.is_none() || failure.sample_type == sample_type)
        });
        hit.map_or(Ok(()), |failure| {
            Err(StoreError::backend(operation, failure.message.clone()))
        })
    }

    async fn ensure_share_allowed(&self, sample_type: SampleType) -> StoreResult<()> {
        if self.share_denied.read().await.contains(&sample_type) {
            return Err(StoreError::NotAuthorized { sample_type });
        }
        Ok(())
    }

    fn validate(sample: &NewSample) -> StoreResult<()> {
        if sample.end < sample.start {
            return Err(StoreError::rejected("Sample end date precedes start date"));
        }
        match (&sample.data, sample.sample_type.canonical_unit()) {
            (SampleData::Quantity(quantity), Some(unit)) => {
                if !quantity.value.is_finite() {
                    return Err(StoreError::rejected("Quantity value must be finite"));
                }
                quantity.value_in(unit)?;
            }
            (SampleData::Category { .. }, None) if sample.sample_type.is_category() => {}
            (SampleData::Workout(_), None) if sample.sample_type == SampleType::Workout => {}
            _ => {
                return Err(StoreError::rejected(format!(
                    "Sample data does not match type {}",
                    sample.sample_type
                )));
            }
        }
        if sample.sample_type == SampleType::InsulinDelivery
            && !sample
                .metadata
                .contains_key(&MetadataKey::InsulinDeliveryReason)
        {
            return Err(StoreError::rejected(
                "Insulin delivery samples require an insulin delivery reason",
            ));
        }
        Ok(())
    }

    /// Fire every observer of `sample_type` and wait for each acknowledgement
    async fn notify_observers(&self, sample_type: SampleType) {
        let handlers: Vec<(ObserverToken, Arc<dyn ObserverHandler>)> = self
            .observers
            .read()
            .await
            .iter()
            .filter(|(_, registration)| registration.sample_type == sample_type)
            .map(|(token, registration)| (*token, Arc::clone(&registration.handler)))
            .collect();
        if handlers.is_empty() {
            return;
        }

        let mut deliveries = Vec::with_capacity(handlers.len());
        let mut acknowledgements = Vec::with_capacity(handlers.len());
        for (token, handler) in handlers {
            let (completion, receiver) = CompletionHandler::new();
            acknowledgements.push((token, receiver));
            deliveries.push(async move {
                handler
                    .on_update(ObserverUpdate {
                        sample_type,
                        error: None,
                        completion,
                    })
                    .await;
            });
        }
        join_all(deliveries).await;

        for (token, receiver) in acknowledgements {
            if receiver.await.is_err() {
                warn!(%token, %sample_type, "Observer dropped its completion handler without acknowledging");
            }
        }
    }
}

impl Default for InMemoryHealthStore {
    fn default() -> Self {
        Self::with_app_identity(DEFAULT_APP_IDENTITY)
    }
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn request_authorization(
        &self,
        share: &BTreeSet<SampleType>,
        read: &BTreeSet<SampleType>,
    ) -> StoreResult<bool> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::Authorization, None)
            .await?;
        self.authorization_requests
            .write()
            .await
            .push(AuthorizationRequest {
                share: share.clone(),
                read: read.clone(),
            });
        debug!(share = share.len(), read = read.len(), "Authorization request recorded");
        Ok(true)
    }

    #[instrument(skip(self, query), fields(sample_type = %query.sample_type))]
    async fn query_samples(&self, query: &SampleQuery) -> StoreResult<Vec<StoredSample>> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::Query, Some(query.sample_type))
            .await?;

        let mut results: Vec<StoredSample> = self
            .samples
            .read()
            .await
            .iter()
            .filter(|sample| sample.sample_type == query.sample_type)
            .filter(|sample| {
                query
                    .predicate
                    .as_ref()
                    .is_none_or(|predicate| predicate.matches(sample.start, sample.end))
            })
            .cloned()
            .collect();

        match query.sort {
            Some(SortOrder::StartAscending) => results.sort_by_key(|sample| sample.start),
            Some(SortOrder::StartDescending) => {
                results.sort_by(|a, b| b.start.cmp(&a.start));
            }
            None => {}
        }
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }
        debug!(count = results.len(), "Sample query completed");
        Ok(results)
    }

    #[instrument(skip(self, sample), fields(sample_type = %sample.sample_type))]
    async fn save(&self, sample: NewSample) -> StoreResult<StoredSample> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::Save, Some(sample.sample_type))
            .await?;
        self.ensure_share_allowed(sample.sample_type).await?;
        Self::validate(&sample)?;

        let stored = StoredSample::from_new(sample, self.source.clone());
        self.samples.write().await.push(stored.clone());
        debug!(handle = %stored.handle, "Sample saved");
        self.notify_observers(stored.sample_type).await;
        Ok(stored)
    }

    #[instrument(skip(self, samples), fields(count = samples.len()))]
    async fn delete(&self, samples: &[StoredSample]) -> StoreResult<bool> {
        self.ensure_available()?;
        let types: BTreeSet<SampleType> = samples.iter().map(|sample| sample.sample_type).collect();
        for sample_type in &types {
            self.check_injected(StoreOperation::Delete, Some(*sample_type))
                .await?;
            self.ensure_share_allowed(*sample_type).await?;
        }

        {
            let mut stored = self.samples.write().await;
            if let Some(missing) = samples
                .iter()
                .find(|target| !stored.iter().any(|sample| sample.handle == target.handle))
            {
                return Err(StoreError::UnknownSample {
                    handle: missing.handle,
                });
            }
            stored.retain(|sample| !samples.iter().any(|target| target.handle == sample.handle));
        }
        debug!(count = samples.len(), "Samples deleted");

        for sample_type in types {
            self.notify_observers(sample_type).await;
        }
        Ok(true)
    }

    #[instrument(skip(self, query), fields(sample_type = %query.quantity_type))]
    async fn statistics_collection(
        &self,
        query: &StatisticsQuery,
    ) -> StoreResult<StatisticsCollection> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::Statistics, Some(query.quantity_type))
            .await?;
        let unit = query.quantity_type.canonical_unit().ok_or_else(|| {
            StoreError::rejected(format!(
                "Statistics require a quantity type, got {}",
                query.quantity_type
            ))
        })?;
        if query.interval <= chrono::Duration::zero() {
            return Err(StoreError::rejected("Statistics interval must be positive"));
        }

        let mut collection = StatisticsCollection::new(query.anchor, query.interval);
        let samples = self.samples.read().await;
        for sample in samples.iter().filter(|sample| {
            sample.sample_type == query.quantity_type
                && query.predicate.matches(sample.start, sample.end)
        }) {
            if let Some(quantity) = sample.quantity() {
                let value = quantity.value_in(unit)?;
                collection.accumulate(sample.start, Quantity::new(value, unit));
            }
        }
        Ok(collection)
    }

    async fn execute_observer(
        &self,
        sample_type: SampleType,
        handler: Arc<dyn ObserverHandler>,
    ) -> StoreResult<ObserverToken> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::Observe, Some(sample_type))
            .await?;
        let token = ObserverToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.observers.write().await.insert(
            token,
            ObserverRegistration {
                sample_type,
                handler,
            },
        );
        debug!(%token, %sample_type, "Observer query started");
        Ok(token)
    }

    async fn stop_observer(&self, token: ObserverToken) -> bool {
        let removed = self.observers.write().await.remove(&token).is_some();
        debug!(%token, removed, "Observer query stopped");
        removed
    }

    async fn enable_background_delivery(
        &self,
        sample_type: SampleType,
        frequency: BackgroundDeliveryFrequency,
    ) -> StoreResult<bool> {
        self.ensure_available()?;
        self.check_injected(StoreOperation::BackgroundDelivery, Some(sample_type))
            .await?;
        self.background_delivery
            .write()
            .await
            .insert(sample_type, frequency);
        Ok(true)
    }
}
