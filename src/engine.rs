// ABOUTME: HealthSyncEngine facade wiring every sync component over one shared store
// ABOUTME: Exposes the verb surface: authorize, read, write, delete, daily activity, observe
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pierre_health_core::errors::AppResult;
use pierre_health_core::models::{DailyBucket, HealthRecord, SampleKind, TimeRange};
use pierre_health_store::HealthStore;

use crate::aggregation::DailyAggregationEngine;
use crate::authorization::AuthorizationManager;
use crate::config::EngineConfig;
use crate::delete::DeleteResolver;
use crate::observer::{BackgroundObserver, UpdateListener};
use crate::read::TypedReadDispatcher;
use crate::write::{WriteEncoder, WriteOptions};

/// Health record synchronization engine
///
/// Every operation completes exactly once with a value or an `AppError`.
/// Only the background observer keeps state across calls.
pub struct HealthSyncEngine {
    store: Arc<dyn HealthStore>,
    authorization: AuthorizationManager,
    reader: Arc<TypedReadDispatcher>,
    writer: WriteEncoder,
    deleter: DeleteResolver,
    aggregation: DailyAggregationEngine,
    observer: BackgroundObserver,
}

impl HealthSyncEngine {
    /// Build an engine over `store`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>, config: &EngineConfig) -> Self {
        let reader = Arc::new(TypedReadDispatcher::new(Arc::clone(&store)));
        Self {
            authorization: AuthorizationManager::new(Arc::clone(&store)),
            writer: WriteEncoder::new(Arc::clone(&store)),
            deleter: DeleteResolver::new(
                Arc::clone(&store),
                Arc::clone(&reader),
                config.app_identity.clone(),
                config.delete_tolerance,
            ),
            aggregation: DailyAggregationEngine::new(Arc::clone(&store), config.utc_offset),
            observer: BackgroundObserver::new(
                Arc::clone(&store),
                config.observed_kinds.clone(),
                config.background_frequency,
            ),
            reader,
            store,
        }
    }

    /// Whether a health store exists on this platform
    #[must_use]
    pub fn is_health_data_available(&self) -> bool {
        self.store.is_available()
    }

    /// Request the combined read/write grant
    ///
    /// # Errors
    ///
    /// See [`AuthorizationManager::request_authorization`]
    pub async fn request_authorization(&self) -> AppResult<bool> {
        self.authorization.request_authorization().await
    }

    /// Read samples of `kind` starting inside `range`, newest first
    ///
    /// # Errors
    ///
    /// See [`TypedReadDispatcher::read`]
    pub async fn read(&self, kind: SampleKind, range: TimeRange) -> AppResult<Vec<HealthRecord>> {
        self.reader.read(kind, range).await
    }

    /// Write one glucose or insulin sample
    ///
    /// # Errors
    ///
    /// See [`WriteEncoder::write`]
    pub async fn write(
        &self,
        kind: SampleKind,
        value: f64,
        start: DateTime<Utc>,
        options: &WriteOptions,
    ) -> AppResult<bool> {
        self.writer.write(kind, value, start, options).await
    }

    /// Delete the glucose or insulin sample(s) recorded near `timestamp`
    ///
    /// # Errors
    ///
    /// See [`DeleteResolver::delete`]
    pub async fn delete(&self, kind: SampleKind, timestamp: DateTime<Utc>) -> AppResult<bool> {
        self.deleter.delete(kind, timestamp).await
    }

    /// Per-day steps and distance over `range`
    ///
    /// # Errors
    ///
    /// See [`DailyAggregationEngine::fetch_daily_activity`]
    pub async fn fetch_daily_activity(&self, range: TimeRange) -> AppResult<Vec<DailyBucket>> {
        self.aggregation.fetch_daily_activity(range).await
    }

    /// Probe write permission for glucose or insulin
    pub async fn probe_write_permission(&self, kind: SampleKind) -> bool {
        self.writer.probe_write_permission(kind).await
    }

    /// Register the shared update listener (held weakly)
    pub async fn set_update_listener(&self, listener: &Arc<dyn UpdateListener>) {
        self.observer.set_listener(listener).await;
    }

    /// Start background observation
    ///
    /// # Errors
    ///
    /// See [`BackgroundObserver::start`]
    pub async fn start_observing(&self) -> AppResult<bool> {
        self.observer.start().await
    }

    /// Stop background observation
    ///
    /// # Errors
    ///
    /// See [`BackgroundObserver::stop`]
    pub async fn stop_observing(&self) -> AppResult<bool> {
        self.observer.stop().await
    }

    /// Background observer, for inspection
    #[must_use]
    pub const fn observer(&self) -> &BackgroundObserver {
        &self.observer
    }
}
