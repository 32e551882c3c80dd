// ABOUTME: Background observer subsystem keeping one live store subscription per watched kind
// ABOUTME: Every firing fans in to a single injected update listener held by weak reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Background Observer Subsystem
//!
//! State machine: idle, then `start()` installs one observer query per watched
//! kind, then `stop()` tears them all down. Starting while already watching
//! first stops the previous subscription of each kind, so a kind never has
//! two live subscriptions. Start and stop are serialized by one mutex over
//! the subscription handles.
//!
//! The update listener is injected with [`BackgroundObserver::set_listener`]
//! and held weakly: the host owns it, and a dropped listener silently stops
//! receiving updates while deliveries are still acknowledged.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::SampleKind;
use pierre_health_store::{
    BackgroundDeliveryFrequency, HealthStore, ObserverHandler, ObserverToken, ObserverUpdate,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::codec::{sample_type_for, store_error};

/// Receives a payload-free notification whenever watched data changes
pub trait UpdateListener: Send + Sync {
    /// Called once per delivered change notification
    fn on_health_data_updated(&self);
}

impl<F> UpdateListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_health_data_updated(&self) {
        self();
    }
}

/// Weak slot holding the current listener
#[derive(Default)]
struct ListenerSlot {
    listener: RwLock<Option<Weak<dyn UpdateListener>>>,
}

impl ListenerSlot {
    async fn notify(&self, kind: SampleKind) {
        let listener = self.listener.read().await.as_ref().and_then(Weak::upgrade);
        match listener {
            Some(listener) => listener.on_health_data_updated(),
            None => debug!(%kind, "No live update listener; notification dropped"),
        }
    }
}

/// Observer callback for one watched kind
struct SubscriptionHandler {
    kind: SampleKind,
    listener: Arc<ListenerSlot>,
}

#[async_trait]
impl ObserverHandler for SubscriptionHandler {
    async fn on_update(&self, update: ObserverUpdate) {
        match &update.error {
            Some(error) => {
                warn!(kind = %self.kind, error = %error, "Observer query reported an error");
            }
            None => {
                debug!(kind = %self.kind, sample_type = %update.sample_type, "Observed health data change");
                self.listener.notify(self.kind).await;
            }
        }
        update.completion.complete();
    }
}

/// Long-lived passive subscriptions for the watched kinds
pub struct BackgroundObserver {
    store: Arc<dyn HealthStore>,
    kinds: Vec<SampleKind>,
    frequency: BackgroundDeliveryFrequency,
    listener: Arc<ListenerSlot>,
    subscriptions: Mutex<HashMap<SampleKind, ObserverToken>>,
}

impl BackgroundObserver {
    /// Create an idle observer watching `kinds`
    #[must_use]
    pub fn new(
        store: Arc<dyn HealthStore>,
        kinds: Vec<SampleKind>,
        frequency: BackgroundDeliveryFrequency,
    ) -> Self {
        Self {
            store,
            kinds,
            frequency,
            listener: Arc::new(ListenerSlot::default()),
            subscriptions: Mutex::new(HashMap::new()),
        }
    }

    /// Kinds this observer watches
    #[must_use]
    pub fn kinds(&self) -> &[SampleKind] {
        &self.kinds
    }

    /// Register the shared update listener, replacing any previous one
    ///
    /// Only a weak reference is kept; the caller owns the listener.
    pub async fn set_listener(&self, listener: &Arc<dyn UpdateListener>) {
        *self.listener.listener.write().await = Some(Arc::downgrade(listener));
    }

    /// Forget the update listener
    pub async fn clear_listener(&self) {
        *self.listener.listener.write().await = None;
    }

    /// Kinds with a live subscription
    pub async fn active_kinds(&self) -> Vec<SampleKind> {
        let mut kinds: Vec<SampleKind> = self.subscriptions.lock().await.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Install one subscription per watched kind, replacing existing ones
    ///
    /// Background delivery is requested for each kind; failing to enable it
    /// is logged only.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store and `QueryError` when the store
    /// refuses an observer query
    #[instrument(skip(self), fields(kinds = ?self.kinds))]
    pub async fn start(&self) -> AppResult<bool> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }

        let mut subscriptions = self.subscriptions.lock().await;
        for &kind in &self.kinds {
            if let Some(previous) = subscriptions.remove(&kind) {
                self.store.stop_observer(previous).await;
                debug!(%kind, token = %previous, "Replaced existing subscription");
            }

            let sample_type = sample_type_for(kind);
            let handler: Arc<dyn ObserverHandler> = Arc::new(SubscriptionHandler {
                kind,
                listener: Arc::clone(&self.listener),
            });
            let token = self
                .store
                .execute_observer(sample_type, handler)
                .await
                .map_err(|e| store_error(ErrorCode::QueryError, e))?;
            subscriptions.insert(kind, token);

            match self
                .store
                .enable_background_delivery(sample_type, self.frequency)
                .await
            {
                Ok(true) => debug!(%kind, frequency = ?self.frequency, "Background delivery enabled"),
                Ok(false) => warn!(%kind, "Store declined background delivery"),
                Err(e) => warn!(%kind, error = %e, "Failed to enable background delivery"),
            }
        }

        info!(active = subscriptions.len(), "Background observer started");
        Ok(true)
    }

    /// Tear down every live subscription; succeeds when none are alive
    #[instrument(skip(self))]
    pub async fn stop(&self) -> AppResult<bool> {
        let mut subscriptions = self.subscriptions.lock().await;
        for (kind, token) in subscriptions.drain() {
            if !self.store.stop_observer(token).await {
                debug!(%kind, %token, "Subscription was no longer running");
            }
        }
        info!("Background observer stopped");
        Ok(true)
    }
}
