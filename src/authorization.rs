// ABOUTME: Authorization manager declaring the fixed read and write kind sets
// ABOUTME: Sends one combined grant request and maps store failures to typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::sync::Arc;

use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::SampleKind;
use pierre_health_store::{HealthStore, SampleType};
use tracing::{info, instrument};

use crate::codec::{sample_type_for, store_error};

/// Kinds the engine asks to read
pub const READ_KINDS: [SampleKind; 10] = [
    SampleKind::BloodGlucose,
    SampleKind::InsulinDelivery,
    SampleKind::Workout,
    SampleKind::Steps,
    SampleKind::Distance,
    SampleKind::Sleep,
    SampleKind::Weight,
    SampleKind::Water,
    SampleKind::MenstrualFlow,
    SampleKind::Mindfulness,
];

/// Kinds the engine asks to write
pub const WRITE_KINDS: [SampleKind; 2] = [SampleKind::BloodGlucose, SampleKind::InsulinDelivery];

/// Requests the engine's combined store grant
pub struct AuthorizationManager {
    store: Arc<dyn HealthStore>,
}

impl AuthorizationManager {
    /// Create a manager over `store`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Store types requested for reading
    #[must_use]
    pub fn read_types() -> BTreeSet<SampleType> {
        READ_KINDS.iter().copied().map(sample_type_for).collect()
    }

    /// Store types requested for writing
    #[must_use]
    pub fn share_types() -> BTreeSet<SampleType> {
        WRITE_KINDS.iter().copied().map(sample_type_for).collect()
    }

    /// Declare both kind sets in a single grant request
    ///
    /// Not retried; the store decides whether the user is prompted.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store, `AuthorizationError` with the
    /// store's reason otherwise
    #[instrument(skip(self), fields(store = self.store.name()))]
    pub async fn request_authorization(&self) -> AppResult<bool> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }
        let granted = self
            .store
            .request_authorization(&Self::share_types(), &Self::read_types())
            .await
            .map_err(|e| store_error(ErrorCode::AuthorizationError, e))?;
        info!(granted, "Health data authorization request completed");
        Ok(granted)
    }
}
