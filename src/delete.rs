// ABOUTME: Delete resolver mapping "delete the sample near this instant" onto store samples
// ABOUTME: Deletes every same-app candidate in the window, else the single nearest candidate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Delete Resolver
//!
//! The store has no key linking a caller's write to the sample it produced,
//! so deletion is always query, filter, delete:
//!
//! 1. Query samples of the kind starting within the tolerance window around
//!    the target instant
//! 2. Fail with `NotFound` when the window is empty
//! 3. Delete every candidate produced by the caller's own application
//! 4. Otherwise delete the one candidate nearest to the target instant

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::SampleKind;
use pierre_health_store::{DatePredicate, HealthStore, StoredSample};
use tracing::{debug, info, instrument};

use crate::codec::store_error;
use crate::read::TypedReadDispatcher;

/// Samples chosen for deletion
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Every candidate produced by the caller's application
    Owned(Vec<StoredSample>),
    /// No owned candidate; the one closest to the target instant
    Nearest(StoredSample),
}

impl Resolution {
    /// Samples to hand to the store
    #[must_use]
    pub fn targets(&self) -> &[StoredSample] {
        match self {
            Self::Owned(samples) => samples,
            Self::Nearest(sample) => std::slice::from_ref(sample),
        }
    }
}

/// Resolves approximate-instant deletes against the store
pub struct DeleteResolver {
    store: Arc<dyn HealthStore>,
    reader: Arc<TypedReadDispatcher>,
    app_identity: String,
    tolerance: Duration,
}

impl DeleteResolver {
    /// Create a resolver treating `app_identity` as the caller's own source
    #[must_use]
    pub fn new(
        store: Arc<dyn HealthStore>,
        reader: Arc<TypedReadDispatcher>,
        app_identity: impl Into<String>,
        tolerance: Duration,
    ) -> Self {
        Self {
            store,
            reader,
            app_identity: app_identity.into(),
            tolerance,
        }
    }

    /// Window `[timestamp - tolerance, timestamp + tolerance)` over sample starts
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when either bound falls outside the
    /// representable instants
    pub fn window(&self, timestamp: DateTime<Utc>) -> AppResult<DatePredicate> {
        let bounds = timestamp
            .checked_sub_signed(self.tolerance)
            .zip(timestamp.checked_add_signed(self.tolerance));
        let (start, end) = bounds.ok_or_else(|| {
            AppError::invalid_argument(format!(
                "Delete window around {timestamp} exceeds the supported date range"
            ))
        })?;
        Ok(DatePredicate::strict_start(start, end))
    }

    /// Pick the samples to delete among window candidates
    ///
    /// Returns `None` when there are no candidates. Equidistant nearest
    /// candidates resolve to the first one in candidate order.
    #[must_use]
    pub fn resolve_targets(
        &self,
        candidates: Vec<StoredSample>,
        timestamp: DateTime<Utc>,
    ) -> Option<Resolution> {
        let (owned, foreign): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|sample| {
            sample.source.bundle_identifier.as_deref() == Some(self.app_identity.as_str())
        });
        if !owned.is_empty() {
            return Some(Resolution::Owned(owned));
        }
        foreign
            .into_iter()
            .min_by_key(|sample| (sample.start - timestamp).abs())
            .map(Resolution::Nearest)
    }

    /// Delete the sample(s) of `kind` recorded at about `timestamp`
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store, `InvalidType` for kinds other
    /// than glucose and insulin, `InvalidArgument` when the window around
    /// `timestamp` is not representable, `QueryError` when the window query fails,
    /// `NotFound` for an empty window and `DeleteFailed` when the store
    /// cannot delete the resolved samples
    #[instrument(skip(self), fields(kind = %kind, timestamp = %timestamp))]
    pub async fn delete(&self, kind: SampleKind, timestamp: DateTime<Utc>) -> AppResult<bool> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }
        if !kind.is_writable() {
            return Err(AppError::invalid_type(kind.identifier()));
        }

        let window = self.window(timestamp)?;
        let candidates = self.reader.query_window(kind, window).await?;
        debug!(candidates = candidates.len(), "Delete window queried");

        let resolution = self
            .resolve_targets(candidates, timestamp)
            .ok_or_else(|| AppError::not_found("No matching sample found"))?;

        let deleted = self
            .store
            .delete(resolution.targets())
            .await
            .map_err(|e| store_error(ErrorCode::DeleteFailed, e))?;
        if !deleted {
            return Err(AppError::delete_failed("Failed to delete samples"));
        }

        info!(
            count = resolution.targets().len(),
            owned = matches!(resolution, Resolution::Owned(_)),
            "Health samples deleted"
        );
        Ok(true)
    }
}
