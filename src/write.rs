// ABOUTME: Write encoder building single glucose and insulin samples with their metadata tags
// ABOUTME: Also probes write permission by saving and removing a sentinel sample
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pierre_health_core::constants::{
    GLUCOSE_PROBE_VALUE, INSULIN_PROBE_VALUE, WRITE_PROBE_EPOCH_SECS,
};
use pierre_health_core::errors::{AppError, AppResult, ErrorCode};
use pierre_health_core::models::{InsulinDeliveryReason, MealTime, SampleKind};
use pierre_health_store::{HealthStore, NewSample, Quantity};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::codec::{delivery_reason_metadata, meal_time_metadata, sample_type_for, store_error};

/// Optional write arguments, as received from the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOptions {
    /// Glucose meal timing; only the two literal values are honored
    #[serde(default)]
    pub meal_time: Option<String>,
    /// Insulin delivery reason; anything but `basal` means bolus
    #[serde(default)]
    pub reason: Option<String>,
}

impl WriteOptions {
    /// Options carrying a meal timing
    #[must_use]
    pub fn meal_time(meal_time: impl Into<String>) -> Self {
        Self {
            meal_time: Some(meal_time.into()),
            reason: None,
        }
    }

    /// Options carrying a delivery reason
    #[must_use]
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            meal_time: None,
            reason: Some(reason.into()),
        }
    }
}

/// Builds and submits single samples
pub struct WriteEncoder {
    store: Arc<dyn HealthStore>,
}

impl WriteEncoder {
    /// Create an encoder over `store`
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Build the sample a write would submit, with `start == end`
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for kinds other than glucose and insulin and
    /// `InvalidArgument` for a non-finite value
    pub fn encode(
        kind: SampleKind,
        value: f64,
        start: DateTime<Utc>,
        options: &WriteOptions,
    ) -> AppResult<NewSample> {
        if !kind.is_writable() {
            return Err(AppError::invalid_type(kind.identifier()));
        }
        if !value.is_finite() {
            return Err(AppError::invalid_argument(format!("Invalid value: {value}")));
        }
        let unit = kind
            .read_unit()
            .ok_or_else(|| AppError::invalid_type(kind.identifier()))?;
        let sample = NewSample::quantity(
            sample_type_for(kind),
            Quantity::new(value, unit),
            start,
            start,
        );

        let sample = match kind {
            SampleKind::BloodGlucose => {
                match options.meal_time.as_deref().and_then(MealTime::from_wire) {
                    Some(meal_time) => {
                        let (key, value) = meal_time_metadata(meal_time);
                        sample.with_metadata(key, value)
                    }
                    None => sample,
                }
            }
            SampleKind::InsulinDelivery => {
                let reason = InsulinDeliveryReason::from_wire_or_default(options.reason.as_deref());
                let (key, value) = delivery_reason_metadata(reason);
                sample.with_metadata(key, value)
            }
            _ => sample,
        };
        Ok(sample)
    }

    /// Write one glucose or insulin sample at `start`
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` without a store, `InvalidType`/`InvalidArgument`
    /// for bad input and `WriteFailed` when the store rejects the sample
    #[instrument(skip(self, options), fields(kind = %kind, start = %start))]
    pub async fn write(
        &self,
        kind: SampleKind,
        value: f64,
        start: DateTime<Utc>,
        options: &WriteOptions,
    ) -> AppResult<bool> {
        if !self.store.is_available() {
            return Err(AppError::unavailable());
        }
        let sample = Self::encode(kind, value, start, options)?;
        let stored = self
            .store
            .save(sample)
            .await
            .map_err(|e| store_error(ErrorCode::WriteFailed, e))?;
        info!(handle = %stored.handle, "Health sample written");
        Ok(true)
    }

    /// Check write permission by saving then deleting a sentinel sample
    ///
    /// Never fails: any error is reported as `false`.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn probe_write_permission(&self, kind: SampleKind) -> bool {
        if !self.store.is_available() || !kind.is_writable() {
            return false;
        }
        let Some(probe_time) = DateTime::from_timestamp(WRITE_PROBE_EPOCH_SECS, 0) else {
            return false;
        };
        let value = if kind == SampleKind::InsulinDelivery {
            INSULIN_PROBE_VALUE
        } else {
            GLUCOSE_PROBE_VALUE
        };
        let Ok(sample) = Self::encode(kind, value, probe_time, &WriteOptions::default()) else {
            return false;
        };

        match self.store.save(sample).await {
            Ok(stored) => {
                if let Err(e) = self.store.delete(std::slice::from_ref(&stored)).await {
                    warn!(error = %e, handle = %stored.handle, "Failed to remove write-permission probe sample");
                }
                true
            }
            Err(e) => {
                debug!(error = %e, "Write-permission probe rejected");
                false
            }
        }
    }
}
