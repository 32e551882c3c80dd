// ABOUTME: Error type reported by health store implementations
// ABOUTME: Distinguishes absence, authorization, rejection, unit mismatch and backend failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_health_core::units::HealthUnit;

use crate::types::{SampleHandle, SampleType, StoreOperation};

/// Failure reported by a health store
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// No health store on this platform
    #[error("Health data is not available on this device")]
    Unavailable,

    /// The user has not granted sharing for this type
    #[error("Not authorized to share {sample_type}")]
    NotAuthorized {
        /// Type the caller tried to write or delete
        sample_type: SampleType,
    },

    /// The store refused the sample
    #[error("{reason}")]
    Rejected {
        /// Store-provided reason
        reason: String,
    },

    /// A quantity could not be expressed in the requested unit
    #[error("Cannot convert {from} to {to}")]
    IncompatibleUnit {
        /// Unit the value is stored in
        from: HealthUnit,
        /// Requested unit
        to: HealthUnit,
    },

    /// A handle no longer refers to a stored sample
    #[error("Unknown sample {handle}")]
    UnknownSample {
        /// Stale handle
        handle: SampleHandle,
    },

    /// Any other backend failure
    #[error("{operation} failed: {message}")]
    Backend {
        /// Operation that failed
        operation: StoreOperation,
        /// Backend message
        message: String,
    },
}

impl StoreError {
    /// Backend failure for an operation
    #[must_use]
    pub fn backend(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::Backend {
            operation,
            message: message.into(),
        }
    }

    /// Store rejection with a reason
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
