// ABOUTME: Unified error handling for the health sync engine with wire-stable error codes
// ABOUTME: Defines ErrorCode, AppError, AppResult and the (code, message) response pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling
//!
//! Every verb of the sync engine resolves exactly once, either with a value or
//! with an [`AppError`]. The error carries an [`ErrorCode`] that serializes to
//! the code string the host channel expects, plus a human-readable message.
//! Store-reported failures keep the store's message verbatim and attach the
//! store error as `source`.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Standard error codes returned across the host boundary
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// The health store is not present on this platform
    #[serde(rename = "UNAVAILABLE")]
    Unavailable,
    /// Malformed caller input, detected before any store call
    #[serde(rename = "INVALID_ARGS")]
    InvalidArgument,
    /// Unrecognized or unsupported kind string
    #[serde(rename = "INVALID_TYPE")]
    InvalidType,
    /// The store refused or failed the authorization request
    #[serde(rename = "AUTHORIZATION_ERROR")]
    AuthorizationError,
    /// A store query reported failure
    #[serde(rename = "QUERY_ERROR")]
    QueryError,
    /// The store rejected a sample on save
    #[serde(rename = "SAVE_FAILED")]
    WriteFailed,
    /// The store failed to delete the resolved samples
    #[serde(rename = "DELETE_FAILED")]
    DeleteFailed,
    /// A delete window contained no candidate samples
    #[serde(rename = "NOT_FOUND")]
    NotFound,
    /// The bridge received a verb it does not implement
    #[serde(rename = "METHOD_NOT_IMPLEMENTED")]
    MethodNotImplemented,
}

impl ErrorCode {
    /// Wire representation of this code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unavailable => "UNAVAILABLE",
            Self::InvalidArgument => "INVALID_ARGS",
            Self::InvalidType => "INVALID_TYPE",
            Self::AuthorizationError => "AUTHORIZATION_ERROR",
            Self::QueryError => "QUERY_ERROR",
            Self::WriteFailed => "SAVE_FAILED",
            Self::DeleteFailed => "DELETE_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotImplemented => "METHOD_NOT_IMPLEMENTED",
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Unavailable => "Health data is not available on this device",
            Self::InvalidArgument => "The provided arguments are invalid or incomplete",
            Self::InvalidType => "The requested data type is not supported",
            Self::AuthorizationError => "Health data authorization failed",
            Self::QueryError => "Querying the health store failed",
            Self::WriteFailed => "Saving the sample to the health store failed",
            Self::DeleteFailed => "Deleting samples from the health store failed",
            Self::NotFound => "No matching sample was found",
            Self::MethodNotImplemented => "The requested method is not implemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the sync engine
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Underlying error, typically the store failure
    #[source]
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Health store is not available on this platform
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(ErrorCode::Unavailable, "HealthKit not available")
    }

    /// Malformed or missing caller input
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Required argument missing from the call
    #[must_use]
    pub fn missing_argument(name: &str) -> Self {
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Missing required argument: {name}"),
        )
    }

    /// Unsupported kind string
    #[must_use]
    pub fn invalid_type(kind: &str) -> Self {
        Self::new(ErrorCode::InvalidType, format!("Unsupported type: {kind}"))
    }

    /// Authorization request failed
    #[must_use]
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthorizationError, message)
    }

    /// Store query failed
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::QueryError, message)
    }

    /// Store rejected the sample
    #[must_use]
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::WriteFailed, message)
    }

    /// Store failed to delete samples
    #[must_use]
    pub fn delete_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DeleteFailed, message)
    }

    /// No candidate sample found
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Unknown bridge verb
    #[must_use]
    pub fn method_not_implemented(method: &str) -> Self {
        Self::new(
            ErrorCode::MethodNotImplemented,
            format!("Method not implemented: {method}"),
        )
    }

    /// Convert into the `(code, message)` pair returned to the host
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code,
            message: self.message.clone(),
        }
    }
}

/// Failure pair delivered to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Wire error code
    pub code: ErrorCode,
    /// Error message, store detail preserved
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            code: error.code,
            message: error.message,
        }
    }
}
