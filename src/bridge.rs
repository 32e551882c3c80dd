// ABOUTME: Host method-call bridge translating named verbs with JSON arguments into engine calls
// ABOUTME: Validates arguments before any store call and answers with one result or one (code, message)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Host Bridge
//!
//! The host reaches the engine through a request/async-callback channel
//! carrying a method name and a JSON argument object. Instants cross the
//! boundary as epoch milliseconds. Each call produces exactly one
//! [`MethodResponse`].
//!
//! Availability is checked before argument parsing for every verb that
//! touches the store. `isHealthDataAvailable`, the stop verbs and the
//! write-permission probes answer even without a store.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use pierre_health_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
use pierre_health_core::models::{datetime_from_millis, SampleKind, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{arguments, methods};
use crate::engine::HealthSyncEngine;
use crate::logging::HealthLogger;
use crate::write::WriteOptions;

/// One method call from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Verb name
    pub method: String,
    /// Argument object; `null` when the verb takes none
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    /// Call with an argument object
    #[must_use]
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Call without arguments
    #[must_use]
    pub fn without_arguments(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }
}

/// Single resolution of a method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MethodResponse {
    /// Call succeeded
    Success {
        /// Result value
        result: Value,
    },
    /// Call failed with a `(code, message)` pair
    Error(ErrorResponse),
}

impl MethodResponse {
    /// Result value, if the call succeeded
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match self {
            Self::Success { result } => Some(result),
            Self::Error(_) => None,
        }
    }

    /// Error code, if the call failed
    #[must_use]
    pub const fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Success { .. } => None,
            Self::Error(error) => Some(error.code),
        }
    }
}

impl From<AppResult<Value>> for MethodResponse {
    fn from(result: AppResult<Value>) -> Self {
        match result {
            Ok(result) => Self::Success { result },
            Err(error) => Self::Error(error.into()),
        }
    }
}

/// Typed access to a call's argument object
struct Arguments<'a> {
    values: Option<&'a Map<String, Value>>,
}

impl<'a> Arguments<'a> {
    fn parse(raw: &'a Value) -> AppResult<Self> {
        match raw {
            Value::Null => Ok(Self { values: None }),
            Value::Object(values) => Ok(Self {
                values: Some(values),
            }),
            _ => Err(AppError::invalid_argument("Arguments must be a JSON object")),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.values
            .and_then(|values| values.get(key))
            .filter(|value| !value.is_null())
    }

    fn number(&self, key: &str) -> AppResult<f64> {
        self.get(key)
            .ok_or_else(|| AppError::missing_argument(key))?
            .as_f64()
            .ok_or_else(|| AppError::invalid_argument(format!("Argument {key} must be a number")))
    }

    fn string(&self, key: &str) -> AppResult<&'a str> {
        self.get(key)
            .ok_or_else(|| AppError::missing_argument(key))?
            .as_str()
            .ok_or_else(|| AppError::invalid_argument(format!("Argument {key} must be a string")))
    }

    fn optional_string(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    fn kind(&self) -> AppResult<SampleKind> {
        self.string(arguments::TYPE)?.parse()
    }

    fn instant(&self, key: &str) -> AppResult<DateTime<Utc>> {
        datetime_from_millis(self.number(key)?)
    }

    fn range(&self) -> AppResult<TimeRange> {
        TimeRange::from_millis(
            self.number(arguments::START_TIME)?,
            self.number(arguments::END_TIME)?,
        )
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            meal_time: self.optional_string(arguments::MEAL_TIME).map(str::to_owned),
            reason: self.optional_string(arguments::REASON).map(str::to_owned),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::query(format!("Failed to encode result: {e}")).with_source(e))
}

/// Dispatches host method calls onto a [`HealthSyncEngine`]
pub struct HealthBridge {
    engine: Arc<HealthSyncEngine>,
}

impl HealthBridge {
    /// Bridge in front of `engine`
    #[must_use]
    pub const fn new(engine: Arc<HealthSyncEngine>) -> Self {
        Self { engine }
    }

    /// Engine behind this bridge
    #[must_use]
    pub const fn engine(&self) -> &Arc<HealthSyncEngine> {
        &self.engine
    }

    /// Handle one call and log its outcome
    pub async fn handle(&self, call: &MethodCall) -> MethodResponse {
        let started = Instant::now();
        let response = MethodResponse::from(self.dispatch(call).await);
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        HealthLogger::log_method_call(
            &call.method,
            response.error_code().is_none(),
            duration_ms,
            response.error_code(),
        );
        response
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.engine.is_health_data_available() {
            Ok(())
        } else {
            Err(AppError::unavailable())
        }
    }

    async fn dispatch(&self, call: &MethodCall) -> AppResult<Value> {
        match call.method.as_str() {
            methods::IS_HEALTH_DATA_AVAILABLE => {
                Ok(Value::Bool(self.engine.is_health_data_available()))
            }
            methods::STOP_OBSERVING | methods::STOP_BACKGROUND_OBSERVER => {
                self.engine.stop_observing().await.map(Value::Bool)
            }
            methods::TEST_BLOOD_GLUCOSE_WRITE_PERMISSION => Ok(Value::Bool(
                self.engine
                    .probe_write_permission(SampleKind::BloodGlucose)
                    .await,
            )),
            methods::TEST_INSULIN_WRITE_PERMISSION => Ok(Value::Bool(
                self.engine
                    .probe_write_permission(SampleKind::InsulinDelivery)
                    .await,
            )),
            methods::REQUEST_AUTHORIZATION => {
                self.ensure_available()?;
                self.engine.request_authorization().await.map(Value::Bool)
            }
            methods::READ | methods::READ_HEALTH_DATA => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                let kind = args.kind()?;
                let range = args.range()?;
                encode(&self.engine.read(kind, range).await?)
            }
            methods::WRITE | methods::WRITE_HEALTH_DATA => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                let kind = args.kind()?;
                self.write(kind, &args).await
            }
            methods::WRITE_BLOOD_GLUCOSE => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                self.write(SampleKind::BloodGlucose, &args).await
            }
            methods::WRITE_INSULIN => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                self.write(SampleKind::InsulinDelivery, &args).await
            }
            methods::DELETE | methods::DELETE_HEALTH_DATA => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                let kind = args.kind()?;
                self.delete(kind, &args).await
            }
            methods::DELETE_BLOOD_GLUCOSE => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                self.delete(SampleKind::BloodGlucose, &args).await
            }
            methods::DELETE_INSULIN_DELIVERY => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                self.delete(SampleKind::InsulinDelivery, &args).await
            }
            methods::FETCH_DAILY_ACTIVITY => {
                self.ensure_available()?;
                let args = Arguments::parse(&call.arguments)?;
                let range = args.range()?;
                encode(&self.engine.fetch_daily_activity(range).await?)
            }
            methods::START_OBSERVING | methods::START_BACKGROUND_OBSERVER => {
                self.ensure_available()?;
                self.engine.start_observing().await.map(Value::Bool)
            }
            other => Err(AppError::method_not_implemented(other)),
        }
    }

    async fn write(&self, kind: SampleKind, args: &Arguments<'_>) -> AppResult<Value> {
        if !kind.is_writable() {
            return Err(AppError::invalid_type(kind.identifier()));
        }
        let value = args.number(arguments::VALUE)?;
        let start = args.instant(arguments::START_TIME)?;
        let options = args.write_options();
        self.engine
            .write(kind, value, start, &options)
            .await
            .map(Value::Bool)
    }

    async fn delete(&self, kind: SampleKind, args: &Arguments<'_>) -> AppResult<Value> {
        if !kind.is_writable() {
            return Err(AppError::invalid_type(kind.identifier()));
        }
        let timestamp = args.instant(arguments::TIMESTAMP)?;
        self.engine.delete(kind, timestamp).await.map(Value::Bool)
    }
}
