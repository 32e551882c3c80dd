// ABOUTME: Environment configuration for the health sync engine
// ABOUTME: App identity, delete tolerance, observed kinds, background frequency and calendar offset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, FixedOffset, Local, Offset};
use pierre_health_core::constants::{DEFAULT_APP_IDENTITY, DEFAULT_DELETE_TOLERANCE_MS};
use pierre_health_core::models::SampleKind;
use pierre_health_store::BackgroundDeliveryFrequency;
use tracing::info;

use crate::constants::{defaults, env_config};

const SECONDS_PER_MINUTE: i32 = 60;

/// Runtime configuration of the sync engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Bundle identifier treated as "our own" by the delete resolver
    pub app_identity: String,
    /// Half-width of the delete window
    pub delete_tolerance: Duration,
    /// Kinds watched by the background observer
    pub observed_kinds: Vec<SampleKind>,
    /// Background delivery frequency requested per watched kind
    pub background_frequency: BackgroundDeliveryFrequency,
    /// Calendar used to bucket daily activity
    pub utc_offset: FixedOffset,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_identity: DEFAULT_APP_IDENTITY.to_owned(),
            delete_tolerance: Duration::milliseconds(DEFAULT_DELETE_TOLERANCE_MS),
            observed_kinds: vec![SampleKind::Steps, SampleKind::BloodGlucose],
            background_frequency: BackgroundDeliveryFrequency::Immediate,
            utc_offset: Local::now().offset().fix(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed
    pub fn from_env() -> Result<Self> {
        let delete_tolerance_ms: u64 = env_var_or(
            env_config::DELETE_TOLERANCE_MS,
            &DEFAULT_DELETE_TOLERANCE_MS.to_string(),
        )
        .parse()
        .with_context(|| format!("Invalid {} value", env_config::DELETE_TOLERANCE_MS))?;

        let observed_kinds = parse_kinds(&env_var_or(
            env_config::OBSERVED_KINDS,
            defaults::OBSERVED_KINDS,
        ))
        .with_context(|| format!("Invalid {} value", env_config::OBSERVED_KINDS))?;

        let frequency_str = env_var_or(
            env_config::BACKGROUND_FREQUENCY,
            defaults::BACKGROUND_FREQUENCY,
        );
        let background_frequency = BackgroundDeliveryFrequency::parse(&frequency_str)
            .ok_or_else(|| anyhow!("Unknown background frequency '{frequency_str}'"))
            .with_context(|| format!("Invalid {} value", env_config::BACKGROUND_FREQUENCY))?;

        let utc_offset = match env::var(env_config::UTC_OFFSET_MINUTES) {
            Ok(minutes) => parse_offset_minutes(&minutes)
                .with_context(|| format!("Invalid {} value", env_config::UTC_OFFSET_MINUTES))?,
            Err(_) => Local::now().offset().fix(),
        };

        let config = Self {
            app_identity: env_var_or(env_config::APP_IDENTITY, DEFAULT_APP_IDENTITY),
            delete_tolerance: i64::try_from(delete_tolerance_ms)
                .ok()
                .and_then(Duration::try_milliseconds)
                .ok_or_else(|| {
                    anyhow!(
                        "Invalid {} value: {delete_tolerance_ms} ms is too large",
                        env_config::DELETE_TOLERANCE_MS
                    )
                })?,
            observed_kinds,
            background_frequency,
            utc_offset,
        };

        info!(
            app_identity = %config.app_identity,
            delete_tolerance_ms,
            observed_kinds = ?config.observed_kinds,
            background_frequency = ?config.background_frequency,
            utc_offset = %config.utc_offset,
            "Health sync configuration loaded"
        );
        Ok(config)
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a comma-separated kind list, skipping blanks and duplicates
fn parse_kinds(value: &str) -> Result<Vec<SampleKind>> {
    let mut kinds = Vec::new();
    for token in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: SampleKind = token.parse().map_err(|e| anyhow!("{e}"))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    if kinds.is_empty() {
        return Err(anyhow!("At least one observed kind is required"));
    }
    Ok(kinds)
}

fn parse_offset_minutes(value: &str) -> Result<FixedOffset> {
    let minutes: i32 = value.trim().parse()?;
    minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| anyhow!("Offset of {minutes} minutes is out of range"))
}
