// ABOUTME: Tests for logging configuration and bridge call logging
// ABOUTME: Validates environment handling, defaults and subscriber installation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_health_core::errors::ErrorCode;
use pierre_health_sync::logging::{init_from_env, HealthLogger, LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const LOGGING_VARS: [&str; 6] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "ENVIRONMENT",
    "SERVICE_NAME",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_THREAD",
];

fn clear_logging_env() {
    for var in LOGGING_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_logging_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("SERVICE_NAME", "health-sync-test");

    let config = LoggingConfig::from_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.environment, "production");
    assert_eq!(config.service_name, "health-sync-test");
    // Production always carries location and thread details
    assert!(config.include_location);
    assert!(config.include_thread);

    clear_logging_env();
}

#[test]
#[serial]
fn test_compact_format_and_explicit_location() {
    clear_logging_env();
    env::set_var("LOG_FORMAT", "compact");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();

    assert_eq!(config.format, LogFormat::Compact);
    assert!(config.include_location);
    assert!(!config.include_thread);

    clear_logging_env();
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.environment, "development");
    assert_eq!(config.service_name, "pierre-health-sync");
    assert!(!config.include_location);
}

#[test]
#[serial]
fn test_second_subscriber_install_fails() {
    clear_logging_env();
    env::set_var("LOG_FORMAT", "compact");

    // Only one global subscriber may be installed per process
    let _ = init_from_env();
    assert!(LoggingConfig::from_env().init().is_err());

    HealthLogger::log_method_call("readHealthData", true, 3, None);
    HealthLogger::log_method_call("deleteBloodGlucose", false, 5, Some(ErrorCode::NotFound));

    clear_logging_env();
}
