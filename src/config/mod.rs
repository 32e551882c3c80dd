// ABOUTME: Configuration management module for the health sync engine
// ABOUTME: Re-exports the environment-driven EngineConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for Pierre Health Sync

/// Engine configuration from environment variables
pub mod environment;

pub use environment::EngineConfig;
