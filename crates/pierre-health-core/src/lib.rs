// ABOUTME: Core types and constants for the Pierre health record sync engine
// ABOUTME: Foundation crate with error codes, sample kinds, units, and read record models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Health Core
//!
//! Foundation crate providing the caller-facing vocabulary of the health
//! sync engine. It has no knowledge of any particular health store.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the `(code, message)` response pair
//! - **models**: sample kinds, time ranges, read records and daily buckets
//! - **units**: `HealthUnit` and dimension-checked conversion
//! - **constants**: sentinel values, defaults and conversion factors

/// Unified error handling with wire-stable error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Caller-facing data models (kinds, records, buckets)
pub mod models;

/// Measurement units and conversion
pub mod units;
