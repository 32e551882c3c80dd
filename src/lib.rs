// ABOUTME: Main library entry point for the Pierre health record synchronization engine
// ABOUTME: Queries, writes, deletes and observes samples held in a per-device health store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Health Sync
//!
//! Synchronization engine between a host application and an external,
//! per-device health record store. It dispatches typed reads, encodes
//! glucose and insulin writes, resolves approximate-instant deletes, joins
//! concurrent daily statistics and keeps long-lived background observers.
//!
//! ## Architecture
//!
//! - **Codec**: kind/type mapping and record decoding
//! - **Authorization**: one combined read/write grant request
//! - **Read**: typed read dispatcher
//! - **Write**: write encoder and write-permission probe
//! - **Delete**: ownership-then-nearest delete resolver
//! - **Aggregation**: daily steps and distance buckets
//! - **Observer**: background subscriptions with a shared update listener
//! - **Bridge**: host method-call surface
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_health_store::{HealthStore, InMemoryHealthStore};
//! use pierre_health_sync::bridge::{HealthBridge, MethodCall};
//! use pierre_health_sync::config::EngineConfig;
//! use pierre_health_sync::engine::HealthSyncEngine;
//!
//! # async fn example() {
//! let store: Arc<dyn HealthStore> = Arc::new(InMemoryHealthStore::default());
//! let engine = Arc::new(HealthSyncEngine::new(store, &EngineConfig::default()));
//! let bridge = HealthBridge::new(engine);
//! let response = bridge
//!     .handle(&MethodCall::without_arguments("requestAuthorization"))
//!     .await;
//! println!("{}", serde_json::to_string(&response).unwrap_or_default());
//! # }
//! ```

/// Daily step and distance aggregation
pub mod aggregation;

/// Combined authorization request
pub mod authorization;

/// Host method-call bridge
pub mod bridge;

/// Record codec between caller kinds and store samples
pub mod codec;

/// Engine configuration
pub mod config;

/// Application constants
pub mod constants;

/// Delete resolution
pub mod delete;

/// Engine facade
pub mod engine;

/// Structured logging
pub mod logging;

/// Background observer subsystem
pub mod observer;

/// Typed read dispatcher
pub mod read;

/// Seed file loading for the in-memory store
pub mod seed;

/// Write encoder
pub mod write;
