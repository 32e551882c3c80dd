// ABOUTME: Integration tests for the authorization manager
// ABOUTME: Verifies the combined grant request and failure mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use pierre_health_core::errors::ErrorCode;
use pierre_health_store::{HealthStore, InMemoryHealthStore, SampleType, StoreOperation};
use pierre_health_sync::authorization::{AuthorizationManager, READ_KINDS, WRITE_KINDS};

use common::{create_test_engine, create_test_store};

#[tokio::test]
async fn test_single_combined_request() {
    let store = create_test_store();
    let engine = create_test_engine(&store);

    assert!(engine.request_authorization().await.unwrap());

    let requests = store.authorization_requests().await;
    assert_eq!(requests.len(), 1);

    let expected_share: BTreeSet<SampleType> =
        [SampleType::BloodGlucose, SampleType::InsulinDelivery].into();
    assert_eq!(requests[0].share, expected_share);

    let expected_read: BTreeSet<SampleType> = [
        SampleType::BloodGlucose,
        SampleType::InsulinDelivery,
        SampleType::Workout,
        SampleType::StepCount,
        SampleType::DistanceWalkingRunning,
        SampleType::SleepAnalysis,
        SampleType::BodyMass,
        SampleType::DietaryWater,
        SampleType::MenstrualFlow,
        SampleType::MindfulSession,
    ]
    .into();
    assert_eq!(requests[0].read, expected_read);
}

#[test]
fn test_declared_kind_sets() {
    assert_eq!(READ_KINDS.len(), 10);
    assert_eq!(WRITE_KINDS.len(), 2);
    assert!(WRITE_KINDS.iter().all(|kind| kind.is_writable()));
    assert!(WRITE_KINDS.iter().all(|kind| READ_KINDS.contains(kind)));
}

#[tokio::test]
async fn test_unavailable_store() {
    let store: Arc<dyn HealthStore> = Arc::new(InMemoryHealthStore::unavailable());
    let manager = AuthorizationManager::new(store);

    let error = manager.request_authorization().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::Unavailable);
}

#[tokio::test]
async fn test_store_failure_reports_reason() {
    let store = create_test_store();
    store
        .inject_failure(StoreOperation::Authorization, None, "Authorization prompt dismissed")
        .await;
    let engine = create_test_engine(&store);

    let error = engine.request_authorization().await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AuthorizationError);
    assert!(error.message.contains("Authorization prompt dismissed"));
    assert!(store.authorization_requests().await.is_empty());
}
