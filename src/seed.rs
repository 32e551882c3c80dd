// ABOUTME: Seed file loading for the in-memory health store
// ABOUTME: Reads a JSON list of samples with their producing sources and inserts them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pierre_health_store::{InMemoryHealthStore, SeedSample};
use tracing::info;

/// Parse a seed file: a JSON array of samples, each with an optional `source`
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid seed list
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedSample>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid seed file {}", path.display()))
}

/// Load a seed file into `store`, returning the number of inserted samples
///
/// # Errors
///
/// Returns an error if the seed file cannot be loaded
pub async fn seed_store(store: &InMemoryHealthStore, path: &Path) -> Result<usize> {
    let seeds = load_seed_file(path)?;
    let inserted = store.insert_seed(seeds).await.len();
    info!(path = %path.display(), inserted, "Seeded in-memory health store");
    Ok(inserted)
}
