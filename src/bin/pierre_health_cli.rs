// ABOUTME: Command-line driver for the health sync engine over the in-memory store
// ABOUTME: Seeds samples, runs single bridge calls or scripted call sequences, and lists kinds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Pierre health sync CLI.
//!
//! Usage:
//! ```bash
//! # Read glucose from a seeded store
//! pierre-health-cli --seed samples.json call readHealthData \
//!     '{"type":"BLOOD_GLUCOSE","startTime":1700000000000,"endTime":1700086400000}'
//!
//! # Run a sequence of calls
//! pierre-health-cli --seed samples.json run script.json
//!
//! # List readable kinds
//! pierre-health-cli kinds
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pierre_health_core::models::{KindCategory, SampleKind};
use pierre_health_store::{HealthStore, InMemoryHealthStore};
use pierre_health_sync::bridge::{HealthBridge, MethodCall, MethodResponse};
use pierre_health_sync::config::EngineConfig;
use pierre_health_sync::engine::HealthSyncEngine;
use pierre_health_sync::logging::{self, LoggingConfig};
use pierre_health_sync::observer::UpdateListener;
use pierre_health_sync::seed::seed_store;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pierre-health-cli",
    about = "Pierre Health Sync CLI",
    long_about = "Drive the health record synchronization engine against an in-memory health store"
)]
struct CliArgs {
    /// JSON seed file loaded into the store before running
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Simulate a platform without a health store
    #[arg(long)]
    unavailable: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one bridge method and print its response
    Call {
        /// Method name, e.g. `readHealthData`
        method: String,
        /// JSON argument object
        arguments: Option<String>,
    },
    /// Run a JSON array of `{ "method": ..., "arguments": ... }` calls in order
    Run {
        /// Script file
        script: PathBuf,
    },
    /// List supported kinds with their read units
    Kinds,
}

#[derive(Serialize)]
struct ScriptStep<'a> {
    method: &'a str,
    response: MethodResponse,
}

#[derive(Serialize)]
struct KindInfo {
    kind: &'static str,
    category: &'static str,
    unit: Option<&'static str>,
    writable: bool,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode output")?
    );
    Ok(())
}

fn list_kinds() -> Result<()> {
    let kinds: Vec<KindInfo> = SampleKind::ALL
        .iter()
        .map(|kind| KindInfo {
            kind: kind.identifier(),
            category: match kind.category() {
                KindCategory::Quantity => "quantity",
                KindCategory::Category => "category",
                KindCategory::Workout => "workout",
            },
            unit: kind.read_unit().map(|unit| unit.unit_string()),
            writable: kind.is_writable(),
        })
        .collect();
    print_json(&kinds)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if args.verbose {
        let mut debug_logging = LoggingConfig::from_env();
        debug_logging.level = "debug".into();
        debug_logging.init()?;
    } else {
        logging::init_from_env()?;
    }

    if matches!(args.command, Command::Kinds) {
        return list_kinds();
    }

    let config = EngineConfig::from_env()?;
    let store = Arc::new(InMemoryHealthStore::with_app_identity(&config.app_identity));
    if let Some(seed) = &args.seed {
        seed_store(&store, seed).await?;
    }
    store.set_available(!args.unavailable);

    let shared_store: Arc<dyn HealthStore> = store;
    let engine = Arc::new(HealthSyncEngine::new(shared_store, &config));
    let listener: Arc<dyn UpdateListener> = Arc::new(|| info!("Health data updated"));
    engine.set_update_listener(&listener).await;
    let bridge = HealthBridge::new(engine);

    match args.command {
        Command::Call { method, arguments } => {
            let arguments = match arguments {
                Some(raw) => serde_json::from_str(&raw).context("Arguments must be valid JSON")?,
                None => Value::Null,
            };
            let response = bridge.handle(&MethodCall::new(method, arguments)).await;
            print_json(&response)
        }
        Command::Run { script } => {
            let contents = fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script {}", script.display()))?;
            let calls: Vec<MethodCall> = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid script {}", script.display()))?;
            let mut steps = Vec::with_capacity(calls.len());
            for call in &calls {
                steps.push(ScriptStep {
                    method: &call.method,
                    response: bridge.handle(call).await,
                });
            }
            print_json(&steps)
        }
        Command::Kinds => list_kinds(),
    }
}
