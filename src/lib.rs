// ABOUTME: Health-data synchronization engine library root
// ABOUTME: Windowed backfill and daily sync of health metrics from bounded-range providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # healthsync
//!
//! Pulls health metrics (heart rate, sleep, blood pressure, water intake,
//! steps, exercise, activity summary) out of a provider that only answers
//! bounded time-range queries, normalizes them into device-tagged records
//! and hands them to an upload sink.
//!
//! Two run modes exist:
//!
//! - **today**: one cheap pass over the current local day
//! - **full backfill**: the whole multi-year horizon, read window by window
//!   with a pause between windows, per-metric progress and cancellation
//!
//! Metrics are read concurrently and fail independently.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use healthsync::config::SyncConfig;
//! use healthsync::progress::LoggingProgress;
//! use healthsync::providers::SyntheticHealthProvider;
//! use healthsync::sync::SyncOrchestrator;
//!
//! # async fn run() -> healthsync::errors::SyncResult<()> {
//! let provider = Arc::new(SyntheticHealthProvider::new());
//! let config = SyncConfig::from_env()?;
//! let metrics = config.metrics.clone();
//! let orchestrator = SyncOrchestrator::new(provider.clone(), provider, config);
//! let report = orchestrator.sync_full(&metrics, &LoggingProgress).await?;
//! println!("{:?}", report.status());
//! # Ok(())
//! # }
//! ```

/// Injectable time source
pub mod clock;

/// Environment-driven engine configuration
pub mod config;

/// Run-scoped device identity lookup
pub mod device;

/// Structured logging setup
pub mod logging;

/// Provider point to domain record conversion
pub mod mappers;

/// Progress reporting for backfills
pub mod progress;

/// Generic simple and composite metric readers
pub mod readers;

/// Upload sink abstraction
pub mod sink;

/// Sync orchestration
pub mod sync;

/// Pause strategies between window queries
pub mod throttle;

/// Time window and local day arithmetic
pub mod windows;

pub use healthsync_core::{constants, errors, models};
pub use healthsync_providers as providers;
