// ABOUTME: Sync run coordination: orchestrator, run phase and run reports
// ABOUTME: Entry point for today and full-backfill synchronization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod orchestrator;
mod phase;
mod report;

pub use orchestrator::SyncOrchestrator;
pub use phase::SyncPhase;
pub use report::{MetricFailure, RunStatus, RunSummary, SyncReport};
