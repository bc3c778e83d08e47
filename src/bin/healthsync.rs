// ABOUTME: Command-line driver for the health-data sync engine
// ABOUTME: Runs today or full-backfill syncs against a seeded synthetic provider and prints JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Sync today's data for every configured metric
//! cargo run --bin healthsync -- today
//!
//! # Backfill two years of steps and heart rate, one-year windows, no throttle
//! cargo run --bin healthsync -- backfill --metrics steps,heart_rate --horizon-years 2 --no-throttle
//!
//! # Seed 90 days of synthetic history first
//! cargo run --bin healthsync -- --seed-days 90 backfill --horizon-years 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use healthsync::{
    config::{parse_metrics, SyncConfig},
    logging::LoggingConfig,
    progress::LoggingProgress,
    providers::SyntheticHealthProvider,
    sink::{JsonWriterSink, UploadSink},
    sync::{RunStatus, SyncOrchestrator},
    windows::local_date,
};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "healthsync",
    about = "Health data sync engine",
    long_about = "Sync health metrics from a bounded-range provider: today's data or the full historical horizon."
)]
struct HealthSyncArgs {
    #[command(subcommand)]
    command: SyncCommand,

    /// Comma-separated metrics to sync (default: HEALTHSYNC_METRICS or all)
    #[arg(long, global = true)]
    metrics: Option<String>,

    /// Days of synthetic history to seed the provider with
    #[arg(long, global = true, default_value = "30")]
    seed_days: u32,

    /// Seed for synthetic data generation
    #[arg(long, global = true, default_value = "7")]
    seed: u64,

    /// Disable the pause between window queries
    #[arg(long, global = true)]
    no_throttle: bool,

    /// Pretty-print the payload
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum SyncCommand {
    /// Sync the current local day
    Today,
    /// Backfill the whole historical horizon
    Backfill {
        /// Years of history to read
        #[arg(long)]
        horizon_years: Option<u32>,

        /// Years per query window
        #[arg(long)]
        chunk_years: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = HealthSyncArgs::parse();
    LoggingConfig::from_env()
        .init()
        .context("failed to initialize logging")?;

    let mut config = SyncConfig::from_env().context("invalid sync configuration")?;
    if let Some(metrics) = &args.metrics {
        config.metrics = parse_metrics(metrics).context("invalid --metrics")?;
    }
    if args.no_throttle {
        config.throttle_delay = Duration::ZERO;
    }
    if let SyncCommand::Backfill {
        horizon_years,
        chunk_years,
    } = &args.command
    {
        if let Some(years) = horizon_years {
            config.horizon_years = *years;
        }
        if let Some(years) = chunk_years {
            config.years_per_chunk = *years;
        }
    }
    config.validate().context("invalid sync configuration")?;

    let provider = Arc::new(SyntheticHealthProvider::new());
    let today = local_date(chrono::Utc::now(), config.reference_offset);
    provider
        .seed_history(args.seed_days, today, config.reference_offset, args.seed)
        .context("failed to seed synthetic provider")?;
    info!(days = args.seed_days, seed = args.seed, "Seeded synthetic provider");

    let metrics = config.metrics.clone();
    let orchestrator = SyncOrchestrator::new(provider.clone(), provider, config);
    let sink = if args.pretty {
        JsonWriterSink::pretty(io::stdout())
    } else {
        JsonWriterSink::new(io::stdout())
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling sync");
            on_interrupt.cancel();
        }
    });

    let status = match args.command {
        SyncCommand::Today => {
            let report = orchestrator.sync_today_with_cancel(&metrics, cancel).await?;
            let status = report.status();
            eprintln!("{}", serde_json::to_string(&report.summary())?);
            if let Some(payload) = report.into_daily_payload() {
                sink.upload_daily(&payload).await?;
            }
            status
        }
        SyncCommand::Backfill { .. } => {
            let report = orchestrator
                .sync_full_with_cancel(&metrics, &LoggingProgress, cancel)
                .await?;
            let status = report.status();
            eprintln!("{}", serde_json::to_string(&report.summary())?);
            if let Some(payload) = report.into_full_payload() {
                info!(records = payload.record_count(), "Writing backfill payload");
                sink.upload_all(&payload).await?;
            }
            status
        }
    };

    Ok(match status {
        RunStatus::Succeeded => ExitCode::SUCCESS,
        RunStatus::PartiallyFailed => ExitCode::from(2),
        RunStatus::Failed => ExitCode::FAILURE,
    })
}
