// ABOUTME: Sync orchestrator running today and full-backfill syncs across metrics concurrently
// ABOUTME: Isolates per-metric failures, tracks run phase and progress, supports cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Sync Orchestrator
//!
//! One orchestrator owns at most one run at a time. A run resolves the
//! device once, then reads every requested metric concurrently. A metric
//! that fails never affects the others: its error is recorded in the
//! report and the rest of the run carries on.

use chrono::FixedOffset;
use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::phase::{PhaseCell, SyncPhase};
use super::report::SyncReport;
use crate::clock::{Clock, SystemClock};
use crate::config::SyncConfig;
use crate::device::DeviceResolver;
use crate::errors::{SyncError, SyncResult};
use crate::models::{DailyMetric, DeviceIdentity, HistoricalMetric, MetricKind, SyncMode};
use crate::progress::{ProgressReporter, RunProgress};
use crate::providers::{DeviceRegistry, HealthDataProvider};
use crate::readers::{
    composite, simple, ActivitySummarySource, BloodPressureSource, ExerciseSource,
    HeartRateSource, ReadContext, SleepSource, StepsSource, WaterIntakeSource,
};
use crate::throttle::Throttle;
use crate::windows::{local_date, Horizon};

/// Coordinates sync runs against one provider
pub struct SyncOrchestrator {
    provider: Arc<dyn HealthDataProvider>,
    registry: Arc<dyn DeviceRegistry>,
    config: SyncConfig,
    clock: Arc<dyn Clock>,
    throttle: Arc<dyn Throttle>,
    phase: PhaseCell,
    active_token: Mutex<Option<CancellationToken>>,
    progress: RunProgress,
}

impl SyncOrchestrator {
    /// Orchestrator using the system clock and the configured throttle
    #[must_use]
    pub fn new(
        provider: Arc<dyn HealthDataProvider>,
        registry: Arc<dyn DeviceRegistry>,
        config: SyncConfig,
    ) -> Self {
        let throttle = config.throttle();
        Self {
            provider,
            registry,
            config,
            clock: Arc::new(SystemClock),
            throttle,
            phase: PhaseCell::default(),
            active_token: Mutex::new(None),
            progress: RunProgress::new(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the throttle
    #[must_use]
    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current run phase
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase.get()
    }

    /// Live progress of the current (or last) backfill
    #[must_use]
    pub const fn progress(&self) -> &RunProgress {
        &self.progress
    }

    /// Cancel the in-flight run
    ///
    /// Returns `false` when no run is active. Metrics still reading finish
    /// with `SyncError::Cancelled`; their partial results are discarded.
    pub fn cancel(&self) -> bool {
        let token = self
            .active_token
            .lock()
            .ok()
            .and_then(|slot| slot.clone());
        match token {
            Some(token) if self.phase.mark_cancelling() => {
                info!("Cancelling sync run");
                token.cancel();
                true
            }
            _ => false,
        }
    }

    /// Sync the current local day for `metrics`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::AlreadyRunning` when another run is in flight.
    /// Per-metric failures are reported inside the `SyncReport`.
    pub async fn sync_today(
        &self,
        metrics: &BTreeSet<MetricKind>,
    ) -> SyncResult<SyncReport<DailyMetric>> {
        self.sync_today_with_cancel(metrics, CancellationToken::new())
            .await
    }

    /// [`SyncOrchestrator::sync_today`] driven by a caller-owned token
    ///
    /// # Errors
    ///
    /// Returns `SyncError::AlreadyRunning` when another run is in flight.
    pub async fn sync_today_with_cancel(
        &self,
        metrics: &BTreeSet<MetricKind>,
        cancel: CancellationToken,
    ) -> SyncResult<SyncReport<DailyMetric>> {
        let _guard = self.phase.begin(SyncMode::Today)?;
        let mut report = self.open_report(SyncMode::Today, &cancel);
        let span = info_span!("sync_run", run_id = %report.run_id, mode = %SyncMode::Today);

        async {
            info!(metrics = metrics.len(), "Sync run started");
            if !metrics.is_empty() {
                match self.resolve_device().await {
                    Ok(device) => {
                        let ctx = self.read_context(&device, &cancel);
                        let results = join_all(metrics.iter().map(|&metric| async move {
                            (metric, read_today_metric(metric, &ctx).await)
                        }))
                        .await;
                        for (metric, result) in results {
                            log_outcome(metric, &result);
                            report.record(metric, result);
                        }
                        report.device = Some(device);
                    }
                    Err(err) => fail_all(&mut report, metrics, &err),
                }
            }
            self.close_report(&mut report, &cancel);
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    /// Backfill the whole horizon for `metrics`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::AlreadyRunning` when another run is in flight.
    /// Per-metric failures are reported inside the `SyncReport`.
    pub async fn sync_full(
        &self,
        metrics: &BTreeSet<MetricKind>,
        reporter: &dyn ProgressReporter,
    ) -> SyncResult<SyncReport<HistoricalMetric>> {
        self.sync_full_with_cancel(metrics, reporter, CancellationToken::new())
            .await
    }

    /// [`SyncOrchestrator::sync_full`] driven by a caller-owned token
    ///
    /// # Errors
    ///
    /// Returns `SyncError::AlreadyRunning` when another run is in flight.
    pub async fn sync_full_with_cancel(
        &self,
        metrics: &BTreeSet<MetricKind>,
        reporter: &dyn ProgressReporter,
        cancel: CancellationToken,
    ) -> SyncResult<SyncReport<HistoricalMetric>> {
        let _guard = self.phase.begin(SyncMode::FullBackfill)?;
        let mut report = self.open_report(SyncMode::FullBackfill, &cancel);
        let span = info_span!("sync_run", run_id = %report.run_id, mode = %SyncMode::FullBackfill);

        async {
            info!(
                metrics = metrics.len(),
                horizon_years = self.config.horizon_years,
                years_per_chunk = self.config.years_per_chunk,
                "Sync run started"
            );
            if !metrics.is_empty() {
                let prepared = match self.config.horizon(report.started_at) {
                    Ok(horizon) => self.resolve_device().await.map(|device| (horizon, device)),
                    Err(err) => Err(err),
                };
                match prepared {
                    Ok((horizon, device)) => {
                        let ctx = self.read_context(&device, &cancel);
                        let progress = &self.progress;
                        let horizon = &horizon;
                        let results = join_all(metrics.iter().map(|&metric| async move {
                            let on_progress = move |completed: usize, total: usize| {
                                progress.update(metric, completed, total);
                                reporter.report(metric, completed, total);
                            };
                            let result = read_full_metric(metric, &ctx, horizon, &on_progress).await;
                            (metric, result)
                        }))
                        .await;
                        for (metric, result) in results {
                            log_outcome(metric, &result);
                            report.record(metric, result);
                        }
                        report.device = Some(device);
                    }
                    Err(err) => fail_all(&mut report, metrics, &err),
                }
            }
            self.close_report(&mut report, &cancel);
        }
        .instrument(span)
        .await;

        Ok(report)
    }

    fn open_report<T>(&self, mode: SyncMode, cancel: &CancellationToken) -> SyncReport<T> {
        if let Ok(mut slot) = self.active_token.lock() {
            *slot = Some(cancel.clone());
        }
        self.progress.reset();
        let started_at = self.clock.now();
        SyncReport::new(
            Uuid::new_v4(),
            mode,
            local_date(started_at, self.zone()),
            started_at,
        )
    }

    fn close_report<T>(&self, report: &mut SyncReport<T>, cancel: &CancellationToken) {
        if let Ok(mut slot) = self.active_token.lock() {
            *slot = None;
        }
        report.cancelled = cancel.is_cancelled();
        report.finished_at = self.clock.now();
        let failed = report.failed_metrics();
        info!(
            status = ?report.status(),
            succeeded = report.results().len() - failed.len(),
            failed = failed.len(),
            cancelled = report.cancelled,
            "Sync run finished"
        );
    }

    /// Called once per run; every reader of the run shares the identity
    async fn resolve_device(&self) -> SyncResult<DeviceIdentity> {
        DeviceResolver::new(Arc::clone(&self.registry), self.provider.name())
            .resolve()
            .await
    }

    fn read_context<'a>(
        &'a self,
        device: &'a DeviceIdentity,
        cancel: &'a CancellationToken,
    ) -> ReadContext<'a> {
        ReadContext {
            provider: self.provider.as_ref(),
            device,
            clock: self.clock.as_ref(),
            zone: self.zone(),
            throttle: self.throttle.as_ref(),
            cancel,
        }
    }

    const fn zone(&self) -> FixedOffset {
        self.config.reference_offset
    }
}

fn fail_all<T>(report: &mut SyncReport<T>, metrics: &BTreeSet<MetricKind>, err: &SyncError) {
    warn!(error = %err, code = %err.code(), "Sync run could not start reading");
    for &metric in metrics {
        report.record(metric, Err(err.clone()));
    }
}

fn log_outcome<T>(metric: MetricKind, result: &SyncResult<T>) {
    match result {
        Ok(_) => debug!(metric = %metric, "Metric synced"),
        Err(SyncError::Cancelled { .. }) => info!(metric = %metric, "Metric sync cancelled"),
        Err(err) => warn!(
            metric = %metric,
            error = %err,
            code = %err.code(),
            retryable = err.is_retryable(),
            "Metric sync failed"
        ),
    }
}

async fn read_today_metric(metric: MetricKind, ctx: &ReadContext<'_>) -> SyncResult<DailyMetric> {
    match metric {
        MetricKind::HeartRate => simple::read_today(&HeartRateSource, ctx)
            .await
            .map(DailyMetric::HeartRate),
        MetricKind::Sleep => simple::read_today(&SleepSource, ctx)
            .await
            .map(DailyMetric::Sleep),
        MetricKind::BloodPressure => simple::read_today(&BloodPressureSource, ctx)
            .await
            .map(DailyMetric::BloodPressure),
        MetricKind::WaterIntake => composite::read_today(&WaterIntakeSource, ctx)
            .await
            .map(DailyMetric::WaterIntake),
        MetricKind::Steps => composite::read_today(&StepsSource, ctx)
            .await
            .map(DailyMetric::Steps),
        MetricKind::Exercise => composite::read_today(&ExerciseSource, ctx)
            .await
            .map(DailyMetric::Exercise),
        MetricKind::ActivitySummary => composite::read_today(&ActivitySummarySource, ctx)
            .await
            .map(DailyMetric::ActivitySummary),
    }
}

async fn read_full_metric(
    metric: MetricKind,
    ctx: &ReadContext<'_>,
    horizon: &Horizon,
    on_progress: &(dyn Fn(usize, usize) + Send + Sync),
) -> SyncResult<HistoricalMetric> {
    match metric {
        MetricKind::HeartRate => simple::read_all(&HeartRateSource, ctx, horizon, on_progress)
            .await
            .map(HistoricalMetric::HeartRate),
        MetricKind::Sleep => simple::read_all(&SleepSource, ctx, horizon, on_progress)
            .await
            .map(HistoricalMetric::Sleep),
        MetricKind::BloodPressure => {
            simple::read_all(&BloodPressureSource, ctx, horizon, on_progress)
                .await
                .map(HistoricalMetric::BloodPressure)
        }
        MetricKind::WaterIntake => {
            composite::read_all(&WaterIntakeSource, ctx, horizon, on_progress)
                .await
                .map(HistoricalMetric::WaterIntake)
        }
        MetricKind::Steps => composite::read_all(&StepsSource, ctx, horizon, on_progress)
            .await
            .map(HistoricalMetric::Steps),
        MetricKind::Exercise => composite::read_all(&ExerciseSource, ctx, horizon, on_progress)
            .await
            .map(HistoricalMetric::Exercise),
        MetricKind::ActivitySummary => {
            composite::read_all(&ActivitySummarySource, ctx, horizon, on_progress)
                .await
                .map(HistoricalMetric::ActivitySummary)
        }
    }
}
