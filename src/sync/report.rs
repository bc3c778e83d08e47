// ABOUTME: Outcome of a sync run with per-metric success or failure
// ABOUTME: Derives the run status and converts successes into upload payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::errors::{ErrorCode, SyncError};
use crate::models::{
    AllHealthData, DailyHealthData, DailyMetric, DeviceIdentity, HistoricalMetric, MetricKind,
    SyncMode,
};

/// Overall outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every requested metric succeeded
    Succeeded,
    /// Some metrics succeeded, some failed
    PartiallyFailed,
    /// No metric succeeded, or the run was cancelled
    Failed,
}

/// Per-metric outcome of one run
#[derive(Debug, Clone)]
pub struct SyncReport<T> {
    /// Run identifier, also attached to log lines
    pub run_id: Uuid,
    /// Kind of run
    pub mode: SyncMode,
    /// Local date the run started on
    pub date: NaiveDate,
    /// Device the records are tagged with; `None` when resolution failed
    pub device: Option<DeviceIdentity>,
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// End of the run
    pub finished_at: DateTime<Utc>,
    /// Whether the run was cancelled
    pub cancelled: bool,
    results: BTreeMap<MetricKind, Result<T, SyncError>>,
}

impl<T> SyncReport<T> {
    pub(crate) fn new(
        run_id: Uuid,
        mode: SyncMode,
        date: NaiveDate,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id,
            mode,
            date,
            device: None,
            started_at,
            finished_at: started_at,
            cancelled: false,
            results: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, metric: MetricKind, result: Result<T, SyncError>) {
        self.results.insert(metric, result);
    }

    /// Outcome for one metric
    #[must_use]
    pub fn get(&self, metric: MetricKind) -> Option<&Result<T, SyncError>> {
        self.results.get(&metric)
    }

    /// Every outcome, ordered by metric
    #[must_use]
    pub const fn results(&self) -> &BTreeMap<MetricKind, Result<T, SyncError>> {
        &self.results
    }

    /// Metrics that failed
    #[must_use]
    pub fn failed_metrics(&self) -> BTreeSet<MetricKind> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(metric, _)| *metric)
            .collect()
    }

    /// Metrics that succeeded
    #[must_use]
    pub fn succeeded_metrics(&self) -> BTreeSet<MetricKind> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_ok())
            .map(|(metric, _)| *metric)
            .collect()
    }

    /// Overall status
    ///
    /// An empty run succeeds; a cancelled run fails even when some metrics
    /// finished before the cancellation landed.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        let failed = self.results.values().filter(|result| result.is_err()).count();
        if self.cancelled || (failed > 0 && failed == self.results.len()) {
            RunStatus::Failed
        } else if failed > 0 {
            RunStatus::PartiallyFailed
        } else {
            RunStatus::Succeeded
        }
    }

    /// Serializable summary for logs and CLI output
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            mode: self.mode,
            status: self.status(),
            date: self.date,
            device: self.device.clone(),
            started_at: self.started_at,
            finished_at: self.finished_at,
            succeeded: self.succeeded_metrics(),
            failed: self
                .results
                .iter()
                .filter_map(|(metric, result)| {
                    result.as_ref().err().map(|err| (*metric, MetricFailure::from(err)))
                })
                .collect(),
        }
    }

    fn into_successes(self) -> Option<(DeviceIdentity, DateTime<Utc>, BTreeMap<MetricKind, T>)> {
        let device = self.device?;
        let metrics = self
            .results
            .into_iter()
            .filter_map(|(metric, result)| result.ok().map(|value| (metric, value)))
            .collect();
        Some((device, self.finished_at, metrics))
    }
}

impl SyncReport<DailyMetric> {
    /// Upload payload of the successful metrics; `None` without a device
    #[must_use]
    pub fn into_daily_payload(self) -> Option<DailyHealthData> {
        let date = self.date;
        self.into_successes()
            .map(|(device, synced_at, metrics)| DailyHealthData {
                device,
                date,
                synced_at,
                metrics,
            })
    }
}

impl SyncReport<HistoricalMetric> {
    /// Upload payload of the successful metrics; `None` without a device
    #[must_use]
    pub fn into_full_payload(self) -> Option<AllHealthData> {
        self.into_successes()
            .map(|(device, synced_at, metrics)| AllHealthData {
                device,
                synced_at,
                metrics,
            })
    }
}

/// Why one metric failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricFailure {
    /// Stable error code
    pub code: ErrorCode,
    /// Human readable message
    pub message: String,
    /// Whether a retry could succeed
    pub retryable: bool,
}

impl From<&SyncError> for MetricFailure {
    fn from(err: &SyncError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Serializable view of a [`SyncReport`] without the records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// Kind of run
    pub mode: SyncMode,
    /// Overall status
    pub status: RunStatus,
    /// Local date the run started on
    pub date: NaiveDate,
    /// Resolved device
    pub device: Option<DeviceIdentity>,
    /// Start of the run
    pub started_at: DateTime<Utc>,
    /// End of the run
    pub finished_at: DateTime<Utc>,
    /// Metrics that succeeded
    pub succeeded: BTreeSet<MetricKind>,
    /// Metrics that failed, with the reason
    pub failed: BTreeMap<MetricKind, MetricFailure>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DeviceClass;

    fn report() -> SyncReport<u32> {
        let now = Utc::now();
        SyncReport::new(Uuid::new_v4(), SyncMode::Today, now.date_naive(), now)
    }

    #[test]
    fn empty_report_succeeds() {
        assert_eq!(report().status(), RunStatus::Succeeded);
    }

    #[test]
    fn status_follows_failures() {
        let mut report = report();
        report.record(MetricKind::Steps, Ok(1));
        report.record(MetricKind::Sleep, Err(SyncError::AlreadyRunning));
        assert_eq!(report.status(), RunStatus::PartiallyFailed);
        assert_eq!(report.failed_metrics(), BTreeSet::from([MetricKind::Sleep]));

        report.record(MetricKind::Steps, Err(SyncError::AlreadyRunning));
        assert_eq!(report.status(), RunStatus::Failed);
    }

    #[test]
    fn payload_keeps_only_successes() {
        let mut report: SyncReport<HistoricalMetric> = {
            let now = Utc::now();
            SyncReport::new(Uuid::new_v4(), SyncMode::FullBackfill, now.date_naive(), now)
        };
        report.record(MetricKind::HeartRate, Ok(HistoricalMetric::HeartRate(Vec::new())));
        report.record(
            MetricKind::Sleep,
            Err(SyncError::Cancelled {
                metric: MetricKind::Sleep,
            }),
        );
        assert!(report.clone().into_full_payload().is_none());

        report.device = Some(DeviceIdentity::new("d", DeviceClass::Mobile));
        let payload = report.into_full_payload().unwrap();
        assert_eq!(payload.metrics.len(), 1);
        assert!(payload.metrics.contains_key(&MetricKind::HeartRate));
    }
}
