// ABOUTME: Progress reporting for long-running backfills
// ABOUTME: Reporter trait for callers plus a concurrent per-metric progress table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::models::MetricKind;

/// Receives `(metric, completed, total)` updates during a backfill
///
/// Called from the task reading the metric; implementations must be cheap
/// and must not block.
pub trait ProgressReporter: Send + Sync {
    /// One more unit of work finished for `metric`
    fn report(&self, metric: MetricKind, completed: usize, total: usize);
}

impl<F> ProgressReporter for F
where
    F: Fn(MetricKind, usize, usize) + Send + Sync,
{
    fn report(&self, metric: MetricKind, completed: usize, total: usize) {
        self(metric, completed, total);
    }
}

/// Discards updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _metric: MetricKind, _completed: usize, _total: usize) {}
}

/// Logs updates through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingProgress;

impl ProgressReporter for LoggingProgress {
    fn report(&self, metric: MetricKind, completed: usize, total: usize) {
        if completed == total {
            info!(metric = %metric, total, "Metric backfill complete");
        } else {
            debug!(metric = %metric, completed, total, "Metric backfill progress");
        }
    }
}

/// Completed and total units of work for one metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricProgress {
    /// Units done
    pub completed: usize,
    /// Units planned
    pub total: usize,
}

impl MetricProgress {
    /// Fraction done in `[0, 1]`; an empty plan counts as done
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Live progress of the current run, safe to read while metrics update it
#[derive(Debug, Default)]
pub struct RunProgress {
    metrics: DashMap<MetricKind, MetricProgress>,
}

impl RunProgress {
    /// Empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous run
    pub fn reset(&self) {
        self.metrics.clear();
    }

    /// Record an update for `metric`
    pub fn update(&self, metric: MetricKind, completed: usize, total: usize) {
        self.metrics
            .insert(metric, MetricProgress { completed, total });
    }

    /// Progress of one metric
    #[must_use]
    pub fn get(&self, metric: MetricKind) -> Option<MetricProgress> {
        self.metrics.get(&metric).map(|entry| *entry.value())
    }

    /// Ordered copy of every metric's progress
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<MetricKind, MetricProgress> {
        self.metrics
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect()
    }

    /// Sum over all metrics
    #[must_use]
    pub fn overall(&self) -> MetricProgress {
        self.metrics
            .iter()
            .fold(MetricProgress::default(), |acc, entry| MetricProgress {
                completed: acc.completed + entry.completed,
                total: acc.total + entry.total,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn overall_sums_metrics() {
        let progress = RunProgress::new();
        progress.update(MetricKind::Steps, 3, 10);
        progress.update(MetricKind::HeartRate, 1, 2);
        progress.update(MetricKind::Steps, 4, 10);

        assert_eq!(
            progress.overall(),
            MetricProgress {
                completed: 5,
                total: 12
            }
        );
        assert_eq!(progress.get(MetricKind::Steps).unwrap().completed, 4);

        progress.reset();
        assert!(progress.snapshot().is_empty());
    }

    #[test]
    fn empty_plan_counts_as_done() {
        assert!((MetricProgress::default().fraction() - 1.0).abs() < f64::EPSILON);
    }
}
