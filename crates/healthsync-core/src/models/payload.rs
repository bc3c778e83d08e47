// ABOUTME: Upload payload shapes produced by today and full-backfill sync runs
// ABOUTME: Maps each metric kind to its record(s) as a plain serializable structure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::composite::{ActivitySummaryRecord, ExerciseRecord, StepsRecord, WaterIntakeRecord};
use super::device::DeviceIdentity;
use super::metric::MetricKind;
use super::records::{BloodPressureRecord, HeartRateRecord, SleepRecord};

/// Result of a "today" read for one metric
///
/// Simple metrics yield every point of the day; composite metrics yield
/// exactly one merged record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DailyMetric {
    /// Heart rate samples of the day
    HeartRate(Vec<HeartRateRecord>),
    /// Sleep records of the day
    Sleep(Vec<SleepRecord>),
    /// Blood pressure readings of the day
    BloodPressure(Vec<BloodPressureRecord>),
    /// Water intake for the day
    WaterIntake(WaterIntakeRecord),
    /// Steps for the day
    Steps(StepsRecord),
    /// Exercise for the day
    Exercise(ExerciseRecord),
    /// Activity summary for the day
    ActivitySummary(ActivitySummaryRecord),
}

impl DailyMetric {
    /// Metric this entry belongs to
    #[must_use]
    pub const fn metric(&self) -> MetricKind {
        match self {
            Self::HeartRate(_) => MetricKind::HeartRate,
            Self::Sleep(_) => MetricKind::Sleep,
            Self::BloodPressure(_) => MetricKind::BloodPressure,
            Self::WaterIntake(_) => MetricKind::WaterIntake,
            Self::Steps(_) => MetricKind::Steps,
            Self::Exercise(_) => MetricKind::Exercise,
            Self::ActivitySummary(_) => MetricKind::ActivitySummary,
        }
    }
}

/// Result of a full backfill for one metric, ordered by ascending time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HistoricalMetric {
    /// All heart rate samples
    HeartRate(Vec<HeartRateRecord>),
    /// All sleep records
    Sleep(Vec<SleepRecord>),
    /// All blood pressure readings
    BloodPressure(Vec<BloodPressureRecord>),
    /// Water intake for every day with data
    WaterIntake(Vec<WaterIntakeRecord>),
    /// Steps for every day with data
    Steps(Vec<StepsRecord>),
    /// Exercise for every day with data
    Exercise(Vec<ExerciseRecord>),
    /// Activity summary for every day with data
    ActivitySummary(Vec<ActivitySummaryRecord>),
}

impl HistoricalMetric {
    /// Metric this entry belongs to
    #[must_use]
    pub const fn metric(&self) -> MetricKind {
        match self {
            Self::HeartRate(_) => MetricKind::HeartRate,
            Self::Sleep(_) => MetricKind::Sleep,
            Self::BloodPressure(_) => MetricKind::BloodPressure,
            Self::WaterIntake(_) => MetricKind::WaterIntake,
            Self::Steps(_) => MetricKind::Steps,
            Self::Exercise(_) => MetricKind::Exercise,
            Self::ActivitySummary(_) => MetricKind::ActivitySummary,
        }
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::HeartRate(records) => records.len(),
            Self::Sleep(records) => records.len(),
            Self::BloodPressure(records) => records.len(),
            Self::WaterIntake(records) => records.len(),
            Self::Steps(records) => records.len(),
            Self::Exercise(records) => records.len(),
            Self::ActivitySummary(records) => records.len(),
        }
    }

    /// Whether no records are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload of a "today" sync, handed to the upload sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyHealthData {
    /// Device every record was tagged with
    pub device: DeviceIdentity,
    /// Local date synced
    pub date: NaiveDate,
    /// When the run finished
    pub synced_at: DateTime<Utc>,
    /// Successfully synced metrics
    pub metrics: BTreeMap<MetricKind, DailyMetric>,
}

/// Payload of a full backfill, handed to the upload sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllHealthData {
    /// Device every record was tagged with
    pub device: DeviceIdentity,
    /// When the run finished
    pub synced_at: DateTime<Utc>,
    /// Successfully synced metrics
    pub metrics: BTreeMap<MetricKind, HistoricalMetric>,
}

impl AllHealthData {
    /// Total number of records across all metrics
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.metrics.values().map(HistoricalMetric::len).sum()
    }
}
