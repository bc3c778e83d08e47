// ABOUTME: Metric kind catalogue and sync mode definitions
// ABOUTME: Classifies each health metric as simple (one query) or composite (points plus aggregates)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::SyncError;

/// Health metric synced by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Heart rate samples
    HeartRate,
    /// Sleep sessions
    Sleep,
    /// Blood pressure readings
    BloodPressure,
    /// Water intake events with daily total and goal
    WaterIntake,
    /// Step counts with daily total and goal
    Steps,
    /// Exercise sessions with daily totals
    Exercise,
    /// Daily activity totals and goals
    ActivitySummary,
}

impl MetricKind {
    /// Every metric, in payload order
    pub const ALL: [Self; 7] = [
        Self::HeartRate,
        Self::Sleep,
        Self::BloodPressure,
        Self::WaterIntake,
        Self::Steps,
        Self::Exercise,
        Self::ActivitySummary,
    ];

    /// Snake case name used in payloads, logs and configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::Sleep => "sleep",
            Self::BloodPressure => "blood_pressure",
            Self::WaterIntake => "water_intake",
            Self::Steps => "steps",
            Self::Exercise => "exercise",
            Self::ActivitySummary => "activity_summary",
        }
    }

    /// Whether the metric needs several queries merged per day
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(
            self,
            Self::WaterIntake | Self::Steps | Self::Exercise | Self::ActivitySummary
        )
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| SyncError::config(format!("unknown metric '{s}'")))
    }
}

/// Kind of sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Cheap sync of the current local day
    Today,
    /// Expensive sync of the whole historical horizon
    FullBackfill,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::FullBackfill => f.write_str("full_backfill"),
        }
    }
}
