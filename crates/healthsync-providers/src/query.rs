// ABOUTME: Request and response shapes for health data provider queries
// ABOUTME: Point and aggregate requests filtered by instant range or local-date range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Provider-native point type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Heart rate samples
    HeartRate,
    /// Sleep records with sessions
    Sleep,
    /// Blood pressure readings
    BloodPressure,
    /// Water intake events
    WaterIntake,
    /// Step count intervals
    Steps,
    /// Exercise sessions
    Exercise,
}

impl DataType {
    /// Snake case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::Sleep => "sleep",
            Self::BloodPressure => "blood_pressure",
            Self::WaterIntake => "water_intake",
            Self::Steps => "steps",
            Self::Exercise => "exercise",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar aggregate the provider computes per local date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMetric {
    /// Total water drunk (ml)
    WaterIntakeTotal,
    /// Water intake goal (ml)
    WaterIntakeGoal,
    /// Total steps
    StepsTotal,
    /// Step goal
    StepsGoal,
    /// Minutes exercised
    ExerciseDurationTotal,
    /// Calories burned by exercise
    ExerciseCaloriesTotal,
    /// Active calories burned
    ActiveCaloriesTotal,
    /// Active minutes
    ActiveMinutesTotal,
    /// Distance covered (m)
    DistanceTotal,
    /// Active calorie goal
    ActiveCaloriesGoal,
    /// Active minutes goal
    ActiveMinutesGoal,
}

impl AggregateMetric {
    /// Snake case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaterIntakeTotal => "water_intake_total",
            Self::WaterIntakeGoal => "water_intake_goal",
            Self::StepsTotal => "steps_total",
            Self::StepsGoal => "steps_goal",
            Self::ExerciseDurationTotal => "exercise_duration_total",
            Self::ExerciseCaloriesTotal => "exercise_calories_total",
            Self::ActiveCaloriesTotal => "active_calories_total",
            Self::ActiveMinutesTotal => "active_minutes_total",
            Self::DistanceTotal => "distance_total",
            Self::ActiveCaloriesGoal => "active_calories_goal",
            Self::ActiveMinutesGoal => "active_minutes_goal",
        }
    }
}

impl fmt::Display for AggregateMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time filter attached to every provider query; both variants are half-open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeFilter {
    /// `[start, end)` in absolute time
    Instant {
        /// Inclusive start
        start: DateTime<Utc>,
        /// Exclusive end
        end: DateTime<Utc>,
    },
    /// `[start, end)` in local calendar dates
    LocalDate {
        /// Inclusive first date
        start: NaiveDate,
        /// Exclusive last date
        end: NaiveDate,
    },
}

impl TimeFilter {
    /// Instant range filter
    #[must_use]
    pub const fn instant(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::Instant { start, end }
    }

    /// Filter covering exactly one local date
    #[must_use]
    pub fn local_day(date: NaiveDate) -> Self {
        Self::LocalDate {
            start: date,
            end: date.checked_add_days(Days::new(1)).unwrap_or(date),
        }
    }
}

/// Request for raw points of one data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRequest {
    /// Point type to read
    pub data_type: DataType,
    /// Time filter
    pub filter: TimeFilter,
}

impl PointRequest {
    /// Create a point request
    #[must_use]
    pub const fn new(data_type: DataType, filter: TimeFilter) -> Self {
        Self { data_type, filter }
    }
}

/// Request for one aggregate value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRequest {
    /// Aggregate to compute
    pub metric: AggregateMetric,
    /// Time filter
    pub filter: TimeFilter,
}

impl AggregateRequest {
    /// Create an aggregate request
    #[must_use]
    pub const fn new(metric: AggregateMetric, filter: TimeFilter) -> Self {
        Self { metric, filter }
    }
}

/// Provider-native data point
///
/// Timing metadata is typed; metric values travel in a loosely typed field
/// map because every provider names and nests them differently. Mappers
/// pull the fields they need and fail loudly on anything missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// Provider record identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Measurement start
    pub start_time: DateTime<Utc>,
    /// Measurement end, for points that span time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Recording zone offset in seconds east of UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i32>,
    /// Writing application or sensor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Metric values
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawPoint {
    /// Point starting at `start_time` with no fields
    #[must_use]
    pub fn at(start_time: DateTime<Utc>) -> Self {
        Self {
            uid: None,
            start_time,
            end_time: None,
            utc_offset: None,
            source: None,
            fields: Map::new(),
        }
    }

    /// Set the end time
    #[must_use]
    pub fn ending_at(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Set the recording zone offset
    #[must_use]
    pub fn with_offset(mut self, utc_offset: i32) -> Self {
        self.utc_offset = Some(utc_offset);
        self
    }

    /// Set the source tag
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set a metric field
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    /// Look up a metric field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}
