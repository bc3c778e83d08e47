// ABOUTME: Composite per-day records merging raw points with independently queried totals and goals
// ABOUTME: Defines the presence rule used to skip empty days during historical backfill
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::records::{ExercisePoint, StepsPoint, WaterIntakePoint};

/// Record assembled for one local day of a composite metric
///
/// Totals and goals are queried separately from the points, so a day may
/// carry a non-zero total with no points, or points with a zero total.
/// A day counts as present when any part of it is non-default. A genuine
/// zero day and a day without data are indistinguishable here.
pub trait CompositeRecord {
    /// Local date this record covers
    fn date(&self) -> NaiveDate;

    /// Whether any points, totals or goals are non-default
    fn is_present(&self) -> bool;
}

/// Water intake for one local day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterIntakeRecord {
    /// Local date
    pub date: NaiveDate,
    /// Individual intake events, ordered by time
    pub points: Vec<WaterIntakePoint>,
    /// Daily goal in millilitres
    pub goal: f64,
    /// Daily total in millilitres
    pub total: f64,
}

impl CompositeRecord for WaterIntakeRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_present(&self) -> bool {
        !self.points.is_empty() || self.goal != 0.0 || self.total != 0.0
    }
}

/// Steps for one local day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsRecord {
    /// Local date
    pub date: NaiveDate,
    /// Interval step counts, ordered by time
    pub points: Vec<StepsPoint>,
    /// Daily total
    pub total: f64,
    /// Daily goal
    pub goal: f64,
}

impl CompositeRecord for StepsRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_present(&self) -> bool {
        !self.points.is_empty() || self.total != 0.0 || self.goal != 0.0
    }
}

/// Exercise sessions for one local day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    /// Local date
    pub date: NaiveDate,
    /// Sessions, ordered by start time
    pub points: Vec<ExercisePoint>,
    /// Minutes exercised over the day
    pub total_duration_minutes: f64,
    /// Calories burned by exercise over the day
    pub total_calories: f64,
}

impl CompositeRecord for ExerciseRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_present(&self) -> bool {
        !self.points.is_empty() || self.total_duration_minutes != 0.0 || self.total_calories != 0.0
    }
}

/// Daily activity totals and goals (aggregate only, no points)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummaryRecord {
    /// Local date
    pub date: NaiveDate,
    /// Active calories burned
    pub active_calories: f64,
    /// Active minutes
    pub active_minutes: f64,
    /// Distance covered in metres
    pub distance_meters: f64,
    /// Active calorie goal
    pub active_calories_goal: f64,
    /// Active minutes goal
    pub active_minutes_goal: f64,
}

impl CompositeRecord for ActivitySummaryRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_present(&self) -> bool {
        [
            self.active_calories,
            self.active_minutes,
            self.distance_meters,
            self.active_calories_goal,
            self.active_minutes_goal,
        ]
        .iter()
        .any(|value| *value != 0.0)
    }
}
