// ABOUTME: Per-point canonical records for heart rate, sleep, blood pressure, and composite points
// ABOUTME: Each record is built from exactly one provider point and carries device and timing metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::device::{DeviceClass, DeviceIdentity};

/// Metadata shared by every per-point record
///
/// `end_time` is absent for point-in-time samples. When present it is never
/// earlier than `start_time`; mappers reject points that violate this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Device that produced the point
    pub device_id: String,
    /// Class of that device
    pub device_class: DeviceClass,
    /// Start of the measurement
    pub start_time: DateTime<Utc>,
    /// End of the measurement, if it spans time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Offset of the recording zone in seconds east of UTC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i32>,
    /// Application or sensor that wrote the point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RecordMeta {
    /// Metadata for a point recorded on `device`
    #[must_use]
    pub fn new(device: &DeviceIdentity, start_time: DateTime<Utc>) -> Self {
        Self {
            device_id: device.device_id.clone(),
            device_class: device.device_class,
            start_time,
            end_time: None,
            utc_offset: None,
            source: None,
        }
    }

    /// Set the end of the measurement
    #[must_use]
    pub fn with_end_time(mut self, end_time: Option<DateTime<Utc>>) -> Self {
        self.end_time = end_time;
        self
    }

    /// Set the recording zone offset
    #[must_use]
    pub fn with_utc_offset(mut self, utc_offset: Option<i32>) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// Set the source tag
    #[must_use]
    pub fn with_source(mut self, source: Option<String>) -> Self {
        self.source = source;
        self
    }

    /// Span of the measurement, if it has an end
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Heart rate sample (or pre-aggregated sample with min/max)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateRecord {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Beats per minute
    pub value: f64,
    /// Lowest bpm over the sample span (equals `value` for single samples)
    pub min: f64,
    /// Highest bpm over the sample span (equals `value` for single samples)
    pub max: f64,
}

/// Blood pressure reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureRecord {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Systolic pressure (mmHg)
    pub systolic: f64,
    /// Diastolic pressure (mmHg)
    pub diastolic: f64,
    /// Mean arterial pressure (mmHg)
    pub mean: f64,
    /// Pulse measured alongside the reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_rate: Option<f64>,
}

/// One contiguous stretch of sleep inside a sleep record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepSegment {
    /// Segment start
    pub start_time: DateTime<Utc>,
    /// Segment end
    pub end_time: DateTime<Utc>,
    /// Segment length in minutes
    pub duration_minutes: i64,
}

/// Sleep record with its ordered sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Total sleep in minutes
    pub duration_minutes: i64,
    /// Sessions ordered by start time
    pub sessions: Vec<SleepSegment>,
}

/// Single water intake event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterIntakePoint {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Amount drunk in millilitres
    pub amount_ml: f64,
}

/// Step count over a short interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepsPoint {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Steps in the interval
    pub count: i64,
}

/// Single exercise session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePoint {
    /// Timing and device metadata
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// Exercise label as reported by the provider
    pub exercise_type: String,
    /// Session length in minutes
    pub duration_minutes: f64,
    /// Calories burned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Distance covered in metres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}
