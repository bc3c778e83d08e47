// ABOUTME: Canonical data model for synced health metrics
// ABOUTME: Re-exports metric kinds, device identity, simple and composite records, and payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Canonical Health Records
//!
//! Every record produced by the engine is built by a mapper from exactly one
//! provider point and is immutable afterwards. Composite metrics group those
//! per-point records by local day together with independently queried totals
//! and goals.

/// Composite (per-day) records
pub mod composite;
/// Device identity tagged onto every record
pub mod device;
/// Metric kinds and sync modes
pub mod metric;
/// Upload payload shapes handed to the sink
pub mod payload;
/// Per-point records
pub mod records;

pub use composite::{
    ActivitySummaryRecord, CompositeRecord, ExerciseRecord, StepsRecord, WaterIntakeRecord,
};
pub use device::{DeviceClass, DeviceIdentity};
pub use metric::{MetricKind, SyncMode};
pub use payload::{AllHealthData, DailyHealthData, DailyMetric, HistoricalMetric};
pub use records::{
    BloodPressureRecord, ExercisePoint, HeartRateRecord, RecordMeta, SleepRecord, SleepSegment,
    StepsPoint, WaterIntakePoint,
};
