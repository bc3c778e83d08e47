// ABOUTME: Water intake, step and exercise point mappers
// ABOUTME: Produces the per-point records that composite daily records are assembled from
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use super::{optional_f64, record_meta, require_i64, require_non_negative, require_str};
use crate::constants::fields;
use crate::errors::{SyncError, SyncResult};
use crate::models::{DeviceIdentity, ExercisePoint, MetricKind, StepsPoint, WaterIntakePoint};
use crate::providers::RawPoint;

/// Map one water intake event
///
/// # Errors
///
/// Returns `SyncError::Mapping` when `amount_ml` is missing or negative.
pub fn map_water_intake(point: &RawPoint, device: &DeviceIdentity) -> SyncResult<WaterIntakePoint> {
    let metric = MetricKind::WaterIntake;
    Ok(WaterIntakePoint {
        meta: record_meta(point, metric, device)?,
        amount_ml: require_non_negative(point, metric, fields::AMOUNT_ML)?,
    })
}

/// Map one step count interval
///
/// # Errors
///
/// Returns `SyncError::Mapping` when `count` is missing, fractional or negative.
pub fn map_steps(point: &RawPoint, device: &DeviceIdentity) -> SyncResult<StepsPoint> {
    let metric = MetricKind::Steps;
    let meta = record_meta(point, metric, device)?;
    let count = require_i64(point, metric, fields::COUNT)?;
    if count < 0 {
        return Err(SyncError::invalid_field(
            metric,
            fields::COUNT,
            format!("must not be negative, got {count}"),
        ));
    }
    Ok(StepsPoint { meta, count })
}

/// Map one exercise session
///
/// Duration falls back to the session span when missing or `null`.
///
/// # Errors
///
/// Returns `SyncError::Mapping` when the exercise type is missing or no
/// duration can be determined.
pub fn map_exercise(point: &RawPoint, device: &DeviceIdentity) -> SyncResult<ExercisePoint> {
    let metric = MetricKind::Exercise;
    let meta = record_meta(point, metric, device)?;
    let exercise_type = require_str(point, metric, fields::EXERCISE_TYPE)?.to_owned();

    let duration_minutes = match point.field(fields::DURATION_MINUTES) {
        Some(Value::Null) | None => meta
            .duration()
            .map(|span| span.num_seconds() as f64 / 60.0)
            .ok_or_else(|| SyncError::missing_field(metric, fields::DURATION_MINUTES))?,
        Some(_) => require_non_negative(point, metric, fields::DURATION_MINUTES)?,
    };

    Ok(ExercisePoint {
        meta,
        exercise_type,
        duration_minutes,
        calories: optional_f64(point, metric, fields::CALORIES)?,
        distance_meters: optional_f64(point, metric, fields::DISTANCE_METERS)?,
    })
}
