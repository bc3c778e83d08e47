// ABOUTME: Heart rate and blood pressure point mappers
// ABOUTME: Fills derived values (min/max, mean arterial pressure) when the provider omits them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{optional_f64, record_meta, require_non_negative};
use crate::constants::fields;
use crate::errors::{SyncError, SyncResult};
use crate::models::{BloodPressureRecord, DeviceIdentity, HeartRateRecord, MetricKind};
use crate::providers::RawPoint;

/// Map a heart rate sample
///
/// Single samples carry no range, so `min` and `max` default to the value.
///
/// # Errors
///
/// Returns `SyncError::Mapping` when `bpm` is missing or the range is inverted.
pub fn map_heart_rate(point: &RawPoint, device: &DeviceIdentity) -> SyncResult<HeartRateRecord> {
    let metric = MetricKind::HeartRate;
    let meta = record_meta(point, metric, device)?;
    let value = require_non_negative(point, metric, fields::BPM)?;
    let min = optional_f64(point, metric, fields::MIN)?.unwrap_or(value);
    let max = optional_f64(point, metric, fields::MAX)?.unwrap_or(value);

    if min > max {
        return Err(SyncError::invalid_field(
            metric,
            fields::MIN,
            format!("min {min} exceeds max {max}"),
        ));
    }

    Ok(HeartRateRecord {
        meta,
        value,
        min,
        max,
    })
}

/// Map a blood pressure reading
///
/// Mean arterial pressure is estimated as `(systolic + 2 * diastolic) / 3`
/// when the provider does not report it.
///
/// # Errors
///
/// Returns `SyncError::Mapping` when either pressure is missing or
/// diastolic exceeds systolic.
pub fn map_blood_pressure(
    point: &RawPoint,
    device: &DeviceIdentity,
) -> SyncResult<BloodPressureRecord> {
    let metric = MetricKind::BloodPressure;
    let meta = record_meta(point, metric, device)?;
    let systolic = require_non_negative(point, metric, fields::SYSTOLIC)?;
    let diastolic = require_non_negative(point, metric, fields::DIASTOLIC)?;

    if diastolic > systolic {
        return Err(SyncError::invalid_field(
            metric,
            fields::DIASTOLIC,
            format!("diastolic {diastolic} exceeds systolic {systolic}"),
        ));
    }

    let mean = optional_f64(point, metric, fields::MEAN)?
        .unwrap_or_else(|| diastolic.mul_add(2.0, systolic) / 3.0);

    Ok(BloodPressureRecord {
        meta,
        systolic,
        diastolic,
        mean,
        pulse_rate: optional_f64(point, metric, fields::PULSE_RATE)?,
    })
}
