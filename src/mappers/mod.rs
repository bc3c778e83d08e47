// ABOUTME: Conversion of provider-native points into device-tagged domain records
// ABOUTME: Shared field extraction helpers that fail loudly on missing or malformed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Mappers
//!
//! Each mapper is a pure function from one [`RawPoint`] to one domain
//! record. A point missing a required field, or carrying a value of the
//! wrong shape, is a `SyncError::Mapping`: the metric fails rather than
//! uploading a silently defaulted record.

mod activity;
mod sleep;
mod vitals;

pub use activity::{map_exercise, map_steps, map_water_intake};
pub use sleep::map_sleep;
pub use vitals::{map_blood_pressure, map_heart_rate};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::errors::{SyncError, SyncResult};
use crate::models::{DeviceIdentity, MetricKind, RecordMeta};
use crate::providers::RawPoint;

/// Timing and device metadata shared by every record
///
/// Rejects points whose end precedes their start.
pub(crate) fn record_meta(
    point: &RawPoint,
    metric: MetricKind,
    device: &DeviceIdentity,
) -> SyncResult<RecordMeta> {
    if let Some(end) = point.end_time {
        if end < point.start_time {
            return Err(SyncError::invalid_field(
                metric,
                "end_time",
                format!("end {end} precedes start {}", point.start_time),
            ));
        }
    }
    Ok(RecordMeta::new(device, point.start_time)
        .with_end_time(point.end_time)
        .with_utc_offset(point.utc_offset)
        .with_source(point.source.clone()))
}

/// Field that must be present; JSON `null` counts as missing
fn present<'a>(point: &'a RawPoint, metric: MetricKind, field: &str) -> SyncResult<&'a Value> {
    match point.field(field) {
        Some(Value::Null) | None => Err(SyncError::missing_field(metric, field)),
        Some(value) => Ok(value),
    }
}

fn as_number(value: &Value, metric: MetricKind, field: &str) -> SyncResult<f64> {
    value
        .as_f64()
        .filter(|number| number.is_finite())
        .ok_or_else(|| SyncError::invalid_field(metric, field, format!("expected a number, got {value}")))
}

/// Required numeric field
pub(crate) fn require_f64(point: &RawPoint, metric: MetricKind, field: &str) -> SyncResult<f64> {
    as_number(present(point, metric, field)?, metric, field)
}

/// Optional numeric field; present but non-numeric is still an error
pub(crate) fn optional_f64(
    point: &RawPoint,
    metric: MetricKind,
    field: &str,
) -> SyncResult<Option<f64>> {
    match point.field(field) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => as_number(value, metric, field).map(Some),
    }
}

/// Required numeric field that may not be negative
pub(crate) fn require_non_negative(
    point: &RawPoint,
    metric: MetricKind,
    field: &str,
) -> SyncResult<f64> {
    let value = require_f64(point, metric, field)?;
    if value < 0.0 {
        return Err(SyncError::invalid_field(
            metric,
            field,
            format!("must not be negative, got {value}"),
        ));
    }
    Ok(value)
}

/// Required whole-number field; integral floats are accepted
pub(crate) fn require_i64(point: &RawPoint, metric: MetricKind, field: &str) -> SyncResult<i64> {
    let value = present(point, metric, field)?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|number| number.is_finite() && number.fract() == 0.0)
                .map(|number| number as i64)
        })
        .ok_or_else(|| {
            SyncError::invalid_field(metric, field, format!("expected a whole number, got {value}"))
        })
}

/// Required non-empty string field
pub(crate) fn require_str<'a>(
    point: &'a RawPoint,
    metric: MetricKind,
    field: &str,
) -> SyncResult<&'a str> {
    match present(point, metric, field)? {
        Value::String(text) if !text.trim().is_empty() => Ok(text.as_str()),
        other => Err(SyncError::invalid_field(
            metric,
            field,
            format!("expected a non-empty string, got {other}"),
        )),
    }
}

/// RFC 3339 timestamp nested inside another field
pub(crate) fn parse_timestamp(
    value: Option<&Value>,
    metric: MetricKind,
    field: &str,
) -> SyncResult<DateTime<Utc>> {
    let text = value
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::missing_field(metric, field))?;
    DateTime::parse_from_rfc3339(text)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| SyncError::invalid_field(metric, field, err.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DeviceClass;
    use chrono::Duration;

    fn device() -> DeviceIdentity {
        DeviceIdentity::new("watch-1", DeviceClass::Watch)
    }

    #[test]
    fn meta_rejects_inverted_range() {
        let start = Utc::now();
        let point = RawPoint::at(start).ending_at(start - Duration::minutes(1));
        let err = record_meta(&point, MetricKind::Sleep, &device()).unwrap_err();
        assert!(matches!(err, SyncError::Mapping { ref field, .. } if field == "end_time"));
    }

    #[test]
    fn null_counts_as_missing() {
        let point = RawPoint::at(Utc::now()).with_field("bpm", Value::Null);
        let err = require_f64(&point, MetricKind::HeartRate, "bpm").unwrap_err();
        assert_eq!(err, SyncError::missing_field(MetricKind::HeartRate, "bpm"));
        assert_eq!(optional_f64(&point, MetricKind::HeartRate, "bpm").unwrap(), None);
    }

    #[test]
    fn integral_float_accepted_as_whole_number() {
        let point = RawPoint::at(Utc::now())
            .with_field("count", 42.0)
            .with_field("bad", 1.5);
        assert_eq!(require_i64(&point, MetricKind::Steps, "count").unwrap(), 42);
        assert!(require_i64(&point, MetricKind::Steps, "bad").is_err());
    }
}
