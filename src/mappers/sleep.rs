// ABOUTME: Sleep point mapper
// ABOUTME: Parses nested sleep sessions and derives total duration when not reported
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use super::{parse_timestamp, record_meta, require_i64};
use crate::constants::fields;
use crate::errors::{SyncError, SyncResult};
use crate::models::{DeviceIdentity, MetricKind, SleepRecord, SleepSegment};
use crate::providers::RawPoint;

/// Map a sleep record
///
/// Duration comes from the `duration_minutes` field when present, else the
/// sum of session lengths, else the record's own span.
///
/// # Errors
///
/// Returns `SyncError::Mapping` when a session is malformed or no duration
/// can be determined.
pub fn map_sleep(point: &RawPoint, device: &DeviceIdentity) -> SyncResult<SleepRecord> {
    let metric = MetricKind::Sleep;
    let meta = record_meta(point, metric, device)?;
    let sessions = parse_sessions(point)?;

    let reported = point
        .field(fields::DURATION_MINUTES)
        .is_some_and(|value| !value.is_null());
    let duration_minutes = if reported {
        require_i64(point, metric, fields::DURATION_MINUTES)?
    } else if !sessions.is_empty() {
        sessions.iter().map(|session| session.duration_minutes).sum()
    } else if let Some(span) = meta.duration() {
        span.num_minutes()
    } else {
        return Err(SyncError::missing_field(metric, fields::DURATION_MINUTES));
    };

    if duration_minutes < 0 {
        return Err(SyncError::invalid_field(
            metric,
            fields::DURATION_MINUTES,
            format!("must not be negative, got {duration_minutes}"),
        ));
    }

    Ok(SleepRecord {
        meta,
        duration_minutes,
        sessions,
    })
}

fn parse_sessions(point: &RawPoint) -> SyncResult<Vec<SleepSegment>> {
    let metric = MetricKind::Sleep;
    let entries = match point.field(fields::SESSIONS) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(SyncError::invalid_field(
                metric,
                fields::SESSIONS,
                format!("expected an array, got {other}"),
            ))
        }
    };

    let mut sessions = entries
        .iter()
        .map(|entry| {
            let start_time = parse_timestamp(entry.get(fields::START), metric, fields::START)?;
            let end_time = parse_timestamp(entry.get(fields::END), metric, fields::END)?;
            if end_time < start_time {
                return Err(SyncError::invalid_field(
                    metric,
                    fields::SESSIONS,
                    format!("session ends at {end_time} before it starts at {start_time}"),
                ));
            }
            Ok(SleepSegment {
                start_time,
                end_time,
                duration_minutes: (end_time - start_time).num_minutes(),
            })
        })
        .collect::<SyncResult<Vec<_>>>()?;

    sessions.sort_by_key(|session| session.start_time);
    Ok(sessions)
}
