// ABOUTME: Time window generation for bounded provider queries over a long horizon
// ABOUTME: Splits horizons into contiguous chunks and chunks into local calendar days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Time Windows
//!
//! Providers reject or truncate queries over very large ranges, so history is
//! read in contiguous half-open windows `[start, end)`. Windows never overlap
//! and leave no gaps; the last one is truncated to "now".
//!
//! Local days are computed against a fixed reference offset rather than the
//! host zone, so two devices configured the same way agree on day boundaries.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::constants::defaults;
use crate::errors::{SyncError, SyncResult};

/// Half-open time range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted ranges
    ///
    /// # Errors
    ///
    /// Returns `SyncError::WindowGeneration` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> SyncResult<Self> {
        if start >= end {
            return Err(SyncError::WindowGeneration {
                reason: format!("window start {start} is not before end {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Length of the window
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` falls inside the window
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Split `[horizon_start, now)` into contiguous windows of at most `chunk`
///
/// An empty horizon (`horizon_start >= now`) yields no windows.
///
/// # Errors
///
/// Returns `SyncError::WindowGeneration` when `chunk` is zero or negative.
pub fn generate_windows(
    horizon_start: DateTime<Utc>,
    now: DateTime<Utc>,
    chunk: Duration,
) -> SyncResult<Vec<TimeWindow>> {
    if chunk <= Duration::zero() {
        return Err(SyncError::WindowGeneration {
            reason: format!("chunk size must be positive, got {chunk}"),
        });
    }

    let mut windows = Vec::new();
    let mut start = horizon_start;
    while start < now {
        let end = start
            .checked_add_signed(chunk)
            .map_or(now, |candidate| candidate.min(now));
        windows.push(TimeWindow { start, end });
        start = end;
    }
    Ok(windows)
}

/// Chunk length for a chunk size expressed in years
///
/// # Errors
///
/// Returns `SyncError::WindowGeneration` when `years` is zero.
pub fn chunk_for_years(years: u32) -> SyncResult<Duration> {
    if years == 0 {
        return Err(SyncError::WindowGeneration {
            reason: "years per chunk must be at least 1".to_owned(),
        });
    }
    Ok(Duration::days(defaults::DAYS_PER_CHUNK_YEAR * i64::from(years)))
}

/// Start and chunk size of a backfill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Earliest instant read
    pub start: DateTime<Utc>,
    /// Maximum window length
    pub chunk: Duration,
}

impl Horizon {
    /// Horizon starting at `start`
    #[must_use]
    pub const fn new(start: DateTime<Utc>, chunk: Duration) -> Self {
        Self { start, chunk }
    }

    /// Horizon reaching `horizon_years` calendar years back from the local
    /// midnight of `now`, read in chunks of `years_per_chunk`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::WindowGeneration` when either count is zero or the
    /// horizon falls outside the representable calendar.
    pub fn years_back(
        now: DateTime<Utc>,
        zone: FixedOffset,
        horizon_years: u32,
        years_per_chunk: u32,
    ) -> SyncResult<Self> {
        if horizon_years == 0 {
            return Err(SyncError::WindowGeneration {
                reason: "horizon must cover at least 1 year".to_owned(),
            });
        }
        let chunk = chunk_for_years(years_per_chunk)?;
        let today = local_date(now, zone);
        let first_day = today
            .checked_sub_months(Months::new(horizon_years.saturating_mul(12)))
            .ok_or_else(|| SyncError::WindowGeneration {
                reason: format!("{horizon_years} years before {today} is out of range"),
            })?;
        Ok(Self::new(local_midnight(first_day, zone), chunk))
    }

    /// Windows covering the horizon up to `now`
    ///
    /// # Errors
    ///
    /// Propagates [`generate_windows`] errors.
    pub fn windows(&self, now: DateTime<Utc>) -> SyncResult<Vec<TimeWindow>> {
        generate_windows(self.start, now, self.chunk)
    }
}

/// One local calendar day, possibly truncated by the window it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDay {
    /// Calendar date in the reference zone
    pub date: NaiveDate,
    /// First instant of the day (or of the window, when later)
    pub start: DateTime<Utc>,
    /// End of the day (or of the window, when earlier)
    pub end: DateTime<Utc>,
}

impl LocalDay {
    /// The full local day containing `instant`
    #[must_use]
    pub fn containing(instant: DateTime<Utc>, zone: FixedOffset) -> Self {
        let date = local_date(instant, zone);
        let start = local_midnight(date, zone);
        Self {
            date,
            start,
            end: start + Duration::days(1),
        }
    }

    /// The day as a time window
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        TimeWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// Whether `instant` falls inside the day
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Today's local day in `zone`
#[must_use]
pub fn today(now: DateTime<Utc>, zone: FixedOffset) -> LocalDay {
    LocalDay::containing(now, zone)
}

/// Split a window at local midnights
///
/// The first and last day are truncated to the window bounds, so the days
/// tile the window exactly.
#[must_use]
pub fn split_into_days(window: &TimeWindow, zone: FixedOffset) -> Vec<LocalDay> {
    let mut days = Vec::new();
    let mut cursor = window.start;
    while cursor < window.end {
        let date = local_date(cursor, zone);
        let next_midnight = local_midnight(date, zone) + Duration::days(1);
        let end = next_midnight.min(window.end);
        days.push(LocalDay {
            date,
            start: cursor,
            end,
        });
        cursor = end;
    }
    days
}

/// Calendar date of `instant` in `zone`
#[must_use]
pub fn local_date(instant: DateTime<Utc>, zone: FixedOffset) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// UTC instant of local midnight starting `date` in `zone`
#[must_use]
pub fn local_midnight(date: NaiveDate, zone: FixedOffset) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(i64::from(zone.local_minus_utc()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn local_midnight_respects_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let midnight = local_midnight(date, kst());
        assert_eq!(midnight, Utc.with_ymd_and_hms(2024, 3, 9, 15, 0, 0).unwrap());
        assert_eq!(local_date(midnight, kst()), date);
    }

    #[test]
    fn split_truncates_first_and_last_day() {
        let window = TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, 3, 0, 0).unwrap(),
        )
        .unwrap();
        let days = split_into_days(&window, kst());

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].start, window.start);
        assert_eq!(days[0].end, days[1].start);
        assert_eq!(days[1].end, window.end);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
    }

    #[test]
    fn rejects_inverted_window() {
        let now = Utc::now();
        assert!(TimeWindow::new(now, now).is_err());
    }
}
