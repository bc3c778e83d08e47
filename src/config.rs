// ABOUTME: Sync engine configuration loaded from environment variables
// ABOUTME: Horizon, chunking, throttle, reference zone and default metric set with validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Offset, Utc};
use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{defaults, env_config};
use crate::errors::{SyncError, SyncResult};
use crate::models::MetricKind;
use crate::throttle::{FixedDelayThrottle, NoThrottle, Throttle};
use crate::windows::{chunk_for_years, Horizon};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// How many calendar years a full backfill reaches back
    pub horizon_years: u32,
    /// Window size of a backfill, in 365-day years
    pub years_per_chunk: u32,
    /// Pause between window queries; zero disables throttling
    pub throttle_delay: Duration,
    /// Zone used for local day boundaries
    pub reference_offset: FixedOffset,
    /// Metrics synced when the caller does not name any
    pub metrics: BTreeSet<MetricKind>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            horizon_years: defaults::HORIZON_YEARS,
            years_per_chunk: defaults::YEARS_PER_CHUNK,
            throttle_delay: Duration::from_millis(defaults::THROTTLE_DELAY_MS),
            reference_offset: default_offset(),
            metrics: MetricKind::ALL.into_iter().collect(),
        }
    }
}

impl SyncConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Configuration` when a variable is set but cannot be
    /// parsed, or when the result fails [`SyncConfig::validate`].
    pub fn from_env() -> SyncResult<Self> {
        let config = Self {
            horizon_years: parse_env(env_config::HORIZON_YEARS, defaults::HORIZON_YEARS)?,
            years_per_chunk: parse_env(env_config::YEARS_PER_CHUNK, defaults::YEARS_PER_CHUNK)?,
            throttle_delay: Duration::from_millis(parse_env(
                env_config::THROTTLE_MS,
                defaults::THROTTLE_DELAY_MS,
            )?),
            reference_offset: match env::var(env_config::REFERENCE_UTC_OFFSET) {
                Ok(value) => parse_utc_offset(&value)?,
                Err(_) => default_offset(),
            },
            metrics: match env::var(env_config::METRICS) {
                Ok(value) => parse_metrics(&value)?,
                Err(_) => MetricKind::ALL.into_iter().collect(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Configuration` for a zero horizon or chunk size.
    pub fn validate(&self) -> SyncResult<()> {
        if self.horizon_years == 0 {
            return Err(SyncError::config(format!(
                "{} must be at least 1",
                env_config::HORIZON_YEARS
            )));
        }
        if self.years_per_chunk == 0 {
            return Err(SyncError::config(format!(
                "{} must be at least 1",
                env_config::YEARS_PER_CHUNK
            )));
        }
        Ok(())
    }

    /// Maximum backfill window length
    ///
    /// # Errors
    ///
    /// Returns `SyncError::WindowGeneration` when `years_per_chunk` is zero.
    pub fn chunk(&self) -> SyncResult<ChronoDuration> {
        chunk_for_years(self.years_per_chunk)
    }

    /// Backfill horizon ending at `now`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::WindowGeneration` for zero counts.
    pub fn horizon(&self, now: DateTime<Utc>) -> SyncResult<Horizon> {
        Horizon::years_back(
            now,
            self.reference_offset,
            self.horizon_years,
            self.years_per_chunk,
        )
    }

    /// Throttle matching `throttle_delay`
    #[must_use]
    pub fn throttle(&self) -> Arc<dyn Throttle> {
        if self.throttle_delay.is_zero() {
            Arc::new(NoThrottle)
        } else {
            Arc::new(FixedDelayThrottle::new(self.throttle_delay))
        }
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(defaults::REFERENCE_UTC_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Parse an environment variable, using `default` when it is unset
fn parse_env<T>(key: &str, default: T) -> SyncResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|err| SyncError::config(format!("invalid {key} '{value}': {err}"))),
        Err(_) => Ok(default),
    }
}

/// Parse a `+HH:MM` / `-HH:MM` offset
///
/// # Errors
///
/// Returns `SyncError::Configuration` for malformed or out-of-range offsets.
pub fn parse_utc_offset(value: &str) -> SyncResult<FixedOffset> {
    let invalid = || SyncError::config(format!("invalid UTC offset '{value}', expected +HH:MM"));
    let trimmed = value.trim();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..=23).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// Parse a comma-separated metric list; blank entries are ignored
///
/// # Errors
///
/// Returns `SyncError::Configuration` for unknown metric names.
pub fn parse_metrics(value: &str) -> SyncResult<BTreeSet<MetricKind>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(MetricKind::from_str)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_utc_offset("+09:00").unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert!(parse_utc_offset("09:00").is_err());
        assert!(parse_utc_offset("+24:00").is_err());
    }

    #[test]
    fn parses_metric_lists() {
        let metrics = parse_metrics("steps, heart_rate,,").unwrap();
        assert_eq!(
            metrics,
            BTreeSet::from([MetricKind::HeartRate, MetricKind::Steps])
        );
        assert!(parse_metrics("steps,calories").is_err());
    }

    #[test]
    fn defaults_are_valid() {
        let config = SyncConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reference_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(config.metrics.len(), 7);
    }
}
