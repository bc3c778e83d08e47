// ABOUTME: Integration tests for environment-driven sync configuration
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use healthsync::config::SyncConfig;
use healthsync::constants::env_config;
use healthsync::errors::{ErrorCode, SyncError};
use healthsync::models::MetricKind;
use serial_test::serial;
use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

const ALL_VARS: [&str; 5] = [
    env_config::HORIZON_YEARS,
    env_config::YEARS_PER_CHUNK,
    env_config::THROTTLE_MS,
    env_config::REFERENCE_UTC_OFFSET,
    env_config::METRICS,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = SyncConfig::from_env().unwrap();

    assert_eq!(config, SyncConfig::default());
    assert_eq!(config.horizon_years, 20);
    assert_eq!(config.years_per_chunk, 1);
    assert_eq!(config.throttle_delay, Duration::from_millis(100));
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var(env_config::HORIZON_YEARS, "5");
    env::set_var(env_config::YEARS_PER_CHUNK, "2");
    env::set_var(env_config::THROTTLE_MS, "0");
    env::set_var(env_config::REFERENCE_UTC_OFFSET, "-03:00");
    env::set_var(env_config::METRICS, "steps,sleep");

    let config = SyncConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.horizon_years, 5);
    assert_eq!(config.years_per_chunk, 2);
    assert!(config.throttle_delay.is_zero());
    assert_eq!(config.reference_offset.local_minus_utc(), -3 * 3600);
    assert_eq!(
        config.metrics,
        BTreeSet::from([MetricKind::Sleep, MetricKind::Steps])
    );
    assert_eq!(config.chunk().unwrap(), chrono::Duration::days(730));
}

#[test]
#[serial]
fn test_zero_chunk_is_a_configuration_error() {
    clear_env();
    env::set_var(env_config::YEARS_PER_CHUNK, "0");

    let err = SyncConfig::from_env().unwrap_err();
    clear_env();

    assert!(matches!(err, SyncError::Configuration(_)));
    assert_eq!(err.code(), ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_unparseable_values_are_rejected() {
    for (var, value) in [
        (env_config::HORIZON_YEARS, "twenty"),
        (env_config::REFERENCE_UTC_OFFSET, "Asia/Seoul"),
        (env_config::METRICS, "steps,vo2max"),
    ] {
        clear_env();
        env::set_var(var, value);
        assert!(SyncConfig::from_env().is_err(), "{var}={value} should be rejected");
    }
    clear_env();
}
