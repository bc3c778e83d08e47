// ABOUTME: Engine-wide constants for sync defaults, environment keys, and provider field names
// ABOUTME: Centralizes tunables so readers, config, and the synthetic provider agree on values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default tunables for sync runs
pub mod defaults {
    /// Years of history covered by a full backfill
    pub const HORIZON_YEARS: u32 = 20;

    /// Years covered by one range query during backfill
    pub const YEARS_PER_CHUNK: u32 = 1;

    /// Days in one chunk-year; chunks are whole days so they stay aligned to local midnight
    pub const DAYS_PER_CHUNK_YEAR: i64 = 365;

    /// Pause between consecutive window queries (milliseconds)
    pub const THROTTLE_DELAY_MS: u64 = 100;

    /// Offset of the reference zone used for daily cutoffs (seconds east of UTC)
    pub const REFERENCE_UTC_OFFSET_SECS: i32 = 9 * 3600;

    /// Service name used in structured logs
    pub const SERVICE_NAME: &str = "healthsync";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Full backfill horizon in years
    pub const HORIZON_YEARS: &str = "HEALTHSYNC_HORIZON_YEARS";
    /// Years per backfill query window
    pub const YEARS_PER_CHUNK: &str = "HEALTHSYNC_YEARS_PER_CHUNK";
    /// Inter-window throttle delay in milliseconds
    pub const THROTTLE_MS: &str = "HEALTHSYNC_THROTTLE_MS";
    /// Reference zone as `+HH:MM`
    pub const REFERENCE_UTC_OFFSET: &str = "HEALTHSYNC_REFERENCE_UTC_OFFSET";
    /// Comma separated metric names
    pub const METRICS: &str = "HEALTHSYNC_METRICS";
}

/// Provider names
pub mod providers {
    /// In-memory provider used for development and tests
    pub const SYNTHETIC: &str = "synthetic";
}

/// Field names carried by provider points
pub mod fields {
    /// Heart rate sample value
    pub const BPM: &str = "bpm";
    /// Minimum over an aggregated sample
    pub const MIN: &str = "min";
    /// Maximum over an aggregated sample
    pub const MAX: &str = "max";

    /// Systolic pressure (mmHg)
    pub const SYSTOLIC: &str = "systolic";
    /// Diastolic pressure (mmHg)
    pub const DIASTOLIC: &str = "diastolic";
    /// Mean arterial pressure (mmHg)
    pub const MEAN: &str = "mean";
    /// Pulse rate measured with blood pressure
    pub const PULSE_RATE: &str = "pulse_rate";

    /// Total sleep or exercise duration in minutes
    pub const DURATION_MINUTES: &str = "duration_minutes";
    /// Sleep session list
    pub const SESSIONS: &str = "sessions";
    /// Session start (RFC 3339)
    pub const START: &str = "start";
    /// Session end (RFC 3339)
    pub const END: &str = "end";

    /// Water intake amount in millilitres
    pub const AMOUNT_ML: &str = "amount_ml";
    /// Step count
    pub const COUNT: &str = "count";

    /// Exercise type label
    pub const EXERCISE_TYPE: &str = "exercise_type";
    /// Calories burned
    pub const CALORIES: &str = "calories";
    /// Distance in metres
    pub const DISTANCE_METERS: &str = "distance_meters";
}
