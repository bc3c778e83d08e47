// ABOUTME: Structured error types for provider queries, record mapping, and sync runs
// ABOUTME: Provides stable error codes and retry classification for per-metric failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Taxonomy
//!
//! Errors are split in two layers:
//!
//! - [`ProviderError`]: failures reported by the external health data store
//! - [`SyncError`]: everything the engine can report for one metric, including
//!   provider failures, missing devices, bad window configuration, mapping
//!   failures and cancellation
//!
//! A `SyncError` always belongs to exactly one metric. The orchestrator never
//! turns one metric's error into a failure of the whole run.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::MetricKind;

/// Stable error codes used in serialized sync reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Provider rejected the caller's permissions
    #[serde(rename = "PROVIDER_UNAUTHORIZED")]
    ProviderUnauthorized,
    /// Provider could not be reached or answered with a transient failure
    #[serde(rename = "PROVIDER_UNAVAILABLE")]
    ProviderUnavailable,
    /// Provider refused the request shape
    #[serde(rename = "PROVIDER_MALFORMED_REQUEST")]
    ProviderMalformedRequest,
    /// No local device is registered with the provider
    #[serde(rename = "NO_DEVICE_REGISTERED")]
    NoDeviceRegistered,
    /// Window configuration cannot produce a sequence
    #[serde(rename = "WINDOW_GENERATION")]
    WindowGeneration,
    /// A returned point lacks data the mapper requires
    #[serde(rename = "MAPPING_ERROR")]
    MappingError,
    /// The run was cancelled before the metric completed
    #[serde(rename = "CANCELLED")]
    Cancelled,
    /// Another sync run is in flight
    #[serde(rename = "ALREADY_RUNNING")]
    AlreadyRunning,
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid,
}

impl ErrorCode {
    /// Stable code string, identical to the serialized form
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProviderUnauthorized => "PROVIDER_UNAUTHORIZED",
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::ProviderMalformedRequest => "PROVIDER_MALFORMED_REQUEST",
            Self::NoDeviceRegistered => "NO_DEVICE_REGISTERED",
            Self::WindowGeneration => "WINDOW_GENERATION",
            Self::MappingError => "MAPPING_ERROR",
            Self::Cancelled => "CANCELLED",
            Self::AlreadyRunning => "ALREADY_RUNNING",
            Self::ConfigInvalid => "CONFIG_INVALID",
        }
    }

    /// Short human-readable description of this code
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ProviderUnauthorized => "Health data provider denied access",
            Self::ProviderUnavailable => "Health data provider is unavailable",
            Self::ProviderMalformedRequest => "Health data provider rejected the query",
            Self::NoDeviceRegistered => "No local device is registered",
            Self::WindowGeneration => "Time window configuration is invalid",
            Self::MappingError => "A provider record is missing required data",
            Self::Cancelled => "Sync was cancelled",
            Self::AlreadyRunning => "A sync run is already in progress",
            Self::ConfigInvalid => "Configuration is invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported by the external health data provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider refused access (missing permission or revoked consent)
    #[error("{provider} denied access: {message}")]
    Unauthorized {
        /// Provider name
        provider: String,
        /// Provider supplied detail
        message: String,
    },

    /// The provider is not reachable or timed out
    #[error("{provider} is unavailable: {message}")]
    Unavailable {
        /// Provider name
        provider: String,
        /// Provider supplied detail
        message: String,
    },

    /// The provider rejected the request shape
    #[error("{provider} rejected request: {message}")]
    MalformedRequest {
        /// Provider name
        provider: String,
        /// Provider supplied detail
        message: String,
    },
}

impl ProviderError {
    /// Whether retrying the same request later could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Name of the provider that produced this error
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::Unauthorized { provider, .. }
            | Self::Unavailable { provider, .. }
            | Self::MalformedRequest { provider, .. } => provider,
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized { .. } => ErrorCode::ProviderUnauthorized,
            Self::Unavailable { .. } => ErrorCode::ProviderUnavailable,
            Self::MalformedRequest { .. } => ErrorCode::ProviderMalformedRequest,
        }
    }
}

/// Errors produced while syncing one metric
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// A provider query failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The device registry has no local device
    #[error("no local device registered with {provider}")]
    NoDeviceRegistered {
        /// Provider name
        provider: String,
    },

    /// Window generation was asked for a non-positive chunk
    #[error("cannot generate time windows: {reason}")]
    WindowGeneration {
        /// Why the configuration is unusable
        reason: String,
    },

    /// A returned point is missing or has an unusable field
    #[error("{metric} point has invalid field '{field}': {reason}")]
    Mapping {
        /// Metric being mapped
        metric: MetricKind,
        /// Offending field name
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// The run was cancelled before this metric finished
    #[error("{metric} sync cancelled")]
    Cancelled {
        /// Metric that was abandoned
        metric: MetricKind,
    },

    /// A sync run is already in flight on this orchestrator
    #[error("a sync run is already in progress")]
    AlreadyRunning,

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl SyncError {
    /// Build a mapping error for a missing field
    #[must_use]
    pub fn missing_field(metric: MetricKind, field: &str) -> Self {
        Self::Mapping {
            metric,
            field: field.to_owned(),
            reason: "field is missing".to_owned(),
        }
    }

    /// Build a mapping error for a field with the wrong shape or value
    #[must_use]
    pub fn invalid_field(metric: MetricKind, field: &str, reason: impl Into<String>) -> Self {
        Self::Mapping {
            metric,
            field: field.to_owned(),
            reason: reason.into(),
        }
    }

    /// Build a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether re-running the failed metric could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Provider(err) => err.is_retryable(),
            Self::Cancelled { .. } | Self::AlreadyRunning => true,
            Self::NoDeviceRegistered { .. }
            | Self::WindowGeneration { .. }
            | Self::Mapping { .. }
            | Self::Configuration(_) => false,
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Provider(err) => err.code(),
            Self::NoDeviceRegistered { .. } => ErrorCode::NoDeviceRegistered,
            Self::WindowGeneration { .. } => ErrorCode::WindowGeneration,
            Self::Mapping { .. } => ErrorCode::MappingError,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
            Self::AlreadyRunning => ErrorCode::AlreadyRunning,
            Self::Configuration(_) => ErrorCode::ConfigInvalid,
        }
    }
}

/// Result alias used across the engine
pub type SyncResult<T> = Result<T, SyncError>;
