// ABOUTME: Health data provider interfaces consumed by the sync engine
// ABOUTME: Query request types, provider and device registry traits, and a synthetic provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! Health data provider abstractions.
//!
//! The engine only ever talks to a provider through [`HealthDataProvider`]
//! and [`DeviceRegistry`]. Real providers wrap a platform health store; the
//! [`SyntheticHealthProvider`] keeps everything in memory for development
//! and tests.

// Re-export core modules so provider code can keep `use crate::errors::*`
pub use healthsync_core::constants;
pub use healthsync_core::errors;
pub use healthsync_core::models;

/// Provider and device registry traits
pub mod core;
/// Query request and raw point types
pub mod query;
/// In-memory provider with failure injection and a query log
pub mod synthetic;

pub use core::{DeviceRegistry, HealthDataProvider};
pub use query::{AggregateMetric, AggregateRequest, DataType, PointRequest, RawPoint, TimeFilter};
pub use synthetic::{QueryRecord, SyntheticHealthProvider};
