// ABOUTME: Generic metric readers that page through provider history in bounded windows
// ABOUTME: Shared run context, cancellation checks and throttled pauses between windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Readers
//!
//! Two reader shapes cover every metric:
//!
//! - [`simple`] readers return every point in range, mapped one-to-one.
//! - [`composite`] readers merge raw points with per-day provider
//!   aggregates into one record per local day.
//!
//! Concrete metrics only describe *what* to query and how to map it
//! ([`sources`]); windowing, progress, throttling and cancellation live here
//! once.

pub mod composite;
pub mod simple;
pub mod sources;

pub use composite::CompositeSource;
pub use simple::SimpleSource;
pub use sources::{
    ActivitySummarySource, BloodPressureSource, ExerciseSource, HeartRateSource, SleepSource,
    StepsSource, WaterIntakeSource,
};

use chrono::FixedOffset;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::errors::{SyncError, SyncResult};
use crate::models::{DeviceIdentity, MetricKind};
use crate::providers::HealthDataProvider;
use crate::throttle::Throttle;

/// Progress callback: `(completed, total)` units of work for one metric
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Everything a reader needs for one run
#[derive(Clone, Copy)]
pub struct ReadContext<'a> {
    /// Store being read
    pub provider: &'a dyn HealthDataProvider,
    /// Device every record is tagged with
    pub device: &'a DeviceIdentity,
    /// Source of "now"
    pub clock: &'a dyn Clock,
    /// Reference zone for local days
    pub zone: FixedOffset,
    /// Pause between windows
    pub throttle: &'a dyn Throttle,
    /// Run cancellation
    pub cancel: &'a CancellationToken,
}

impl ReadContext<'_> {
    /// Fail fast once the run has been cancelled
    pub(crate) fn ensure_active(&self, metric: MetricKind) -> SyncResult<()> {
        if self.cancel.is_cancelled() {
            return Err(SyncError::Cancelled { metric });
        }
        Ok(())
    }

    /// Throttle pause that ends early on cancellation
    pub(crate) async fn pause(&self, metric: MetricKind) -> SyncResult<()> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(SyncError::Cancelled { metric }),
            () = self.throttle.pause() => Ok(()),
        }
    }
}
