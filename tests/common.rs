// ABOUTME: Shared test utilities for sync engine integration tests
// ABOUTME: Fixed clocks, counting throttle, progress recorders and point builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `healthsync`

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use healthsync::clock::FixedClock;
use healthsync::config::SyncConfig;
use healthsync::constants::fields;
use healthsync::models::{DeviceClass, DeviceIdentity};
use healthsync::errors::ProviderError;
use healthsync::providers::{
    AggregateRequest, HealthDataProvider, PointRequest, RawPoint, SyntheticHealthProvider,
};
use healthsync::readers::ReadContext;
use healthsync::sync::SyncOrchestrator;
use healthsync::throttle::{NoThrottle, Throttle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio_util::sync::CancellationToken;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Reference zone used throughout the tests (+09:00)
pub fn zone() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

/// 2024-06-15 12:00 local time
pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 3, 0, 0).unwrap()
}

/// Local midnight starting 2024-06-15
pub fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn device() -> DeviceIdentity {
    DeviceIdentity::new("synthetic-device-0001", DeviceClass::Watch)
}

/// Throttle that counts pauses instead of sleeping
#[derive(Debug, Default)]
pub struct CountingThrottle {
    pauses: AtomicUsize,
}

impl CountingThrottle {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Throttle for CountingThrottle {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Records every `(completed, total)` progress update
#[derive(Debug, Default)]
pub struct ProgressLog {
    updates: Mutex<Vec<(usize, usize)>>,
}

impl ProgressLog {
    pub fn record(&self, completed: usize, total: usize) {
        self.updates.lock().unwrap().push((completed, total));
    }

    pub fn updates(&self) -> Vec<(usize, usize)> {
        self.updates.lock().unwrap().clone()
    }
}

/// Everything a reader needs, owned by the test
pub struct ReaderHarness {
    pub provider: SyntheticHealthProvider,
    pub device: DeviceIdentity,
    pub clock: FixedClock,
    pub throttle: CountingThrottle,
    pub cancel: CancellationToken,
}

impl ReaderHarness {
    pub fn at(now: DateTime<Utc>) -> Self {
        init_test_logging();
        Self {
            provider: SyntheticHealthProvider::new(),
            device: device(),
            clock: FixedClock::at(now),
            throttle: CountingThrottle::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn ctx(&self) -> ReadContext<'_> {
        ReadContext {
            provider: &self.provider,
            device: &self.device,
            clock: &self.clock,
            zone: zone(),
            throttle: &self.throttle,
            cancel: &self.cancel,
        }
    }
}

/// Provider that returns points newest first
pub struct ReversedProvider {
    pub inner: SyntheticHealthProvider,
}

#[async_trait]
impl HealthDataProvider for ReversedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn query_points(&self, request: &PointRequest) -> Result<Vec<RawPoint>, ProviderError> {
        let mut points = self.inner.query_points(request).await?;
        points.sort_by_key(|point| std::cmp::Reverse(point.start_time));
        Ok(points)
    }

    async fn query_aggregate(&self, request: &AggregateRequest) -> Result<f64, ProviderError> {
        self.inner.query_aggregate(request).await
    }
}

/// Orchestrator over `provider` frozen at `now`, without throttling
pub fn orchestrator(
    provider: &Arc<SyntheticHealthProvider>,
    config: SyncConfig,
    now: DateTime<Utc>,
) -> SyncOrchestrator {
    init_test_logging();
    SyncOrchestrator::new(provider.clone(), provider.clone(), config)
        .with_clock(Arc::new(FixedClock::at(now)))
        .with_throttle(Arc::new(NoThrottle))
}

pub fn heart_rate_point(at: DateTime<Utc>, bpm: f64) -> RawPoint {
    RawPoint::at(at).with_offset(9 * 3600).with_field(fields::BPM, bpm)
}

pub fn steps_point(at: DateTime<Utc>, count: i64) -> RawPoint {
    RawPoint::at(at)
        .ending_at(at + chrono::Duration::minutes(59))
        .with_offset(9 * 3600)
        .with_field(fields::COUNT, count)
}
