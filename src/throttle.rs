// ABOUTME: Pluggable pause strategy applied between consecutive window queries
// ABOUTME: Fixed-delay throttle for production courtesy to the provider, no-op throttle for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use std::time::Duration;

/// Pause inserted between two window queries of the same reader
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait before the next window is queried
    async fn pause(&self);
}

/// Sleeps for a fixed delay
#[derive(Debug, Clone, Copy)]
pub struct FixedDelayThrottle {
    delay: Duration,
}

impl FixedDelayThrottle {
    /// Throttle sleeping `delay` between windows
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured delay
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Throttle for FixedDelayThrottle {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

#[async_trait]
impl Throttle for NoThrottle {
    async fn pause(&self) {}
}
