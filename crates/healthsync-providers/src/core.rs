// ABOUTME: Core provider traits consumed by the health-data sync engine
// ABOUTME: Defines point and aggregate queries plus local device lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Provider Contract
//!
//! A health data store only answers bounded queries: raw points for a
//! `[start, end)` range, or one scalar aggregate for a range. Everything
//! about windowing, paging through history and merging results lives in the
//! engine; providers stay thin adapters over the platform store.
//!
//! Implementations are expected to carry their own request timeout and to
//! surface it as [`ProviderError::Unavailable`].

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::models::DeviceIdentity;
use crate::query::{AggregateRequest, PointRequest, RawPoint};

/// External health data store
#[async_trait]
pub trait HealthDataProvider: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Read raw points matching the request
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the store refuses or fails the query.
    async fn query_points(&self, request: &PointRequest) -> Result<Vec<RawPoint>, ProviderError>;

    /// Compute one aggregate value for the request's range
    ///
    /// Ranges with no data aggregate to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the store refuses or fails the query.
    async fn query_aggregate(&self, request: &AggregateRequest) -> Result<f64, ProviderError>;
}

/// Registry describing the device the provider runs on
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Identity of the local device, or `None` when nothing is registered
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the registry cannot be read.
    async fn local_device(&self) -> Result<Option<DeviceIdentity>, ProviderError>;
}
