// ABOUTME: Core types and constants for the health-data synchronization engine
// ABOUTME: Foundation crate with error handling, canonical records, and upload payload shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Healthsync Core
//!
//! Foundation crate shared by the provider interfaces and the sync engine.
//! It changes rarely, so the heavier crates above it recompile less often.
//!
//! ## Modules
//!
//! - **errors**: `SyncError`, `ProviderError` and stable `ErrorCode`s
//! - **constants**: engine defaults and provider field names
//! - **models**: metric kinds, device identity, records and payloads

/// Unified error handling for provider queries, mapping and sync runs
pub mod errors;

/// Engine defaults and provider field names
pub mod constants;

/// Canonical health records and upload payloads
pub mod models;

pub use errors::{ErrorCode, ProviderError, SyncError, SyncResult};
