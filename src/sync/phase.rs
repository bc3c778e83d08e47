// ABOUTME: Lock-free run phase of the sync orchestrator
// ABOUTME: Guards against overlapping runs and returns to idle when a run ends or is dropped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::errors::{SyncError, SyncResult};
use crate::models::SyncMode;

/// Orchestrator run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// No run in flight
    Idle,
    /// Reading the current local day
    SyncingToday,
    /// Reading the whole horizon
    Backfilling,
    /// Cancellation requested, metrics are winding down
    Cancelling,
}

impl SyncPhase {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::SyncingToday,
            2 => Self::Backfilling,
            _ => Self::Cancelling,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::SyncingToday => 1,
            Self::Backfilling => 2,
            Self::Cancelling => 3,
        }
    }

    const fn running(mode: SyncMode) -> Self {
        match mode {
            SyncMode::Today => Self::SyncingToday,
            SyncMode::FullBackfill => Self::Backfilling,
        }
    }

    /// Whether a run is in flight
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::SyncingToday => "syncing_today",
            Self::Backfilling => "backfilling",
            Self::Cancelling => "cancelling",
        })
    }
}

/// Atomic holder for the current phase
#[derive(Debug, Default)]
pub(crate) struct PhaseCell {
    state: AtomicU8,
}

impl PhaseCell {
    pub(crate) fn get(&self) -> SyncPhase {
        SyncPhase::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move from idle to running, or fail if another run holds the cell
    pub(crate) fn begin(&self, mode: SyncMode) -> SyncResult<PhaseGuard<'_>> {
        self.state
            .compare_exchange(
                SyncPhase::Idle.to_u8(),
                SyncPhase::running(mode).to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| SyncError::AlreadyRunning)?;
        Ok(PhaseGuard { cell: self })
    }

    /// Mark a running run as cancelling; returns whether a run was active
    pub(crate) fn mark_cancelling(&self) -> bool {
        self.state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                match SyncPhase::from_u8(current) {
                    SyncPhase::SyncingToday | SyncPhase::Backfilling => {
                        Some(SyncPhase::Cancelling.to_u8())
                    }
                    SyncPhase::Idle | SyncPhase::Cancelling => None,
                }
            })
            .is_ok()
    }
}

/// Returns the cell to idle when the run ends, including when its future is dropped
pub(crate) struct PhaseGuard<'a> {
    cell: &'a PhaseCell,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.cell
            .state
            .store(SyncPhase::Idle.to_u8(), Ordering::Release);
    }
}
