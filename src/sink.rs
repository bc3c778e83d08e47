// ABOUTME: Upload sink abstraction receiving payloads produced by sync runs
// ABOUTME: Ships a JSON writer sink used by the CLI to emit payloads on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

use crate::models::{AllHealthData, DailyHealthData};

/// Upload failures
#[derive(Debug, Error)]
pub enum SinkError {
    /// Payload could not be serialized
    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Destination could not be written
    #[error("failed to write payload: {0}")]
    Io(#[from] std::io::Error),

    /// Destination lock was poisoned by a panicking writer
    #[error("sink writer lock poisoned")]
    Poisoned,
}

/// Destination for sync payloads
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Deliver a "today" payload
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the payload cannot be delivered.
    async fn upload_daily(&self, payload: &DailyHealthData) -> Result<(), SinkError>;

    /// Deliver a full backfill payload
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the payload cannot be delivered.
    async fn upload_all(&self, payload: &AllHealthData) -> Result<(), SinkError>;
}

/// Writes each payload as one JSON document to a writer
pub struct JsonWriterSink<W> {
    writer: Mutex<W>,
    pretty: bool,
}

impl<W: Write + Send> JsonWriterSink<W> {
    /// Compact JSON sink
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: false,
        }
    }

    /// Indented JSON sink
    pub fn pretty(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            pretty: true,
        }
    }

    /// Recover the writer
    ///
    /// # Errors
    ///
    /// Returns `SinkError::Poisoned` if a write panicked.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }

    fn write_json<T: Serialize>(&self, payload: &T) -> Result<(), SinkError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(payload)?
        } else {
            serde_json::to_vec(payload)?
        };
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.write_all(&bytes)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        debug!(bytes = bytes.len(), "Wrote payload");
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> UploadSink for JsonWriterSink<W> {
    async fn upload_daily(&self, payload: &DailyHealthData) -> Result<(), SinkError> {
        self.write_json(payload)
    }

    async fn upload_all(&self, payload: &AllHealthData) -> Result<(), SinkError> {
        self.write_json(payload)
    }
}
