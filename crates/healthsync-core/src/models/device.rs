// ABOUTME: Device identity attached to every synced health record
// ABOUTME: Identifies the local device and its class as reported by the device registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of device that produced a record
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Phone
    Mobile,
    /// Smart watch
    Watch,
    /// Fitness band
    Band,
    /// Smart ring
    Ring,
    /// Scale, cuff or other accessory
    Accessory,
    /// Provider did not say
    #[default]
    Unknown,
}

impl DeviceClass {
    /// Lowercase name used in logs and payloads
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Watch => "watch",
            Self::Band => "band",
            Self::Ring => "ring",
            Self::Accessory => "accessory",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the local device; stable for the duration of a sync run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Provider-assigned device identifier
    pub device_id: String,
    /// Device class
    pub device_class: DeviceClass,
}

impl DeviceIdentity {
    /// Create a device identity
    #[must_use]
    pub fn new(device_id: impl Into<String>, device_class: DeviceClass) -> Self {
        Self {
            device_id: device_id.into(),
            device_class,
        }
    }
}
