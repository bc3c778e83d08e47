// ABOUTME: Resolves the local device identity for a sync run
// ABOUTME: Turns an empty device registry into a per-run error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::{SyncError, SyncResult};
use crate::models::DeviceIdentity;
use crate::providers::DeviceRegistry;

/// Device lookup against the provider's registry
///
/// Every call reads the registry. The orchestrator calls it once at the start
/// of a run and hands the identity to every reader of that run.
pub struct DeviceResolver {
    registry: Arc<dyn DeviceRegistry>,
    provider_name: String,
}

impl DeviceResolver {
    /// Resolver over `registry`, naming `provider_name` in errors
    #[must_use]
    pub fn new(registry: Arc<dyn DeviceRegistry>, provider_name: impl Into<String>) -> Self {
        Self {
            registry,
            provider_name: provider_name.into(),
        }
    }

    /// Local device identity
    ///
    /// # Errors
    ///
    /// Returns `SyncError::NoDeviceRegistered` when the registry is empty and
    /// `SyncError::Provider` when it cannot be read.
    pub async fn resolve(&self) -> SyncResult<DeviceIdentity> {
        match self.registry.local_device().await? {
            Some(device) => {
                debug!(
                    device_id = %device.device_id,
                    device_class = %device.device_class,
                    "Resolved local device"
                );
                Ok(device)
            }
            None => {
                warn!(provider = %self.provider_name, "No local device registered");
                Err(SyncError::NoDeviceRegistered {
                    provider: self.provider_name.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::DeviceClass;
    use crate::providers::SyntheticHealthProvider;

    #[tokio::test]
    async fn reads_current_registry_entry() {
        let provider = Arc::new(SyntheticHealthProvider::new());
        let resolver = DeviceResolver::new(provider.clone(), "synthetic");
        let replacement = DeviceIdentity::new("phone-2", DeviceClass::Mobile);

        let first = resolver.resolve().await.unwrap();
        provider.set_device(Some(replacement.clone())).unwrap();

        assert_ne!(first, replacement);
        assert_eq!(resolver.resolve().await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn empty_registry_is_an_error() {
        let provider = Arc::new(SyntheticHealthProvider::new());
        provider.set_device(None).unwrap();
        let resolver = DeviceResolver::new(provider, "synthetic");

        assert_eq!(
            resolver.resolve().await.unwrap_err(),
            SyncError::NoDeviceRegistered {
                provider: "synthetic".to_owned()
            }
        );
    }
}
