// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability interfaces implemented by device adapters.
//!
//! Apps never talk to vendor hardware directly; they depend on a small set
//! of capability traits, and adapters (or the in-process virtual devices)
//! implement them. All traits are async and object-safe, so an app can
//! hold a heterogeneous `Vec<Arc<dyn Switch>>`.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use domo_lib::capability::SwitchHandle;
//! use domo_lib::event::EventBus;
//! use domo_lib::virtual_device::VirtualSwitch;
//!
//! let bus = EventBus::new();
//! let porch = Arc::new(VirtualSwitch::new("Porch light", bus));
//! let handle = SwitchHandle::new(porch.id(), "Porch light", porch);
//! assert_eq!(handle.label(), "Porch light");
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::event::DeviceId;
use crate::types::{ContactState, LockState, PowerState};

/// A device that can be switched on and off.
#[async_trait]
pub trait Switch: Send + Sync {
    /// Turns the device on.
    async fn turn_on(&self) -> Result<()>;

    /// Turns the device off.
    async fn turn_off(&self) -> Result<()>;

    /// Returns the current power state.
    async fn power_state(&self) -> Result<PowerState>;
}

/// A door lock.
#[async_trait]
pub trait Lock: Send + Sync {
    /// Extends the bolt.
    async fn lock(&self) -> Result<()>;

    /// Retracts the bolt.
    async fn unlock(&self) -> Result<()>;

    /// Returns the current lock state.
    async fn lock_state(&self) -> Result<LockState>;
}

/// An open/close contact sensor.
#[async_trait]
pub trait ContactSensor: Send + Sync {
    /// Returns the current contact state.
    async fn contact_state(&self) -> Result<ContactState>;
}

/// A device capable of delivering free-text notifications to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a message.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// A [`Switch`] together with its identity and human-readable label.
///
/// Apps address devices by handle: the id keys scheduling state (e.g. the
/// off-queue) and the label feeds status reports.
#[derive(Clone)]
pub struct SwitchHandle {
    id: DeviceId,
    label: String,
    device: Arc<dyn Switch>,
}

impl SwitchHandle {
    /// Creates a handle for a switch device.
    #[must_use]
    pub fn new(id: DeviceId, label: impl Into<String>, device: Arc<dyn Switch>) -> Self {
        Self {
            id,
            label: label.into(),
            device,
        }
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the underlying switch.
    #[must_use]
    pub fn device(&self) -> &Arc<dyn Switch> {
        &self.device
    }
}

impl std::fmt::Debug for SwitchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwitchHandle")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::virtual_device::VirtualSwitch;

    #[tokio::test]
    async fn handle_exposes_device() {
        let bus = EventBus::new();
        let light = Arc::new(VirtualSwitch::new("Lamp", bus));
        let handle = SwitchHandle::new(light.id(), "Lamp", light.clone());

        handle.device().turn_on().await.unwrap();
        assert_eq!(light.power_state().await.unwrap(), PowerState::On);
    }

    #[test]
    fn handle_debug_omits_device() {
        let bus = EventBus::new();
        let light = Arc::new(VirtualSwitch::new("Lamp", bus));
        let handle = SwitchHandle::new(light.id(), "Lamp", light);
        let debug = format!("{handle:?}");
        assert!(debug.contains("Lamp"));
    }
}
