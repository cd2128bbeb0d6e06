// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual child devices and their registry.
//!
//! Apps that need a user-visible device of their own (the ad-blocker's
//! switch, the dew point app's sensor) create virtual children. A virtual
//! device holds its own state, implements the matching capability trait,
//! and publishes a [`DeviceEvent`] whenever its state changes.
//!
//! The [`VirtualDeviceRegistry`] provides create-or-lookup by label, so an
//! app re-initializing finds its existing child instead of creating a
//! duplicate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::capability::Switch;
use crate::error::Result;
use crate::event::{DeviceEvent, DeviceId, EventBus, EventKind};
use crate::types::PowerState;

/// A virtual on/off switch.
///
/// State changes are published to the event bus, which is how the owning
/// app observes commands issued against its child (e.g. from a UI).
///
/// # Examples
///
/// ```
/// use domo_lib::capability::Switch;
/// use domo_lib::event::EventBus;
/// use domo_lib::types::PowerState;
/// use domo_lib::virtual_device::VirtualSwitch;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> domo_lib::Result<()> {
/// let bus = EventBus::new();
/// let switch = VirtualSwitch::new("Ad blocking", bus);
///
/// switch.turn_on().await?;
/// assert_eq!(switch.power_state().await?, PowerState::On);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VirtualSwitch {
    id: DeviceId,
    label: String,
    state: Mutex<PowerState>,
    bus: EventBus,
}

impl VirtualSwitch {
    /// Creates a new virtual switch, initially off.
    #[must_use]
    pub fn new(label: impl Into<String>, bus: EventBus) -> Self {
        Self {
            id: DeviceId::new(),
            label: label.into(),
            state: Mutex::new(PowerState::Off),
            bus,
        }
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the state without going through a capability command.
    ///
    /// Used by apps to mirror external state (e.g. appliance status polled
    /// over HTTP) onto the child. Publishes an event only when the state
    /// actually changes.
    pub fn set_state(&self, state: PowerState) {
        let changed = {
            let mut current = self.state.lock();
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        };

        if changed {
            tracing::debug!(device = %self.label, state = %state, "virtual switch changed");
            self.bus
                .publish(DeviceEvent::new(self.id, EventKind::Switch(state)));
        }
    }

    /// Returns the current state synchronously.
    #[must_use]
    pub fn current_state(&self) -> PowerState {
        *self.state.lock()
    }
}

#[async_trait]
impl Switch for VirtualSwitch {
    async fn turn_on(&self) -> Result<()> {
        self.set_state(PowerState::On);
        Ok(())
    }

    async fn turn_off(&self) -> Result<()> {
        self.set_state(PowerState::Off);
        Ok(())
    }

    async fn power_state(&self) -> Result<PowerState> {
        Ok(self.current_state())
    }
}

/// A virtual numeric sensor (e.g. a computed dew point).
#[derive(Debug)]
pub struct VirtualSensor {
    id: DeviceId,
    label: String,
    unit: String,
    value: Mutex<Option<f64>>,
    bus: EventBus,
}

impl VirtualSensor {
    /// Creates a new virtual sensor with no reading yet.
    #[must_use]
    pub fn new(label: impl Into<String>, unit: impl Into<String>, bus: EventBus) -> Self {
        Self {
            id: DeviceId::new(),
            label: label.into(),
            unit: unit.into(),
            value: Mutex::new(None),
            bus,
        }
    }

    /// Returns the device id.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the unit label.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the latest reading, if any.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        *self.value.lock()
    }

    /// Updates the reading and publishes an event when it changed.
    pub fn set_value(&self, value: f64) {
        let changed = {
            let mut current = self.value.lock();
            if *current == Some(value) {
                false
            } else {
                *current = Some(value);
                true
            }
        };

        if changed {
            self.bus.publish(DeviceEvent::new(
                self.id,
                EventKind::SensorValue {
                    value,
                    unit: self.unit.clone(),
                },
            ));
        }
    }
}

/// Create-or-lookup registry for virtual child devices.
///
/// Children are keyed by label. Lookups return the existing child; misses
/// create one and publish nothing until the child itself changes state.
#[derive(Debug, Default)]
pub struct VirtualDeviceRegistry {
    switches: RwLock<HashMap<String, Arc<VirtualSwitch>>>,
    sensors: RwLock<HashMap<String, Arc<VirtualSensor>>>,
}

impl VirtualDeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the switch child with this label, creating it if absent.
    #[must_use]
    pub fn ensure_switch(&self, label: &str, bus: &EventBus) -> Arc<VirtualSwitch> {
        if let Some(existing) = self.switches.read().get(label) {
            return Arc::clone(existing);
        }

        let mut switches = self.switches.write();
        Arc::clone(
            switches
                .entry(label.to_string())
                .or_insert_with(|| Arc::new(VirtualSwitch::new(label, bus.clone()))),
        )
    }

    /// Returns the sensor child with this label, creating it if absent.
    #[must_use]
    pub fn ensure_sensor(&self, label: &str, unit: &str, bus: &EventBus) -> Arc<VirtualSensor> {
        if let Some(existing) = self.sensors.read().get(label) {
            return Arc::clone(existing);
        }

        let mut sensors = self.sensors.write();
        Arc::clone(
            sensors
                .entry(label.to_string())
                .or_insert_with(|| Arc::new(VirtualSensor::new(label, unit, bus.clone()))),
        )
    }

    /// Looks up an existing switch child.
    #[must_use]
    pub fn switch(&self, label: &str) -> Option<Arc<VirtualSwitch>> {
        self.switches.read().get(label).map(Arc::clone)
    }

    /// Looks up an existing sensor child.
    #[must_use]
    pub fn sensor(&self, label: &str) -> Option<Arc<VirtualSensor>> {
        self.sensors.read().get(label).map(Arc::clone)
    }

    /// Returns the number of registered children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.switches.read().len() + self.sensors.read().len()
    }

    /// Returns `true` if no children exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
