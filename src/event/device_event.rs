// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use crate::types::{ContactState, LockState, PowerState};

use super::DeviceId;

/// A push notification about a device or hub state change.
///
/// Events pair the reporting device's id with the kind of change. Hub mode
/// changes carry the hub's own id (the hub is modeled as a device).
///
/// # Examples
///
/// ```
/// use domo_lib::event::{DeviceEvent, DeviceId, EventKind};
/// use domo_lib::types::ContactState;
///
/// let sensor = DeviceId::new();
/// let event = DeviceEvent::new(sensor, EventKind::Contact(ContactState::Open));
/// assert_eq!(event.device_id, sensor);
/// assert!(event.kind.is_contact());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceEvent {
    /// The device that reported the change.
    pub device_id: DeviceId,
    /// What changed.
    pub kind: EventKind,
}

impl DeviceEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(device_id: DeviceId, kind: EventKind) -> Self {
        Self { device_id, kind }
    }
}

/// The kind of state change an event reports.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    /// Temperature reading changed (in the sensor's native unit).
    Temperature(f64),

    /// Relative humidity reading changed (percent).
    Humidity(f64),

    /// Contact sensor opened or closed.
    Contact(ContactState),

    /// Lock state changed.
    Lock(LockState),

    /// Switch turned on or off.
    Switch(PowerState),

    /// Dimmer level changed (percent, 0-100).
    DimmerLevel(u8),

    /// A numeric reading on a virtual sensor changed.
    SensorValue {
        /// The new reading.
        value: f64,
        /// Unit label, e.g. `"°C"`.
        unit: String,
    },

    /// The hub switched to a different mode (e.g. "Home", "Away").
    ModeChanged(String),
}

impl EventKind {
    /// Returns `true` for temperature events.
    #[must_use]
    pub fn is_temperature(&self) -> bool {
        matches!(self, Self::Temperature(_))
    }

    /// Returns `true` for humidity events.
    #[must_use]
    pub fn is_humidity(&self) -> bool {
        matches!(self, Self::Humidity(_))
    }

    /// Returns `true` for contact events.
    #[must_use]
    pub fn is_contact(&self) -> bool {
        matches!(self, Self::Contact(_))
    }

    /// Returns `true` for switch events.
    #[must_use]
    pub fn is_switch(&self) -> bool {
        matches!(self, Self::Switch(_))
    }

    /// Returns `true` for hub mode changes.
    #[must_use]
    pub fn is_mode_change(&self) -> bool {
        matches!(self, Self::ModeChanged(_))
    }
}
