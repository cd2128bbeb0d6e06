// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for device and hub state changes.
//!
//! Device adapters and virtual devices publish [`DeviceEvent`]s to an
//! [`EventBus`]; apps subscribe and react inside their own task. This
//! models the hub runtime's push-notification subscriptions: temperature,
//! humidity, contact, lock, switch, dimmer level, and hub mode changes.
//!
//! # Examples
//!
//! ```
//! use domo_lib::event::{DeviceEvent, DeviceId, EventBus, EventKind};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let sensor = DeviceId::new();
//! bus.publish(DeviceEvent::new(sensor, EventKind::Temperature(21.5)));
//! ```

mod device_event;
mod device_id;
mod event_bus;

pub use device_event::{DeviceEvent, EventKind};
pub use device_id::DeviceId;
pub use event_bus::EventBus;
