// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Domo` Lib - Rust smart-home automation apps and device drivers.
//!
//! This library hosts a set of home-automation apps on explicit Rust
//! abstractions of a hub runtime's primitives: capability-based device
//! handles, an event bus for push notifications, virtual child devices,
//! and a per-app key-value store.
//!
//! # Apps
//!
//! - **Vacation lighting**: randomly cycles lights while the home is in
//!   an away mode, with jittered cycle timing, randomized per-light
//!   on-durations, and a lazy off-queue tick
//! - **Auto-lock**: relocks doors after a delay, cancelled while the door
//!   is open
//! - **Dew point**: computes the dew point from a temperature/humidity
//!   sensor pair and exposes it as a virtual sensor
//! - **History analyzer**: defensive statistics over recorded device
//!   event history
//!
//! # Device drivers
//!
//! - **Ad blocker** (feature `http`, default on): drives a local DNS
//!   ad-blocking appliance over either of its two API generations and
//!   mirrors the blocking state onto a virtual switch
//!
//! # Quick Start
//!
//! ## Vacation lighting
//!
//! ```no_run
//! use std::sync::Arc;
//! use domo_lib::apps::vacation::{VacationConfig, VacationLights};
//! use domo_lib::capability::SwitchHandle;
//! use domo_lib::event::EventBus;
//! use domo_lib::types::CycleFrequency;
//! use domo_lib::virtual_device::VirtualSwitch;
//!
//! #[tokio::main]
//! async fn main() -> domo_lib::Result<()> {
//!     let bus = EventBus::new();
//!
//!     let lights: Vec<SwitchHandle> = ["Porch light", "Reading lamp", "Hall light"]
//!         .into_iter()
//!         .map(|label| {
//!             let device = Arc::new(VirtualSwitch::new(label, bus.clone()));
//!             SwitchHandle::new(device.id(), label, device)
//!         })
//!         .collect();
//!
//!     let config = VacationConfig::new(lights)
//!         .with_lights_per_cycle(2)
//!         .with_frequency(CycleFrequency::new(30)?)
//!         .with_allowed_modes(["Away".to_string()]);
//!
//!     let app = VacationLights::new(config, bus.clone(), None, None)?;
//!     tokio::spawn(app.run());
//!     Ok(())
//! }
//! ```
//!
//! ## Ad blocker switch
//!
//! ```no_run
//! use std::sync::Arc;
//! use domo_lib::blocker::{BlockerAuth, BlockerConfig, BlockingSwitch, BlockingSwitchConfig};
//! use domo_lib::event::EventBus;
//! use domo_lib::virtual_device::VirtualDeviceRegistry;
//!
//! #[tokio::main]
//! async fn main() -> domo_lib::Result<()> {
//!     let bus = EventBus::new();
//!     let registry = VirtualDeviceRegistry::new();
//!
//!     let client = BlockerConfig::new("192.168.1.2")
//!         .with_auth(BlockerAuth::session("hunter2"))
//!         .into_client()?;
//!
//!     let app = Arc::new(BlockingSwitch::new(
//!         client,
//!         &registry,
//!         bus,
//!         BlockingSwitchConfig::default(),
//!     ));
//!     tokio::spawn(app.run());
//!     Ok(())
//! }
//! ```

pub mod apps;
#[cfg(feature = "http")]
pub mod blocker;
pub mod capability;
pub mod error;
pub mod event;
pub mod schedule;
pub mod store;
pub mod types;
pub mod virtual_device;

pub use apps::{
    AutoLockApp, AutoLockConfig, DewPointApp, DewPointConfig, DeviceHistory, DoorConfig,
    VacationConfig, VacationLights, VacationStatus,
};
pub use capability::{ContactSensor, Lock, Notifier, Switch, SwitchHandle};
pub use error::{ConfigError, DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{DeviceEvent, DeviceId, EventBus, EventKind};
pub use schedule::{DaySet, SunTimes, TimeWindow, WindowBound};
pub use store::{KeyValueStore, MemoryStore};
pub use types::{ContactState, CycleFrequency, LockState, OnDuration, PowerState, TemperatureUnit};
pub use virtual_device::{VirtualDeviceRegistry, VirtualSensor, VirtualSwitch};
