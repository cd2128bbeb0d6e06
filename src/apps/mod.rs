// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Automation apps hosted on the capability and event abstractions.
//!
//! | App | Purpose |
//! |-----|---------|
//! | [`vacation`] | Randomly cycles lights while the home is away |
//! | [`auto_lock`] | Relocks doors a configurable delay after unlocking |
//! | [`dew_point`] | Computes the dew point from a sensor pair |
//! | [`history`] | Analyzes recorded device event history |
//!
//! Each app is a single cooperative task: it subscribes to the event bus,
//! reacts to events and its own timers, and never blocks on another app.

pub mod auto_lock;
pub mod dew_point;
pub mod history;
pub mod vacation;

pub use auto_lock::{AutoLockApp, AutoLockConfig, DoorConfig};
pub use dew_point::{DewPointApp, DewPointConfig};
pub use history::{AttributeStats, DeviceHistory, HistoryEntry};
pub use vacation::{VacationConfig, VacationLights, VacationStatus};
