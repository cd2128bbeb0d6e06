// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core value types shared by the apps and device drivers.
//!
//! # Types
//!
//! - [`PowerState`], [`ContactState`], [`LockState`] - device states as
//!   reported in events and returned by capability queries
//! - [`CycleFrequency`], [`OnDuration`] - range-validated minute durations
//!   used by the vacation lighting scheduler
//! - [`TemperatureUnit`] - display unit with conversion helpers

mod duration;
mod power;
mod temperature;

pub use duration::{CycleFrequency, OnDuration};
pub use power::{ContactState, LockState, PowerState};
pub use temperature::TemperatureUnit;
