// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cycle counters and human-readable status reporting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Monotonic counters since the last daily reset.
///
/// Counters accumulate across cycles and reset to zero right after the
/// daily summary is produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleCounters {
    /// Cycles run.
    pub cycles: u32,
    /// Lights turned on.
    pub lights_on: u32,
    /// Lights turned off.
    pub lights_off: u32,
    /// Labels of devices touched, deduplicated.
    touched: BTreeSet<String>,
}

impl CycleCounters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one cycle that turned on the given lights.
    pub fn record_cycle<'a>(&mut self, lights: impl IntoIterator<Item = &'a str>) {
        self.cycles += 1;
        for label in lights {
            self.lights_on += 1;
            self.touched.insert(label.to_string());
        }
    }

    /// Records lights turned off.
    pub fn record_off(&mut self, count: u32) {
        self.lights_off += count;
    }

    /// Returns the labels of devices touched since the last reset.
    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.touched.iter().map(String::as_str)
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Renders the daily summary message.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.cycles == 0 {
            return "Vacation lighting: no cycles ran today".to_string();
        }

        let mut summary = format!(
            "Vacation lighting: {} cycle{} today, {} light{} on, {} off",
            self.cycles,
            plural(self.cycles),
            self.lights_on,
            plural(self.lights_on),
            self.lights_off,
        );

        if !self.touched.is_empty() {
            let names: Vec<&str> = self.touched.iter().map(String::as_str).collect();
            summary.push_str(&format!(" ({})", names.join(", ")));
        }

        summary
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Point-in-time status of the vacation lighting app, published on a
/// watch channel for UIs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VacationStatus {
    /// Whether the gating conditions currently permit cycles.
    pub armed: bool,
    /// Whether a lighting session is active.
    pub session_active: bool,
    /// Number of lights queued for an automatic off.
    pub queued_lights: usize,
    /// Counters since the last daily reset.
    pub counters: CycleCounters,
}

impl VacationStatus {
    /// Renders a one-line status string.
    #[must_use]
    pub fn describe(&self) -> String {
        let arming = if self.armed { "armed" } else { "disarmed" };
        let session = if self.session_active {
            "session active"
        } else {
            "idle"
        };
        format!(
            "{arming}, {session}, {} light{} queued; {}",
            self.queued_lights,
            if self.queued_lights == 1 { "" } else { "s" },
            self.counters.summary()
        )
    }
}
