// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pending-deadline queue of lights awaiting an automatic off command.
//!
//! Each entry maps a device id to the absolute instant its light should
//! be turned off. A recurring tick visits the queue while it is
//! non-empty; when the last entry is removed the tick is cancelled and
//! re-armed lazily on the next enqueue, so an idle app schedules no
//! wakeups.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::event::DeviceId;

/// Period of the recurring off tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(60);

/// Deadline map of lights awaiting their off command.
#[derive(Debug, Default)]
pub struct OffQueue {
    entries: HashMap<DeviceId, Instant>,
    next_tick: Option<Instant>,
}

impl OffQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a light to be turned off at `deadline`.
    ///
    /// Re-scheduling an already queued light replaces its deadline. The
    /// recurring tick is armed when this is the first entry.
    pub fn schedule(&mut self, device: DeviceId, deadline: Instant, now: Instant) {
        self.entries.insert(device, deadline);
        if self.next_tick.is_none() {
            self.next_tick = Some(now + TICK_PERIOD);
        }
    }

    /// Returns when the next tick should run, if one is armed.
    #[must_use]
    pub fn next_tick(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Returns the number of queued lights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no lights are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `device` is queued.
    #[must_use]
    pub fn contains(&self, device: DeviceId) -> bool {
        self.entries.contains_key(&device)
    }

    /// Processes one tick: removes and returns every entry whose deadline
    /// has passed, then re-arms the tick only while entries remain.
    pub fn on_tick(&mut self, now: Instant) -> Vec<DeviceId> {
        let due: Vec<DeviceId> = self
            .entries
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(device, _)| *device)
            .collect();

        for device in &due {
            self.entries.remove(device);
        }

        self.next_tick = if self.entries.is_empty() {
            None
        } else {
            Some(now + TICK_PERIOD)
        };

        due
    }

    /// Empties the queue, returning every queued device and disarming the
    /// tick. Used on session teardown.
    pub fn drain(&mut self) -> Vec<DeviceId> {
        self.next_tick = None;
        self.entries.drain().map(|(device, _)| device).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_enqueue_arms_tick() {
        let mut queue = OffQueue::new();
        assert!(queue.next_tick().is_none());

        let now = Instant::now();
        queue.schedule(DeviceId::new(), now + Duration::from_secs(600), now);
        assert_eq!(queue.next_tick(), Some(now + TICK_PERIOD));

        // A second enqueue leaves the armed tick alone
        queue.schedule(DeviceId::new(), now + Duration::from_secs(1200), now);
        assert_eq!(queue.next_tick(), Some(now + TICK_PERIOD));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_removes_only_due_entries() {
        let mut queue = OffQueue::new();
        let now = Instant::now();

        let early = DeviceId::new();
        let late = DeviceId::new();
        queue.schedule(early, now + Duration::from_secs(30), now);
        queue.schedule(late, now + Duration::from_secs(600), now);

        let due = queue.on_tick(now + TICK_PERIOD);
        assert_eq!(due, vec![early]);
        assert!(queue.contains(late));
        // Entries remain: tick re-armed
        assert_eq!(queue.next_tick(), Some(now + TICK_PERIOD + TICK_PERIOD));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_disarms_when_queue_empties() {
        let mut queue = OffQueue::new();
        let now = Instant::now();

        queue.schedule(DeviceId::new(), now + Duration::from_secs(30), now);
        let due = queue.on_tick(now + TICK_PERIOD);
        assert_eq!(due.len(), 1);
        assert!(queue.is_empty());
        assert!(queue.next_tick().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_replaces_deadline() {
        let mut queue = OffQueue::new();
        let now = Instant::now();
        let device = DeviceId::new();

        queue.schedule(device, now + Duration::from_secs(30), now);
        queue.schedule(device, now + Duration::from_secs(3600), now);
        assert_eq!(queue.len(), 1);

        // The old deadline no longer applies
        let due = queue.on_tick(now + Duration::from_secs(60));
        assert!(due.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_returns_everything_and_disarms() {
        let mut queue = OffQueue::new();
        let now = Instant::now();

        queue.schedule(DeviceId::new(), now + Duration::from_secs(30), now);
        queue.schedule(DeviceId::new(), now + Duration::from_secs(600), now);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.next_tick().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_is_removed_within_one_tick_of_deadline() {
        let mut queue = OffQueue::new();
        let now = Instant::now();
        let device = DeviceId::new();

        // Deadline lands between the second and third tick
        queue.schedule(device, now + Duration::from_secs(90), now);

        let mut tick_at = queue.next_tick().unwrap();
        assert!(queue.on_tick(tick_at).is_empty());

        tick_at = queue.next_tick().unwrap();
        let due = queue.on_tick(tick_at);
        assert_eq!(due, vec![device]);

        // Removed no later than one period past the deadline
        assert!(tick_at <= now + Duration::from_secs(90) + TICK_PERIOD);
    }
}
