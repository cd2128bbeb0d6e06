// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Auto-lock app family.
//!
//! A parent app holds shared defaults (relock delay, enabled flag) and a
//! set of door instances, each binding a lock, an optional contact
//! sensor, and an optional per-door delay override. When a door is
//! unlocked, a relock is scheduled; opening the door cancels it (an open
//! door is never locked), and closing it re-schedules. All doors share
//! one cooperative task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::capability::{ContactSensor, Lock, Notifier};
use crate::error::{ConfigError, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus, EventKind};
use crate::types::{ContactState, LockState};

/// Shared defaults for all doors of an [`AutoLockApp`].
#[derive(Debug, Clone)]
pub struct AutoLockConfig {
    /// Relock delay applied to doors without an override.
    pub delay: Duration,
    /// Whether relocking is active.
    pub enabled: bool,
}

impl Default for AutoLockConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5 * 60),
            enabled: true,
        }
    }
}

/// One door instance: a lock, an optional contact sensor, and overrides.
#[derive(Clone)]
pub struct DoorConfig {
    /// Human-readable door name for logs and notifications.
    pub label: String,
    /// Id the lock's events arrive under.
    pub lock_id: DeviceId,
    /// The lock itself.
    pub lock: Arc<dyn Lock>,
    /// Id the contact sensor's events arrive under, if one is fitted.
    pub contact_id: Option<DeviceId>,
    /// The contact sensor itself.
    pub contact: Option<Arc<dyn ContactSensor>>,
    /// Per-door relock delay, overriding the parent default.
    pub delay_override: Option<Duration>,
}

impl DoorConfig {
    /// Creates a door with just a lock.
    #[must_use]
    pub fn new(label: impl Into<String>, lock_id: DeviceId, lock: Arc<dyn Lock>) -> Self {
        Self {
            label: label.into(),
            lock_id,
            lock,
            contact_id: None,
            contact: None,
            delay_override: None,
        }
    }

    /// Adds a contact sensor.
    #[must_use]
    pub fn with_contact(mut self, contact_id: DeviceId, contact: Arc<dyn ContactSensor>) -> Self {
        self.contact_id = Some(contact_id);
        self.contact = Some(contact);
        self
    }

    /// Overrides the relock delay for this door.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_override = Some(delay);
        self
    }
}

impl std::fmt::Debug for DoorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DoorConfig")
            .field("label", &self.label)
            .field("lock_id", &self.lock_id)
            .field("contact_id", &self.contact_id)
            .field("delay_override", &self.delay_override)
            .finish_non_exhaustive()
    }
}

/// A door plus its scheduling state.
struct Door {
    config: DoorConfig,
    pending: Option<Instant>,
}

/// Parent app relocking a family of doors.
pub struct AutoLockApp {
    config: AutoLockConfig,
    doors: Vec<Door>,
    bus: EventBus,
    notifier: Option<Arc<dyn Notifier>>,
}

impl AutoLockApp {
    /// Creates the app.
    ///
    /// # Errors
    ///
    /// Returns a config error when no doors are configured.
    pub fn new(
        config: AutoLockConfig,
        doors: Vec<DoorConfig>,
        bus: EventBus,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self> {
        if doors.is_empty() {
            tracing::warn!("auto-lock has no doors configured; aborting");
            return Err(ConfigError::NoDevices("doors").into());
        }

        Ok(Self {
            config,
            doors: doors
                .into_iter()
                .map(|config| Door {
                    config,
                    pending: None,
                })
                .collect(),
            bus,
            notifier,
        })
    }

    /// Enables or disables relocking.
    ///
    /// Disabling cancels every pending relock.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            for door in &mut self.doors {
                door.pending = None;
            }
            tracing::info!("auto-lock disabled; pending relocks cancelled");
        }
    }

    /// Returns how many doors have a pending relock.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.doors.iter().filter(|d| d.pending.is_some()).count()
    }

    /// Returns the earliest pending relock deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.doors.iter().filter_map(|d| d.pending).min()
    }

    /// Runs the app until the event bus closes.
    pub async fn run(mut self) {
        let mut events = self.bus.subscribe();

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                () = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending().await,
                    }
                } => {
                    self.fire_due(Instant::now()).await;
                }
                event = events.recv() => match event {
                    Ok(event) => self.handle_event(&event, Instant::now()).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "auto-lock lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    /// Feeds one event into the app.
    pub async fn handle_event(&mut self, event: &DeviceEvent, now: Instant) {
        if !self.config.enabled {
            return;
        }

        let default_delay = self.config.delay;

        for door in &mut self.doors {
            let delay = door.config.delay_override.unwrap_or(default_delay);

            if event.device_id == door.config.lock_id {
                match event.kind {
                    EventKind::Lock(LockState::Unlocked) => {
                        door.pending = Some(now + delay);
                        tracing::debug!(door = %door.config.label, ?delay, "relock scheduled");
                    }
                    EventKind::Lock(LockState::Locked) => {
                        door.pending = None;
                    }
                    EventKind::Lock(LockState::Jammed) => {
                        tracing::warn!(door = %door.config.label, "lock jammed; relock cancelled");
                        door.pending = None;
                    }
                    _ => {}
                }
            } else if Some(event.device_id) == door.config.contact_id {
                match event.kind {
                    EventKind::Contact(ContactState::Open) => {
                        if door.pending.take().is_some() {
                            tracing::debug!(door = %door.config.label, "door opened; relock cancelled");
                        }
                    }
                    EventKind::Contact(ContactState::Closed) => {
                        match door.config.lock.lock_state().await {
                            Ok(LockState::Unlocked) => {
                                door.pending = Some(now + delay);
                                tracing::debug!(door = %door.config.label, "door closed while unlocked; relock scheduled");
                            }
                            Ok(_) => {}
                            Err(error) => {
                                tracing::warn!(door = %door.config.label, %error, "lock state query failed");
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Fires every relock whose deadline has passed.
    pub async fn fire_due(&mut self, now: Instant) {
        for index in 0..self.doors.len() {
            let due = self.doors[index].pending.is_some_and(|at| at <= now);
            if !due {
                continue;
            }

            self.doors[index].pending = None;
            self.relock(index).await;
        }
    }

    /// Attempts to lock one door, verifying it is closed first.
    async fn relock(&mut self, index: usize) {
        let door = &self.doors[index];
        let label = door.config.label.clone();

        if let Some(contact) = &door.config.contact {
            match contact.contact_state().await {
                Ok(ContactState::Open) => {
                    tracing::info!(door = %label, "door still open; not locking");
                    return;
                }
                Ok(ContactState::Closed) => {}
                Err(error) => {
                    tracing::warn!(door = %label, %error, "contact query failed; not locking");
                    return;
                }
            }
        }

        match door.config.lock.lock_state().await {
            Ok(LockState::Locked) => return,
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(door = %label, %error, "lock state query failed");
            }
        }

        match door.config.lock.lock().await {
            Ok(()) => {
                tracing::info!(door = %label, "auto-locked");
                if let Some(notifier) = &self.notifier {
                    let message = format!("Auto-locked {label}");
                    if let Err(error) = notifier.notify(&message).await {
                        tracing::warn!(%error, "auto-lock notification failed");
                    }
                }
            }
            Err(error) => {
                // Retry happens on the next lock or contact event
                tracing::warn!(door = %label, %error, "lock command failed");
            }
        }
    }
}
