// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Virtual switch app mirroring the appliance's blocking state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::event::{EventBus, EventKind};
use crate::types::PowerState;
use crate::virtual_device::{VirtualDeviceRegistry, VirtualSwitch};

use super::BlockerClient;

/// Configuration for the [`BlockingSwitch`] app.
#[derive(Debug, Clone)]
pub struct BlockingSwitchConfig {
    /// Label of the virtual switch child.
    pub child_label: String,
    /// How often the appliance status is polled.
    pub poll_interval: Duration,
    /// How long an `off` command disables blocking; `None` is indefinite.
    pub disable_duration: Option<Duration>,
}

impl Default for BlockingSwitchConfig {
    fn default() -> Self {
        Self {
            child_label: "Ad blocking".to_string(),
            poll_interval: Duration::from_secs(60),
            disable_duration: None,
        }
    }
}

/// App that exposes the appliance's blocking state as a virtual switch.
///
/// The app polls the appliance on a fixed interval and mirrors the result
/// onto its child switch. Turning the child on or off (by any other bus
/// participant) is translated into an enable/disable call; the child is
/// then set to whatever state the appliance confirms.
///
/// Re-authentication on 401 happens inside the client; a failed poll is
/// logged and retried on the next tick.
pub struct BlockingSwitch {
    client: BlockerClient,
    child: Arc<VirtualSwitch>,
    config: BlockingSwitchConfig,
    bus: EventBus,
    /// Last state confirmed by the appliance, used to tell our own mirror
    /// updates apart from external commands on the child.
    appliance_state: Mutex<Option<PowerState>>,
}

impl BlockingSwitch {
    /// Creates the app, creating or looking up its virtual child.
    #[must_use]
    pub fn new(
        client: BlockerClient,
        registry: &VirtualDeviceRegistry,
        bus: EventBus,
        config: BlockingSwitchConfig,
    ) -> Self {
        let child = registry.ensure_switch(&config.child_label, &bus);
        Self {
            client,
            child,
            config,
            bus,
            appliance_state: Mutex::new(None),
        }
    }

    /// Returns the virtual switch child.
    #[must_use]
    pub fn child(&self) -> &Arc<VirtualSwitch> {
        &self.child
    }

    /// Polls the appliance once and mirrors the result onto the child.
    ///
    /// # Errors
    ///
    /// Returns the protocol or parse error of the failed poll; the child
    /// keeps its previous state.
    pub async fn poll_once(&self) -> Result<PowerState> {
        let state = self.client.status().await?;
        *self.appliance_state.lock() = Some(state);
        self.child.set_state(state);
        Ok(state)
    }

    /// Applies an on/off command to the appliance.
    ///
    /// # Errors
    ///
    /// Returns the protocol or parse error of the failed call.
    pub async fn apply_command(&self, desired: PowerState) -> Result<PowerState> {
        let confirmed = match desired {
            PowerState::On => self.client.enable().await?,
            PowerState::Off => self.client.disable(self.config.disable_duration).await?,
        };
        *self.appliance_state.lock() = Some(confirmed);
        self.child.set_state(confirmed);
        Ok(confirmed)
    }

    /// Runs the app: a poll tick plus command handling, until the bus
    /// closes.
    pub async fn run(self: Arc<Self>) {
        let mut events = self.bus.subscribe();
        let mut poll = tokio::time::interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if let Err(error) = self.poll_once().await {
                        tracing::warn!(%error, "appliance poll failed");
                    }
                }
                event = events.recv() => match event {
                    Ok(event) if event.device_id == self.child.id() => {
                        if let EventKind::Switch(desired) = event.kind {
                            let known = *self.appliance_state.lock();
                            if known == Some(desired) {
                                // Our own mirror update echoing back
                                continue;
                            }
                            if let Err(error) = self.apply_command(desired).await {
                                tracing::warn!(%error, state = %desired, "appliance command failed");
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "blocking switch lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}
