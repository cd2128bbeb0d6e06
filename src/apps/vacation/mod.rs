// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vacation lighting simulator.
//!
//! While the home is in an away mode (and an optional override switch is
//! on), the app periodically runs a lighting cycle: it picks a random
//! subset of the configured lights, turns them on, and queues each for an
//! automatic off after an independently randomized duration. Anchor
//! lights are turned on with every cycle and stay on for the whole
//! session. When any gating condition fails the session is torn down:
//! every queued light and every anchor is forced off and all pending
//! timers are cancelled.
//!
//! The app is a single cooperative task; all timing flows through one
//! select loop over the next deadline (cycle check, failsafe, off tick,
//! daily summary) and incoming bus events.

mod off_queue;
mod report;
mod selector;

pub use off_queue::{OffQueue, TICK_PERIOD};
pub use report::{CycleCounters, VacationStatus};
pub use selector::{Selection, draw_duration, select};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Local};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use crate::capability::{Notifier, SwitchHandle};
use crate::error::{ConfigError, Result};
use crate::event::{DeviceEvent, EventBus, EventKind};
use crate::schedule::{DaySet, SunTimes, TimeWindow, random_jitter};
use crate::store::KeyValueStore;
use crate::types::CycleFrequency;

/// Maximum random jitter added to the next cycle check, in minutes.
const CHECK_JITTER_MAX_MINUTES: u16 = 14;

/// How long after the primary check the failsafe re-check runs.
const FAILSAFE_DELAY: Duration = Duration::from_secs(10 * 60);

/// Store key the counters are persisted under.
const COUNTERS_KEY: &str = "vacation.counters";

/// Configuration for [`VacationLights`].
#[derive(Clone)]
pub struct VacationConfig {
    /// Lights eligible for random cycling.
    pub lights: Vec<SwitchHandle>,
    /// Anchor lights, kept on for the whole session.
    pub anchors: Vec<SwitchHandle>,
    /// How many lights each cycle turns on (clamped to what is available).
    pub lights_per_cycle: u8,
    /// Cycle frequency.
    pub frequency: CycleFrequency,
    /// Hub modes in which cycling is allowed; empty means any mode.
    pub allowed_modes: Vec<String>,
    /// Optional override switch; cycling only runs while it is on.
    pub override_switch: Option<SwitchHandle>,
    /// Days of the week on which cycling is allowed.
    pub days: DaySet,
    /// Time-of-day window in which cycling is allowed.
    pub window: TimeWindow,
    /// Host-supplied sun times, needed for sun-relative window bounds.
    pub sun: Option<SunTimes>,
    /// Hub mode at startup, until the first mode event arrives.
    pub initial_mode: Option<String>,
    /// Fixed RNG seed, for reproducible tests.
    pub rng_seed: Option<u64>,
}

impl VacationConfig {
    /// Creates a configuration cycling the given lights with defaults.
    #[must_use]
    pub fn new(lights: Vec<SwitchHandle>) -> Self {
        Self {
            lights,
            anchors: Vec::new(),
            lights_per_cycle: 1,
            frequency: CycleFrequency::default(),
            allowed_modes: Vec::new(),
            override_switch: None,
            days: DaySet::any(),
            window: TimeWindow::always(),
            sun: None,
            initial_mode: None,
            rng_seed: None,
        }
    }

    /// Sets the anchor lights.
    #[must_use]
    pub fn with_anchors(mut self, anchors: Vec<SwitchHandle>) -> Self {
        self.anchors = anchors;
        self
    }

    /// Sets how many lights each cycle turns on.
    #[must_use]
    pub fn with_lights_per_cycle(mut self, count: u8) -> Self {
        self.lights_per_cycle = count;
        self
    }

    /// Sets the cycle frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: CycleFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Restricts cycling to the given hub modes.
    #[must_use]
    pub fn with_allowed_modes(mut self, modes: impl IntoIterator<Item = String>) -> Self {
        self.allowed_modes = modes.into_iter().collect();
        self
    }

    /// Sets the override switch.
    #[must_use]
    pub fn with_override_switch(mut self, switch: SwitchHandle) -> Self {
        self.override_switch = Some(switch);
        self
    }

    /// Restricts cycling to the given days.
    #[must_use]
    pub fn with_days(mut self, days: DaySet) -> Self {
        self.days = days;
        self
    }

    /// Restricts cycling to a time window.
    #[must_use]
    pub fn with_window(mut self, window: TimeWindow, sun: Option<SunTimes>) -> Self {
        self.window = window;
        self.sun = sun;
        self
    }

    /// Sets the hub mode assumed at startup.
    #[must_use]
    pub fn with_initial_mode(mut self, mode: impl Into<String>) -> Self {
        self.initial_mode = Some(mode.into());
        self
    }

    /// Seeds the RNG for reproducible selection.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

impl std::fmt::Debug for VacationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VacationConfig")
            .field("lights", &self.lights.len())
            .field("anchors", &self.anchors.len())
            .field("lights_per_cycle", &self.lights_per_cycle)
            .field("frequency", &self.frequency)
            .field("allowed_modes", &self.allowed_modes)
            .field("days", &self.days)
            .finish_non_exhaustive()
    }
}

/// The vacation lighting app.
pub struct VacationLights {
    config: VacationConfig,
    bus: EventBus,
    notifier: Option<Arc<dyn Notifier>>,
    store: Option<Arc<dyn KeyValueStore>>,
    status_tx: watch::Sender<VacationStatus>,
    rng: StdRng,

    mode: Option<String>,
    override_on: bool,
    session_active: bool,
    last_cycle: Option<Instant>,
    next_check: Option<Instant>,
    failsafe: Option<Instant>,
    off_queue: OffQueue,
    counters: CycleCounters,
    summary_at: Instant,
}

impl VacationLights {
    /// Creates the app.
    ///
    /// Previously persisted counters are restored from the store, so a
    /// restart mid-day does not lose the daily tallies.
    ///
    /// # Errors
    ///
    /// Returns a config error when no lights are configured.
    pub fn new(
        config: VacationConfig,
        bus: EventBus,
        notifier: Option<Arc<dyn Notifier>>,
        store: Option<Arc<dyn KeyValueStore>>,
    ) -> Result<Self> {
        if config.lights.is_empty() {
            tracing::warn!("vacation lighting has no lights configured; aborting");
            return Err(ConfigError::NoDevices("lights").into());
        }

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let counters = store
            .as_deref()
            .and_then(|s| s.get(COUNTERS_KEY))
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        let (status_tx, _) = watch::channel(VacationStatus::default());

        let mode = config.initial_mode.clone();
        let override_on = config.override_switch.is_none();

        Ok(Self {
            config,
            bus,
            notifier,
            store,
            status_tx,
            rng,
            mode,
            override_on,
            session_active: false,
            last_cycle: None,
            next_check: None,
            failsafe: None,
            off_queue: OffQueue::new(),
            counters,
            summary_at: Instant::now() + until_next_midnight(&Local::now()),
        })
    }

    /// Returns a receiver for status updates.
    #[must_use]
    pub fn status_receiver(&self) -> watch::Receiver<VacationStatus> {
        self.status_tx.subscribe()
    }

    /// Returns whether the gating conditions derived from mode and
    /// override switch currently hold.
    #[must_use]
    pub fn armed(&self) -> bool {
        let mode_ok = self.config.allowed_modes.is_empty()
            || self
                .mode
                .as_deref()
                .is_some_and(|mode| self.config.allowed_modes.iter().any(|m| m == mode));
        let override_ok = self.config.override_switch.is_none() || self.override_on;
        mode_ok && override_ok
    }

    /// Returns the number of lights queued for an automatic off.
    #[must_use]
    pub fn queued_lights(&self) -> usize {
        self.off_queue.len()
    }

    /// Returns `true` while a lighting session is active.
    #[must_use]
    pub fn session_active(&self) -> bool {
        self.session_active
    }

    /// Runs the app until the event bus closes.
    pub async fn run(mut self) {
        let mut events = self.bus.subscribe();

        // The override switch may already be on when the app starts
        if let Some(switch) = self.config.override_switch.clone() {
            match switch.device().power_state().await {
                Ok(state) => self.override_on = state.is_on(),
                Err(error) => {
                    tracing::warn!(%error, "override switch query failed; assuming off");
                }
            }
        }

        self.evaluate(Instant::now()).await;

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                () = tokio::time::sleep_until(deadline) => {
                    self.on_timer(Instant::now()).await;
                }
                event = events.recv() => match event {
                    Ok(event) => self.handle_event(&event, Instant::now()).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "vacation lighting lagged behind the event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    /// Returns the earliest pending deadline.
    fn next_deadline(&self) -> Instant {
        let mut deadline = self.summary_at;
        for candidate in [self.next_check, self.failsafe, self.off_queue.next_tick()]
            .into_iter()
            .flatten()
        {
            deadline = deadline.min(candidate);
        }
        deadline
    }

    /// Feeds one event into the app.
    pub async fn handle_event(&mut self, event: &DeviceEvent, now: Instant) {
        match &event.kind {
            EventKind::ModeChanged(mode) => {
                tracing::debug!(mode = %mode, "hub mode changed");
                self.mode = Some(mode.clone());
                self.evaluate(now).await;
            }
            EventKind::Switch(state)
                if self
                    .config
                    .override_switch
                    .as_ref()
                    .is_some_and(|s| s.id() == event.device_id) =>
            {
                tracing::debug!(state = %state, "override switch changed");
                self.override_on = state.is_on();
                self.evaluate(now).await;
            }
            _ => {}
        }
    }

    /// Handles a timer wakeup.
    pub async fn on_timer(&mut self, now: Instant) {
        if now >= self.summary_at {
            self.send_summary().await;
            self.summary_at = now + until_next_midnight(&Local::now());
        }

        if self.off_queue.next_tick().is_some_and(|at| at <= now) {
            self.process_offs(now).await;
        }

        let check_due = self.next_check.is_some_and(|at| at <= now)
            || self.failsafe.is_some_and(|at| at <= now);
        if check_due {
            self.evaluate(now).await;
        }

        self.publish_status();
    }

    /// Re-evaluates the gating conditions, running a cycle or tearing the
    /// session down as appropriate.
    pub async fn evaluate(&mut self, now: Instant) {
        let local = Local::now();
        let armed = self.armed();
        let day_ok = self.config.days.allows(local.weekday());
        let window_ok = self
            .config
            .window
            .contains(local.time(), self.config.sun.as_ref());

        if armed && day_ok && window_ok {
            let elapsed_ok = self
                .last_cycle
                .is_none_or(|at| now.duration_since(at) >= self.config.frequency.as_duration());

            if elapsed_ok {
                self.run_cycle(now).await;
            }

            let delay = self.config.frequency.as_duration()
                + random_jitter(&mut self.rng, CHECK_JITTER_MAX_MINUTES);
            self.next_check = Some(now + delay);
            // Safety net in case the primary timer is missed
            self.failsafe = Some(now + delay + FAILSAFE_DELAY);
        } else {
            tracing::debug!(armed, day_ok, window_ok, "cycle gating failed");
            if self.session_active {
                self.teardown().await;
            }
            self.next_check = None;
            self.failsafe = None;
        }

        self.publish_status();
    }

    /// Runs one lighting cycle.
    async fn run_cycle(&mut self, now: Instant) {
        let picks = select(
            &mut self.rng,
            &self.config.lights,
            self.config.lights_per_cycle,
            self.config.frequency,
        );
        if picks.is_empty() {
            return;
        }

        for pick in &picks {
            if let Err(error) = pick.handle.device().turn_on().await {
                tracing::warn!(light = %pick.handle.label(), %error, "turn-on failed");
            }
            self.off_queue
                .schedule(pick.handle.id(), now + pick.duration.as_duration(), now);
        }

        for anchor in &self.config.anchors {
            if let Err(error) = anchor.device().turn_on().await {
                tracing::warn!(light = %anchor.label(), %error, "anchor turn-on failed");
            }
        }

        self.session_active = true;
        self.last_cycle = Some(now);

        let labels: Vec<&str> = picks.iter().map(|p| p.handle.label()).collect();
        tracing::info!(lights = ?labels, "lighting cycle ran");
        self.counters.record_cycle(labels.iter().copied());
        self.persist_counters();
    }

    /// Turns off every due light and re-arms or cancels the tick.
    async fn process_offs(&mut self, now: Instant) {
        let due = self.off_queue.on_tick(now);
        if due.is_empty() {
            return;
        }

        let handles: Vec<SwitchHandle> = due
            .iter()
            .filter_map(|id| self.find_light(*id))
            .collect();

        let mut turned_off = 0u32;
        for handle in handles {
            // Fire-and-forget: the entry is already removed even if the
            // command fails
            if let Err(error) = handle.device().turn_off().await {
                tracing::warn!(light = %handle.label(), %error, "turn-off failed; dropping entry");
            }
            turned_off += 1;
        }

        if turned_off > 0 {
            self.counters.record_off(turned_off);
            self.persist_counters();
        }
    }

    /// Forces every queued light and anchor off and cancels the session.
    async fn teardown(&mut self) {
        tracing::info!("tearing down lighting session");

        let queued = self.off_queue.drain();
        let handles: Vec<SwitchHandle> = queued
            .iter()
            .filter_map(|id| self.find_light(*id))
            .collect();

        let mut turned_off = 0u32;
        for handle in handles {
            if let Err(error) = handle.device().turn_off().await {
                tracing::warn!(light = %handle.label(), %error, "teardown turn-off failed");
            }
            turned_off += 1;
        }

        for anchor in &self.config.anchors {
            if let Err(error) = anchor.device().turn_off().await {
                tracing::warn!(light = %anchor.label(), %error, "anchor turn-off failed");
            }
        }

        if turned_off > 0 {
            self.counters.record_off(turned_off);
            self.persist_counters();
        }

        self.session_active = false;
    }

    /// Sends the summary notification and resets the counters.
    pub async fn send_summary(&mut self) {
        let summary = self.counters.summary();
        tracing::info!(%summary, "daily summary");

        if let Some(notifier) = &self.notifier {
            if let Err(error) = notifier.notify(&summary).await {
                tracing::warn!(%error, "summary notification failed");
            }
        }

        self.counters.reset();
        self.persist_counters();
    }

    fn find_light(&self, id: crate::event::DeviceId) -> Option<SwitchHandle> {
        self.config
            .lights
            .iter()
            .find(|handle| handle.id() == id)
            .cloned()
    }

    fn persist_counters(&self) {
        if let Some(store) = &self.store {
            match serde_json::to_value(&self.counters) {
                Ok(value) => store.put(COUNTERS_KEY, value),
                Err(error) => tracing::warn!(%error, "failed to serialize counters"),
            }
        }
    }

    fn publish_status(&self) {
        self.status_tx.send_replace(VacationStatus {
            armed: self.armed(),
            session_active: self.session_active,
            queued_lights: self.off_queue.len(),
            counters: self.counters.clone(),
        });
    }
}

/// Time until the next local midnight, for the rolling daily boundary.
fn until_next_midnight(now: &DateTime<Local>) -> Duration {
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return DAY;
    };
    let Some(midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
        return DAY;
    };
    (midnight - now.naive_local()).to_std().unwrap_or(DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;
    use crate::virtual_device::VirtualSwitch;

    fn make_lights(bus: &EventBus, count: usize) -> (Vec<SwitchHandle>, Vec<Arc<VirtualSwitch>>) {
        let mut handles = Vec::new();
        let mut devices = Vec::new();
        for i in 0..count {
            let label = format!("Light {i}");
            let device = Arc::new(VirtualSwitch::new(&label, bus.clone()));
            handles.push(SwitchHandle::new(device.id(), label, device.clone()));
            devices.push(device);
        }
        (handles, devices)
    }

    fn on_count(devices: &[Arc<VirtualSwitch>]) -> usize {
        devices
            .iter()
            .filter(|d| d.current_state() == PowerState::On)
            .count()
    }

    #[test]
    fn no_lights_is_rejected() {
        let bus = EventBus::new();
        let result = VacationLights::new(VacationConfig::new(Vec::new()), bus, None, None);
        assert!(result.is_err());
    }

    #[test]
    fn armed_requires_allowed_mode() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 2);
        let config = VacationConfig::new(lights)
            .with_allowed_modes(["Away".to_string()])
            .with_rng_seed(1);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        assert!(!app.armed());

        app.mode = Some("Home".to_string());
        assert!(!app.armed());

        app.mode = Some("Away".to_string());
        assert!(app.armed());
    }

    #[test]
    fn armed_requires_override_switch_on() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 2);
        let override_device = Arc::new(VirtualSwitch::new("Simulator", bus.clone()));
        let override_handle = SwitchHandle::new(
            override_device.id(),
            "Simulator",
            override_device.clone(),
        );
        let config = VacationConfig::new(lights)
            .with_override_switch(override_handle)
            .with_rng_seed(1);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        assert!(!app.armed());

        app.override_on = true;
        assert!(app.armed());
    }

    #[test]
    fn armed_without_restrictions() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 1);
        let app =
            VacationLights::new(VacationConfig::new(lights).with_rng_seed(1), bus, None, None)
                .unwrap();
        assert!(app.armed());
    }

    #[tokio::test(start_paused = true)]
    async fn cycle_turns_on_clamped_selection() {
        let bus = EventBus::new();
        let (lights, devices) = make_lights(&bus, 3);
        let config = VacationConfig::new(lights)
            .with_lights_per_cycle(5)
            .with_frequency(CycleFrequency::new(15).unwrap())
            .with_rng_seed(42);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        app.evaluate(Instant::now()).await;

        assert!(app.session_active());
        assert_eq!(on_count(&devices), 3);
        assert_eq!(app.queued_lights(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn next_check_lands_in_jitter_band() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 2);
        let freq = CycleFrequency::new(30).unwrap();
        let config = VacationConfig::new(lights)
            .with_frequency(freq)
            .with_rng_seed(7);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        let now = Instant::now();
        app.evaluate(now).await;

        let next = app.next_check.unwrap();
        let delay = next.duration_since(now);
        assert!(delay >= freq.as_duration());
        assert!(delay <= freq.as_duration() + Duration::from_secs(14 * 60));

        let failsafe = app.failsafe.unwrap();
        assert_eq!(failsafe.duration_since(next), FAILSAFE_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_gate_blocks_back_to_back_cycles() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 2);
        let config = VacationConfig::new(lights)
            .with_frequency(CycleFrequency::new(15).unwrap())
            .with_rng_seed(9);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        let now = Instant::now();
        app.evaluate(now).await;
        assert_eq!(app.counters.cycles, 1);

        // A second evaluation right away schedules but does not cycle
        app.evaluate(now + Duration::from_secs(60)).await;
        assert_eq!(app.counters.cycles, 1);

        // After the frequency has elapsed a new cycle runs
        app.evaluate(now + Duration::from_secs(15 * 60)).await;
        assert_eq!(app.counters.cycles, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_tears_down_session() {
        let bus = EventBus::new();
        let (lights, devices) = make_lights(&bus, 3);
        let (anchors, anchor_devices) = make_lights(&bus, 1);
        let config = VacationConfig::new(lights)
            .with_anchors(anchors)
            .with_lights_per_cycle(3)
            .with_allowed_modes(["Away".to_string()])
            .with_initial_mode("Away")
            .with_rng_seed(11);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        let now = Instant::now();
        app.evaluate(now).await;

        assert!(app.session_active());
        assert_eq!(on_count(&devices), 3);
        assert_eq!(on_count(&anchor_devices), 1);

        // Coming home disarms: everything off, queue empty, timers cancelled
        let home = DeviceEvent::new(
            crate::event::DeviceId::new(),
            EventKind::ModeChanged("Home".to_string()),
        );
        app.handle_event(&home, now + Duration::from_secs(120)).await;

        assert!(!app.session_active());
        assert_eq!(app.queued_lights(), 0);
        assert_eq!(on_count(&devices), 0);
        assert_eq!(on_count(&anchor_devices), 0);
        assert!(app.next_check.is_none());
        assert!(app.failsafe.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn off_tick_reclaims_expired_lights() {
        let bus = EventBus::new();
        let (lights, devices) = make_lights(&bus, 3);
        let config = VacationConfig::new(lights)
            .with_lights_per_cycle(3)
            .with_frequency(CycleFrequency::new(15).unwrap())
            .with_rng_seed(13);

        let mut app = VacationLights::new(config, bus, None, None).unwrap();
        let now = Instant::now();
        app.evaluate(now).await;
        assert_eq!(on_count(&devices), 3);

        // All durations are at most 18 minutes; run ticks until past that
        let mut at = now;
        while app.queued_lights() > 0 {
            at += TICK_PERIOD;
            app.process_offs(at).await;
            assert!(at <= now + Duration::from_secs(19 * 60), "queue never drained");
        }

        assert_eq!(on_count(&devices), 0);
        assert_eq!(app.counters.lights_off, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn summary_resets_counters() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 2);
        let config = VacationConfig::new(lights)
            .with_lights_per_cycle(2)
            .with_rng_seed(17);

        let store = Arc::new(crate::store::MemoryStore::new());
        let mut app =
            VacationLights::new(config, bus, None, Some(store.clone())).unwrap();
        app.evaluate(Instant::now()).await;
        assert_eq!(app.counters.cycles, 1);

        app.send_summary().await;
        assert_eq!(app.counters, CycleCounters::new());

        // The reset is persisted too
        let persisted: CycleCounters =
            serde_json::from_value(store.get(COUNTERS_KEY).unwrap()).unwrap();
        assert_eq!(persisted, CycleCounters::new());
    }

    #[test]
    fn counters_are_restored_from_store() {
        let bus = EventBus::new();
        let (lights, _) = make_lights(&bus, 1);

        let store = Arc::new(crate::store::MemoryStore::new());
        let mut previous = CycleCounters::new();
        previous.record_cycle(["Light 0"]);
        store.put(COUNTERS_KEY, serde_json::to_value(&previous).unwrap());

        let app = VacationLights::new(
            VacationConfig::new(lights).with_rng_seed(1),
            bus,
            None,
            Some(store),
        )
        .unwrap();
        assert_eq!(app.counters, previous);
    }

    #[test]
    fn midnight_boundary_is_positive_and_bounded() {
        let now = Local::now();
        let until = until_next_midnight(&now);
        assert!(until > Duration::ZERO);
        assert!(until <= Duration::from_secs(24 * 60 * 60));
    }
}
