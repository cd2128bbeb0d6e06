// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the vacation lighting app, driven through the
//! event bus with paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use domo_lib::apps::vacation::{VacationConfig, VacationLights};
use domo_lib::capability::{Switch, SwitchHandle};
use domo_lib::event::{DeviceEvent, DeviceId, EventBus, EventKind};
use domo_lib::types::{CycleFrequency, PowerState};
use domo_lib::virtual_device::VirtualSwitch;

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

fn mode_event(mode: &str) -> DeviceEvent {
    DeviceEvent::new(DeviceId::new(), EventKind::ModeChanged(mode.to_string()))
}

/// Lets the spawned app task process whatever is pending.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn arming_runs_a_cycle_and_disarming_clears_it() {
    let bus = EventBus::new();
    let (lights, devices) = make_lights(&bus, 3);
    let (anchors, anchor_devices) = make_lights(&bus, 1);

    let config = VacationConfig::new(lights)
        .with_anchors(anchors)
        .with_lights_per_cycle(2)
        .with_frequency(CycleFrequency::new(15).unwrap())
        .with_allowed_modes(["Away".to_string()])
        .with_rng_seed(42);

    let app = VacationLights::new(config, bus.clone(), None, None).unwrap();
    let status = app.status_receiver();
    tokio::spawn(app.run());
    settle().await;

    // Not armed yet: nothing happens
    assert_eq!(on_count(&devices), 0);
    assert!(!status.borrow().armed);

    // Leaving arms the app and the first cycle runs immediately
    bus.publish(mode_event("Away"));
    settle().await;

    assert_eq!(on_count(&devices), 2);
    assert_eq!(on_count(&anchor_devices), 1);
    {
        let snapshot = status.borrow();
        assert!(snapshot.armed);
        assert!(snapshot.session_active);
        assert_eq!(snapshot.queued_lights, 2);
        assert_eq!(snapshot.counters.cycles, 1);
    }

    // Coming home tears the session down: every queued light and anchor
    // goes off and the queue empties
    bus.publish(mode_event("Home"));
    settle().await;

    assert_eq!(on_count(&devices), 0);
    assert_eq!(on_count(&anchor_devices), 0);
    {
        let snapshot = status.borrow();
        assert!(!snapshot.armed);
        assert!(!snapshot.session_active);
        assert_eq!(snapshot.queued_lights, 0);
    }
}

#[tokio::test(start_paused = true)]
async fn override_switch_gates_the_simulator() {
    let bus = EventBus::new();
    let (lights, devices) = make_lights(&bus, 2);

    let override_device = Arc::new(VirtualSwitch::new("Simulator", bus.clone()));
    let override_handle =
        SwitchHandle::new(override_device.id(), "Simulator", override_device.clone());

    let config = VacationConfig::new(lights)
        .with_override_switch(override_handle)
        .with_rng_seed(7);

    let app = VacationLights::new(config, bus.clone(), None, None).unwrap();
    let status = app.status_receiver();
    tokio::spawn(app.run());
    settle().await;

    // Switch is off: disarmed
    assert!(!status.borrow().armed);
    assert_eq!(on_count(&devices), 0);

    // Turning the override switch on arms and cycles
    override_device.turn_on().await.unwrap();
    settle().await;
    assert!(status.borrow().armed);
    assert_eq!(on_count(&devices), 1);

    // Turning it off disarms and clears the session
    override_device.turn_off().await.unwrap();
    settle().await;
    assert!(!status.borrow().armed);
    assert_eq!(on_count(&devices), 0);
    assert_eq!(status.borrow().queued_lights, 0);
}

#[tokio::test(start_paused = true)]
async fn cycles_repeat_while_armed() {
    let bus = EventBus::new();
    let (lights, _devices) = make_lights(&bus, 3);

    let config = VacationConfig::new(lights)
        .with_lights_per_cycle(2)
        .with_frequency(CycleFrequency::new(15).unwrap())
        .with_allowed_modes(["Away".to_string()])
        .with_rng_seed(3);

    let app = VacationLights::new(config, bus.clone(), None, None).unwrap();
    let status = app.status_receiver();
    tokio::spawn(app.run());
    settle().await;

    bus.publish(mode_event("Away"));
    settle().await;
    assert_eq!(status.borrow().counters.cycles, 1);

    // The next check lands at frequency + jitter(0..14); after 30 minutes
    // it has certainly fired and run a second cycle
    tokio::time::sleep(Duration::from_secs(30 * 60)).await;
    settle().await;
    assert!(status.borrow().counters.cycles >= 2);
}
