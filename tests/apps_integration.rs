// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the sensor and lock apps, driven through the
//! event bus with paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domo_lib::apps::auto_lock::{AutoLockApp, AutoLockConfig, DoorConfig};
use domo_lib::apps::dew_point::{DewPointApp, DewPointConfig};
use domo_lib::capability::Lock;
use domo_lib::event::{DeviceEvent, DeviceId, EventBus, EventKind};
use domo_lib::types::LockState;
use domo_lib::virtual_device::VirtualDeviceRegistry;
use domo_lib::Result;
use parking_lot::Mutex;

/// Lets a spawned app task process whatever is pending.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

struct FakeLock {
    state: Mutex<LockState>,
}

#[async_trait]
impl Lock for FakeLock {
    async fn lock(&self) -> Result<()> {
        *self.state.lock() = LockState::Locked;
        Ok(())
    }

    async fn unlock(&self) -> Result<()> {
        *self.state.lock() = LockState::Unlocked;
        Ok(())
    }

    async fn lock_state(&self) -> Result<LockState> {
        Ok(*self.state.lock())
    }
}

#[tokio::test(start_paused = true)]
async fn dew_point_flows_from_events_to_virtual_sensor() {
    let bus = EventBus::new();
    let registry = VirtualDeviceRegistry::new();

    let temp_id = DeviceId::new();
    let hum_id = DeviceId::new();
    let app = DewPointApp::new(
        DewPointConfig::new(temp_id, hum_id),
        &registry,
        bus.clone(),
        None,
    )
    .unwrap();
    let child = app.child().clone();
    tokio::spawn(app.run());
    settle().await;

    bus.publish(DeviceEvent::new(temp_id, EventKind::Temperature(20.0)));
    bus.publish(DeviceEvent::new(hum_id, EventKind::Humidity(50.0)));
    settle().await;

    let dew = child.value().expect("dew point computed");
    assert!((dew - 9.26).abs() < 0.1);

    // The child is reachable through the registry too
    let looked_up = registry.sensor("Dew point").unwrap();
    assert_eq!(looked_up.id(), child.id());
}

#[tokio::test(start_paused = true)]
async fn door_relocks_after_the_delay() {
    let bus = EventBus::new();
    let lock = Arc::new(FakeLock {
        state: Mutex::new(LockState::Unlocked),
    });
    let lock_id = DeviceId::new();

    let config = AutoLockConfig {
        delay: Duration::from_secs(3 * 60),
        enabled: true,
    };
    let door = DoorConfig::new("Front door", lock_id, lock.clone());
    let app = AutoLockApp::new(config, vec![door], bus.clone(), None).unwrap();
    tokio::spawn(app.run());
    settle().await;

    bus.publish(DeviceEvent::new(
        lock_id,
        EventKind::Lock(LockState::Unlocked),
    ));
    settle().await;
    assert_eq!(lock.lock_state().await.unwrap(), LockState::Unlocked);

    // The deadline fires once the delay has elapsed
    tokio::time::sleep(Duration::from_secs(3 * 60 + 5)).await;
    assert_eq!(lock.lock_state().await.unwrap(), LockState::Locked);
}

#[tokio::test(start_paused = true)]
async fn manual_relock_before_the_deadline_is_respected() {
    let bus = EventBus::new();
    let lock = Arc::new(FakeLock {
        state: Mutex::new(LockState::Unlocked),
    });
    let lock_id = DeviceId::new();

    let door = DoorConfig::new("Front door", lock_id, lock.clone());
    let app = AutoLockApp::new(AutoLockConfig::default(), vec![door], bus.clone(), None).unwrap();
    tokio::spawn(app.run());
    settle().await;

    bus.publish(DeviceEvent::new(
        lock_id,
        EventKind::Lock(LockState::Unlocked),
    ));
    settle().await;

    // The user locks manually; the lock event cancels the pending relock
    lock.lock().await.unwrap();
    bus.publish(DeviceEvent::new(lock_id, EventKind::Lock(LockState::Locked)));
    settle().await;

    lock.unlock().await.unwrap();

    // No stale deadline fires later
    tokio::time::sleep(Duration::from_secs(30 * 60)).await;
    assert_eq!(lock.lock_state().await.unwrap(), LockState::Unlocked);
}
