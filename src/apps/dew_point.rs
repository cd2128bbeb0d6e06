// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dew point calculator app.
//!
//! Subscribes to temperature and humidity events from a configured sensor
//! pair and, once both readings are known, writes the computed dew point
//! to a virtual sensor child. An optional comfort threshold sends a
//! one-shot notification when the dew point rises above it; the
//! notification re-arms after the dew point drops back below.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::capability::Notifier;
use crate::error::{ConfigError, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus, EventKind};
use crate::types::TemperatureUnit;
use crate::virtual_device::{VirtualDeviceRegistry, VirtualSensor};

/// Magnus formula coefficients (Sonntag 1990, valid -45 °C to 60 °C).
const MAGNUS_A: f64 = 17.62;
const MAGNUS_B: f64 = 243.12;

/// Computes the dew point in Celsius from temperature and relative
/// humidity.
///
/// Returns `None` when the humidity is outside `(0, 100]`; a zero or
/// negative reading has no defined dew point and indicates a bad sensor
/// sample that should be skipped.
///
/// # Examples
///
/// ```
/// use domo_lib::apps::dew_point::dew_point_celsius;
///
/// let dew = dew_point_celsius(20.0, 50.0).unwrap();
/// assert!((dew - 9.26).abs() < 0.05);
///
/// assert!(dew_point_celsius(20.0, 0.0).is_none());
/// ```
#[must_use]
pub fn dew_point_celsius(temperature: f64, relative_humidity: f64) -> Option<f64> {
    if relative_humidity <= 0.0 || relative_humidity > 100.0 {
        return None;
    }

    let gamma =
        (relative_humidity / 100.0).ln() + MAGNUS_A * temperature / (MAGNUS_B + temperature);
    Some(MAGNUS_B * gamma / (MAGNUS_A - gamma))
}

/// Configuration for the [`DewPointApp`].
#[derive(Debug, Clone)]
pub struct DewPointConfig {
    /// The temperature sensor to follow.
    pub temperature_sensor: DeviceId,
    /// The humidity sensor to follow.
    pub humidity_sensor: DeviceId,
    /// Unit of incoming temperature events and of the reported dew point.
    pub unit: TemperatureUnit,
    /// Label of the virtual sensor child.
    pub child_label: String,
    /// Comfort threshold in the configured unit; crossing above it sends
    /// a notification.
    pub comfort_threshold: Option<f64>,
}

impl DewPointConfig {
    /// Creates a configuration for a sensor pair with defaults.
    #[must_use]
    pub fn new(temperature_sensor: DeviceId, humidity_sensor: DeviceId) -> Self {
        Self {
            temperature_sensor,
            humidity_sensor,
            unit: TemperatureUnit::default(),
            child_label: "Dew point".to_string(),
            comfort_threshold: None,
        }
    }

    /// Sets the temperature unit.
    #[must_use]
    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the comfort threshold (in the configured unit).
    #[must_use]
    pub fn with_comfort_threshold(mut self, threshold: f64) -> Self {
        self.comfort_threshold = Some(threshold);
        self
    }
}

/// App computing the dew point from a temperature/humidity sensor pair.
pub struct DewPointApp {
    config: DewPointConfig,
    child: Arc<VirtualSensor>,
    bus: EventBus,
    notifier: Option<Arc<dyn Notifier>>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    above_threshold: bool,
}

impl DewPointApp {
    /// Creates the app, creating or looking up its virtual sensor child.
    ///
    /// # Errors
    ///
    /// Returns a config error when the two sensor ids are identical.
    pub fn new(
        config: DewPointConfig,
        registry: &VirtualDeviceRegistry,
        bus: EventBus,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Result<Self> {
        if config.temperature_sensor == config.humidity_sensor {
            return Err(ConfigError::InvalidSetting {
                setting: "humidity_sensor",
                message: "temperature and humidity sensors must differ".to_string(),
            }
            .into());
        }

        let child = registry.ensure_sensor(&config.child_label, config.unit.symbol(), &bus);

        Ok(Self {
            config,
            child,
            bus,
            notifier,
            temperature: None,
            humidity: None,
            above_threshold: false,
        })
    }

    /// Returns the virtual sensor child.
    #[must_use]
    pub fn child(&self) -> &Arc<VirtualSensor> {
        &self.child
    }

    /// Runs the app until the event bus closes.
    pub async fn run(mut self) {
        let mut events = self.bus.subscribe();

        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dew point app lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Feeds one event into the app.
    pub async fn handle_event(&mut self, event: &DeviceEvent) {
        match &event.kind {
            EventKind::Temperature(value) if event.device_id == self.config.temperature_sensor => {
                self.temperature = Some(*value);
            }
            EventKind::Humidity(value) if event.device_id == self.config.humidity_sensor => {
                if !(0.0..=100.0).contains(value) {
                    tracing::warn!(humidity = value, "skipping out-of-range humidity reading");
                    return;
                }
                self.humidity = Some(*value);
            }
            _ => return,
        }

        self.recompute().await;
    }

    /// Recomputes the dew point when both readings are known.
    async fn recompute(&mut self) {
        let (Some(temperature), Some(humidity)) = (self.temperature, self.humidity) else {
            return;
        };

        let celsius = self.config.unit.to_celsius(temperature);
        let Some(dew_celsius) = dew_point_celsius(celsius, humidity) else {
            return;
        };
        let dew = self.config.unit.from_celsius(dew_celsius);

        tracing::debug!(dew_point = dew, "dew point updated");
        self.child.set_value(dew);
        self.check_threshold(dew).await;
    }

    async fn check_threshold(&mut self, dew: f64) {
        let Some(threshold) = self.config.comfort_threshold else {
            return;
        };

        if dew >= threshold && !self.above_threshold {
            self.above_threshold = true;
            if let Some(notifier) = &self.notifier {
                let message = format!(
                    "Dew point has risen to {dew:.1}{} (threshold {threshold:.1}{})",
                    self.config.unit,
                    self.config.unit
                );
                if let Err(error) = notifier.notify(&message).await {
                    tracing::warn!(%error, "dew point notification failed");
                }
            }
        } else if dew < threshold && self.above_threshold {
            self.above_threshold = false;
        }
    }
}
