// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature display units and conversions.

use std::fmt;

/// Unit used when reporting temperatures to the user.
///
/// Sensor events carry readings in their native unit; apps convert to
/// Celsius internally and back to the configured display unit for output.
///
/// # Examples
///
/// ```
/// use domo_lib::types::TemperatureUnit;
///
/// let f = TemperatureUnit::Fahrenheit;
/// assert!((f.to_celsius(68.0) - 20.0).abs() < 1e-9);
/// assert!((f.from_celsius(20.0) - 68.0).abs() < 1e-9);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl TemperatureUnit {
    /// Converts a reading in this unit to Celsius.
    #[must_use]
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }

    /// Converts a Celsius value into this unit.
    #[must_use]
    pub fn from_celsius(&self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => value * 9.0 / 5.0 + 32.0,
        }
    }

    /// Returns the unit symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_is_identity() {
        let c = TemperatureUnit::Celsius;
        assert!((c.to_celsius(21.5) - 21.5).abs() < f64::EPSILON);
        assert!((c.from_celsius(21.5) - 21.5).abs() < f64::EPSILON);
    }

    #[test]
    fn fahrenheit_round_trip() {
        let f = TemperatureUnit::Fahrenheit;
        let celsius = f.to_celsius(72.0);
        assert!((f.from_celsius(celsius) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn freezing_point() {
        let f = TemperatureUnit::Fahrenheit;
        assert!((f.to_celsius(32.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn symbols() {
        assert_eq!(TemperatureUnit::Celsius.symbol(), "°C");
        assert_eq!(TemperatureUnit::Fahrenheit.to_string(), "°F");
    }
}
