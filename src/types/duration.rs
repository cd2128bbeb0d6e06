// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Range-validated minute durations for the lighting scheduler.
//!
//! Both cycle frequency and per-light on-durations share the same band:
//! 5 to 180 minutes. Values outside the band are either rejected
//! ([`CycleFrequency::new`]) or clamped ([`CycleFrequency::clamped`],
//! [`OnDuration::clamped`]) depending on whether the caller is validating
//! user input or normalizing a drawn value.

use std::fmt;
use std::time::Duration;

use crate::error::ValueError;

/// Minimum scheduler duration in minutes.
const MINUTES_MIN: u16 = 5;

/// Maximum scheduler duration in minutes.
const MINUTES_MAX: u16 = 180;

/// How often the lighting scheduler runs a cycle, in minutes.
///
/// Valid range: 5 to 180 minutes. The frequency doubles as the base value
/// for randomized per-light on-durations.
///
/// # Examples
///
/// ```
/// use domo_lib::types::CycleFrequency;
///
/// let freq = CycleFrequency::new(30).unwrap();
/// assert_eq!(freq.as_minutes(), 30);
///
/// // Out-of-band values are rejected...
/// assert!(CycleFrequency::new(3).is_err());
///
/// // ...or clamped when normalizing loose input.
/// assert_eq!(CycleFrequency::clamped(3).as_minutes(), 5);
/// assert_eq!(CycleFrequency::clamped(500).as_minutes(), 180);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CycleFrequency(u16);

impl CycleFrequency {
    /// Minimum cycle frequency.
    pub const MIN: Self = Self(MINUTES_MIN);

    /// Maximum cycle frequency.
    pub const MAX: Self = Self(MINUTES_MAX);

    /// Creates a new cycle frequency.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `minutes` is outside [5, 180].
    pub fn new(minutes: u16) -> Result<Self, ValueError> {
        if (MINUTES_MIN..=MINUTES_MAX).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(ValueError::OutOfRange {
                min: MINUTES_MIN,
                max: MINUTES_MAX,
                actual: minutes,
            })
        }
    }

    /// Creates a cycle frequency, clamping `minutes` into [5, 180].
    #[must_use]
    pub fn clamped(minutes: u16) -> Self {
        Self(minutes.clamp(MINUTES_MIN, MINUTES_MAX))
    }

    /// Returns the frequency in minutes.
    #[must_use]
    pub const fn as_minutes(&self) -> u16 {
        self.0
    }

    /// Returns the frequency as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0 as u64 * 60)
    }

    /// Returns the inclusive band of jittered on-durations for this
    /// frequency: `[f - round(0.2 f), f + round(0.2 f)]`, before clamping
    /// into the valid minute range.
    #[must_use]
    pub fn jitter_band(&self) -> (u16, u16) {
        let spread = (f64::from(self.0) * 0.2).round();
        // Truncation is safe: 0.2 * 180 rounds to at most 36
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let spread = spread as u16;
        (self.0.saturating_sub(spread), self.0.saturating_add(spread))
    }
}

impl Default for CycleFrequency {
    fn default() -> Self {
        Self(30)
    }
}

impl fmt::Display for CycleFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

/// How long a randomly selected light stays on, in minutes.
///
/// Drawn from the frequency's jitter band and clamped into [5, 180].
///
/// # Examples
///
/// ```
/// use domo_lib::types::OnDuration;
///
/// let d = OnDuration::clamped(2);
/// assert_eq!(d.as_minutes(), 5);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct OnDuration(u16);

impl OnDuration {
    /// Minimum on-duration.
    pub const MIN: Self = Self(MINUTES_MIN);

    /// Maximum on-duration.
    pub const MAX: Self = Self(MINUTES_MAX);

    /// Creates an on-duration, clamping `minutes` into [5, 180].
    #[must_use]
    pub fn clamped(minutes: u16) -> Self {
        Self(minutes.clamp(MINUTES_MIN, MINUTES_MAX))
    }

    /// Returns the duration in minutes.
    #[must_use]
    pub const fn as_minutes(&self) -> u16 {
        self.0
    }

    /// Returns the value as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0 as u64 * 60)
    }
}

impl fmt::Display for OnDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}
