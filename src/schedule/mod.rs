// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Day-of-week and time-of-day gating for scheduled apps.
//!
//! A [`TimeWindow`] restricts when an app may act. Bounds are either fixed
//! clock times or sunrise/sunset with a signed minute offset; sun times are
//! supplied by the host (see [`SunTimes`]), not computed here.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveTime;
//! use domo_lib::schedule::{SunTimes, TimeWindow, WindowBound};
//!
//! // From 30 minutes after sunset until 23:00
//! let window = TimeWindow::new(
//!     Some(WindowBound::sunset(30)),
//!     Some(WindowBound::clock(NaiveTime::from_hms_opt(23, 0, 0).unwrap())),
//! );
//!
//! let sun = SunTimes::new(
//!     NaiveTime::from_hms_opt(6, 45, 0).unwrap(),
//!     NaiveTime::from_hms_opt(18, 20, 0).unwrap(),
//! );
//!
//! let nine_pm = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
//! assert!(window.contains(nine_pm, Some(&sun)));
//! ```

use chrono::{Duration as ChronoDuration, NaiveTime, Weekday};
use rand::Rng;

/// Set of weekdays on which an app is allowed to act.
///
/// An empty set means "no restriction" rather than "never", matching the
/// convention of an unset day picker in the app's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySet {
    days: Vec<Weekday>,
}

impl DaySet {
    /// Creates an unrestricted set (all days allowed).
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates a set allowing only the given days.
    #[must_use]
    pub fn only(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Returns `true` if `day` is allowed.
    #[must_use]
    pub fn allows(&self, day: Weekday) -> bool {
        self.days.is_empty() || self.days.contains(&day)
    }

    /// Returns `true` if no restriction is configured.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.days.is_empty()
    }
}

/// Today's sunrise and sunset, as local clock times supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    /// Local sunrise time.
    pub sunrise: NaiveTime,
    /// Local sunset time.
    pub sunset: NaiveTime,
}

impl SunTimes {
    /// Creates a new pair of sun times.
    #[must_use]
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self { sunrise, sunset }
    }
}

/// One end of a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBound {
    /// A fixed local clock time.
    Clock(NaiveTime),
    /// Sunrise plus a signed offset in minutes.
    Sunrise {
        /// Offset in minutes; negative means before sunrise.
        offset_minutes: i32,
    },
    /// Sunset plus a signed offset in minutes.
    Sunset {
        /// Offset in minutes; negative means before sunset.
        offset_minutes: i32,
    },
}

impl WindowBound {
    /// Creates a fixed clock-time bound.
    #[must_use]
    pub fn clock(time: NaiveTime) -> Self {
        Self::Clock(time)
    }

    /// Creates a sunrise-relative bound.
    #[must_use]
    pub fn sunrise(offset_minutes: i32) -> Self {
        Self::Sunrise { offset_minutes }
    }

    /// Creates a sunset-relative bound.
    #[must_use]
    pub fn sunset(offset_minutes: i32) -> Self {
        Self::Sunset { offset_minutes }
    }

    /// Resolves the bound to a clock time.
    ///
    /// Sun-relative bounds need `sun`; without it they cannot be resolved
    /// and `None` is returned. Offsets wrap across midnight.
    #[must_use]
    pub fn resolve(&self, sun: Option<&SunTimes>) -> Option<NaiveTime> {
        match self {
            Self::Clock(time) => Some(*time),
            Self::Sunrise { offset_minutes } => sun.map(|s| offset(s.sunrise, *offset_minutes)),
            Self::Sunset { offset_minutes } => sun.map(|s| offset(s.sunset, *offset_minutes)),
        }
    }
}

fn offset(time: NaiveTime, minutes: i32) -> NaiveTime {
    let (shifted, _) = time.overflowing_add_signed(ChronoDuration::minutes(i64::from(minutes)));
    shifted
}

/// An optional start/end time-of-day window.
///
/// Both bounds are optional: a missing start means "since midnight", a
/// missing end means "until midnight", and no bounds at all means the
/// window is always open. When start is later than end the window wraps
/// midnight (e.g. 21:00 to 02:00).
///
/// A sun-relative bound that cannot be resolved (no [`SunTimes`] given)
/// closes the window; scheduled lights failing closed is preferable to
/// running outside the configured hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    start: Option<WindowBound>,
    end: Option<WindowBound>,
}

impl TimeWindow {
    /// Creates a window from optional bounds.
    #[must_use]
    pub fn new(start: Option<WindowBound>, end: Option<WindowBound>) -> Self {
        Self { start, end }
    }

    /// Creates a window with no bounds (always open).
    #[must_use]
    pub fn always() -> Self {
        Self::default()
    }

    /// Returns `true` if the window has no bounds.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns `true` if `now` falls inside the window.
    #[must_use]
    pub fn contains(&self, now: NaiveTime, sun: Option<&SunTimes>) -> bool {
        let start = match self.start {
            Some(bound) => match bound.resolve(sun) {
                Some(time) => Some(time),
                None => {
                    tracing::warn!("window start needs sun times but none were provided");
                    return false;
                }
            },
            None => None,
        };
        let end = match self.end {
            Some(bound) => match bound.resolve(sun) {
                Some(time) => Some(time),
                None => {
                    tracing::warn!("window end needs sun times but none were provided");
                    return false;
                }
            },
            None => None,
        };

        match (start, end) {
            (None, None) => true,
            (Some(start), None) => now >= start,
            (None, Some(end)) => now < end,
            (Some(start), Some(end)) => {
                if start <= end {
                    now >= start && now < end
                } else {
                    // Wraps midnight
                    now >= start || now < end
                }
            }
        }
    }
}

/// Draws a uniformly random delay of whole minutes in `[0, max_minutes]`.
///
/// Used by schedulers to spread their re-arm times so cycles do not land
/// on a predictable clock grid.
#[must_use]
pub fn random_jitter(rng: &mut impl Rng, max_minutes: u16) -> std::time::Duration {
    let minutes = rng.random_range(0..=u64::from(max_minutes));
    std::time::Duration::from_secs(minutes * 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn empty_day_set_allows_everything() {
        let days = DaySet::any();
        assert!(days.is_unrestricted());
        assert!(days.allows(Weekday::Mon));
        assert!(days.allows(Weekday::Sun));
    }

    #[test]
    fn restricted_day_set() {
        let days = DaySet::only([Weekday::Sat, Weekday::Sun]);
        assert!(days.allows(Weekday::Sat));
        assert!(!days.allows(Weekday::Wed));
    }

    #[test]
    fn unbounded_window_is_always_open() {
        let window = TimeWindow::always();
        assert!(window.is_unbounded());
        assert!(window.contains(time(3, 0), None));
    }

    #[test]
    fn clock_window() {
        let window = TimeWindow::new(
            Some(WindowBound::clock(time(18, 0))),
            Some(WindowBound::clock(time(23, 0))),
        );
        assert!(!window.contains(time(17, 59), None));
        assert!(window.contains(time(18, 0), None));
        assert!(window.contains(time(22, 59), None));
        assert!(!window.contains(time(23, 0), None));
    }

    #[test]
    fn window_wrapping_midnight() {
        let window = TimeWindow::new(
            Some(WindowBound::clock(time(21, 0))),
            Some(WindowBound::clock(time(2, 0))),
        );
        assert!(window.contains(time(23, 30), None));
        assert!(window.contains(time(1, 0), None));
        assert!(!window.contains(time(12, 0), None));
    }

    #[test]
    fn open_ended_windows() {
        let from_evening = TimeWindow::new(Some(WindowBound::clock(time(20, 0))), None);
        assert!(from_evening.contains(time(23, 0), None));
        assert!(!from_evening.contains(time(8, 0), None));

        let until_morning = TimeWindow::new(None, Some(WindowBound::clock(time(7, 0))));
        assert!(until_morning.contains(time(5, 0), None));
        assert!(!until_morning.contains(time(9, 0), None));
    }

    #[test]
    fn sunset_bound_with_offset() {
        let sun = SunTimes::new(time(6, 45), time(18, 20));
        let bound = WindowBound::sunset(30);
        assert_eq!(bound.resolve(Some(&sun)), Some(time(18, 50)));

        let before = WindowBound::sunrise(-15);
        assert_eq!(before.resolve(Some(&sun)), Some(time(6, 30)));
    }

    #[test]
    fn sun_bound_without_sun_times_closes_window() {
        let window = TimeWindow::new(Some(WindowBound::sunset(0)), None);
        assert!(!window.contains(time(22, 0), None));
    }

    #[test]
    fn sun_offset_wraps_midnight() {
        let sun = SunTimes::new(time(6, 45), time(23, 50));
        let bound = WindowBound::sunset(30);
        assert_eq!(bound.resolve(Some(&sun)), Some(time(0, 20)));
    }

    #[test]
    fn jitter_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let jitter = random_jitter(&mut rng, 14);
            assert!(jitter <= std::time::Duration::from_secs(14 * 60));
            assert_eq!(jitter.as_secs() % 60, 0);
        }
    }
}
