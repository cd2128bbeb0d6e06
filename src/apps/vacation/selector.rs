// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Random light selection and on-duration assignment.

use rand::Rng;
use rand::seq::index;

use crate::capability::SwitchHandle;
use crate::types::{CycleFrequency, OnDuration};

/// One selected light and its assigned on-duration.
#[derive(Debug, Clone)]
pub struct Selection {
    /// The light to turn on.
    pub handle: SwitchHandle,
    /// How long it stays on before the off-queue reclaims it.
    pub duration: OnDuration,
}

/// Chooses a random subset of `lights` without replacement.
///
/// The requested count is clamped to `[1, lights.len()]`; an empty light
/// list yields an empty selection. Each selected light gets an
/// independently drawn duration from the frequency's ±20% jitter band,
/// clamped into the valid minute range.
pub fn select(
    rng: &mut impl Rng,
    lights: &[SwitchHandle],
    requested: u8,
    frequency: CycleFrequency,
) -> Vec<Selection> {
    if lights.is_empty() {
        return Vec::new();
    }

    let count = usize::from(requested).clamp(1, lights.len());
    index::sample(rng, lights.len(), count)
        .iter()
        .map(|i| Selection {
            handle: lights[i].clone(),
            duration: draw_duration(rng, frequency),
        })
        .collect()
}

/// Draws one on-duration from the frequency's jitter band.
pub fn draw_duration(rng: &mut impl Rng, frequency: CycleFrequency) -> OnDuration {
    let (low, high) = frequency.jitter_band();
    OnDuration::clamped(rng.random_range(low..=high))
}
