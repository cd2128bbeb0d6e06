// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analyzer for recorded device event history.
//!
//! The hub exports device history as a JSON array of loosely-shaped
//! entries. Parsing is defensive: an entry that is missing its attribute
//! name, has a non-numeric value, or fails to deserialize at all is
//! skipped and counted, never failing the whole computation.
//!
//! # Examples
//!
//! ```
//! use domo_lib::apps::history::DeviceHistory;
//!
//! let json = r#"[
//!     {"date":"2026-01-05T08:00:00Z","name":"temperature","value":19.5,"unit":"C"},
//!     {"date":"2026-01-05T09:00:00Z","name":"temperature","value":"20.1","unit":"C"},
//!     {"name":"temperature","value":"not a number"}
//! ]"#;
//!
//! let history = DeviceHistory::from_json(json).unwrap();
//! assert_eq!(history.skipped(), 1);
//!
//! let stats = history.stats("temperature").unwrap();
//! assert_eq!(stats.count, 2);
//! assert!((stats.max - 20.1).abs() < 1e-9);
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ParseError, Result};

/// Raw history entry as exported by the hub.
///
/// Every field is optional; validation happens after deserialization so a
/// single malformed entry cannot poison the array.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawEntry {
    /// Timestamp of the event.
    #[serde(default)]
    date: Option<String>,

    /// Attribute name, e.g. `"temperature"`.
    #[serde(default)]
    name: Option<String>,

    /// Recorded value; numbers sometimes arrive as strings.
    #[serde(default)]
    value: Option<serde_json::Value>,

    /// Unit label.
    #[serde(default)]
    unit: Option<String>,
}

/// A validated history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Event timestamp, when the entry carried a parseable one.
    pub timestamp: Option<DateTime<Utc>>,
    /// Attribute name.
    pub attribute: String,
    /// Numeric value.
    pub value: f64,
    /// Unit label, if any.
    pub unit: Option<String>,
}

/// Per-attribute statistics over a device's history.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeStats {
    /// Number of entries considered.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Earliest timestamp among dated entries.
    pub first: Option<DateTime<Utc>>,
    /// Latest timestamp among dated entries.
    pub last: Option<DateTime<Utc>>,
}

/// Parsed device event history.
#[derive(Debug, Clone, Default)]
pub struct DeviceHistory {
    entries: Vec<HistoryEntry>,
    skipped: usize,
}

impl DeviceHistory {
    /// Parses a JSON history export.
    ///
    /// The top level must be a JSON array; individual entries that cannot
    /// be validated are skipped and counted in [`skipped`](Self::skipped).
    ///
    /// # Errors
    ///
    /// Returns a parse error only when the document itself is not a JSON
    /// array.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json).map_err(ParseError::Json)?;

        let mut entries = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;

        for item in raw {
            match validate(item) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, kept = entries.len(), "skipped malformed history entries");
        }

        Ok(Self { entries, skipped })
    }

    /// Returns the validated entries.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Returns how many entries were skipped as malformed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns the distinct attribute names present, sorted.
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.iter().map(|e| e.attribute.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Computes statistics for one attribute.
    ///
    /// Returns `None` when no entry carries the attribute.
    #[must_use]
    pub fn stats(&self, attribute: &str) -> Option<AttributeStats> {
        let values: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.attribute == attribute)
            .collect();

        if values.is_empty() {
            return None;
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut first: Option<DateTime<Utc>> = None;
        let mut last: Option<DateTime<Utc>> = None;

        for entry in &values {
            min = min.min(entry.value);
            max = max.max(entry.value);
            sum += entry.value;

            if let Some(ts) = entry.timestamp {
                first = Some(first.map_or(ts, |f| f.min(ts)));
                last = Some(last.map_or(ts, |l| l.max(ts)));
            }
        }

        // Count is non-zero here
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / values.len() as f64;

        Some(AttributeStats {
            count: values.len(),
            min,
            max,
            mean,
            first,
            last,
        })
    }
}

/// Validates one raw entry, returning `None` when it is unusable.
fn validate(item: serde_json::Value) -> Option<HistoryEntry> {
    let raw: RawEntry = serde_json::from_value(item).ok()?;

    let attribute = raw.name?;
    if attribute.is_empty() {
        return None;
    }

    let value = numeric_value(raw.value.as_ref()?)?;

    let timestamp = raw
        .date
        .as_deref()
        .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.with_timezone(&Utc));

    Some(HistoryEntry {
        timestamp,
        attribute,
        value,
        unit: raw.unit,
    })
}

/// Extracts a number from a JSON value, accepting numeric strings.
fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
