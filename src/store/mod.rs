// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key-value store abstraction for per-app state.
//!
//! The hub runtime hands every app a private mutable state bag; here that
//! becomes an explicit [`KeyValueStore`] the app owns. Apps keep small
//! JSON values in it (counters, session tokens) so a host can swap in a
//! durable backend without touching app logic. The bundled
//! [`MemoryStore`] is the default backend and the one used in tests.
//!
//! # Examples
//!
//! ```
//! use domo_lib::store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.put("cycles", serde_json::json!(3));
//! assert_eq!(store.get("cycles"), Some(serde_json::json!(3)));
//! ```

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

/// String-keyed JSON storage owned by a single app instance.
///
/// The runtime guarantees an app's callbacks never run concurrently, so
/// implementations only need to be internally consistent, not
/// transactional.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: Value);

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str);
}

/// In-memory [`KeyValueStore`] backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_round_trip() {
        let store = MemoryStore::new();
        store.put("sid", serde_json::json!("abc123"));
        assert_eq!(store.get("sid"), Some(serde_json::json!("abc123")));
    }

    #[test]
    fn put_replaces() {
        let store = MemoryStore::new();
        store.put("count", serde_json::json!(1));
        store.put("count", serde_json::json!(2));
        assert_eq!(store.get("count"), Some(serde_json::json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_clears_entry() {
        let store = MemoryStore::new();
        store.put("count", serde_json::json!(1));
        store.remove("count");
        assert!(store.get("count").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("nope").is_none());
    }
}
