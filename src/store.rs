//! The in-memory key-value mapping.
//!
//! No version chain, no tombstones: a `put` simply discards whatever value previously lived at
//! that key. Durability and conflict resolution for concurrent writes to the same key are explicit
//! non-goals of this crate.

use std::collections::HashMap;

use serde_json::Value;

#[derive(Debug, Default)]
pub struct Store(HashMap<String, Value>);

impl Store {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Returns the current value at `key`, or `None` if the key has never been written.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Overwrites (or inserts) the value at `key`.
    pub fn put(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_none() {
        let store = Store::new();
        assert!(store.get("x").is_none());
    }

    #[test]
    fn put_overwrites_without_keeping_history() {
        let mut store = Store::new();
        store.put("x".to_string(), Value::from(5));
        store.put("x".to_string(), Value::from(10));
        assert_eq!(store.get("x"), Some(&Value::from(10)));
    }
}
