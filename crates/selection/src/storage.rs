//! Durable client storage abstraction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Durable key-value storage the selection persists to.
///
/// This is the browser-storage collaborator: a flat string-to-string map
/// that outlives any single store instance. Implementations must be
/// shareable across every surface of the same client context.
pub trait SelectionStorage: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str);
}

/// In-memory [`SelectionStorage`] backed by a shared map.
///
/// Clones share the same underlying map, so independently-constructed
/// stores over clones of one `MemoryStorage` behave like surfaces of the
/// same browser context.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .map(|map| map.get(key).cloned())
            .unwrap_or_default()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_owned(), value.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let a = MemoryStorage::new();
        let b = a.clone();

        a.set("k", "v");
        assert_eq!(b.get("k"), Some("v".to_owned()));
    }

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("absent"), None);
    }
}
