//! Synchronous key/value storage contracts and adapters.
//!
//! Every durable value in the desktop state layer is UTF-8 text stored under a string key. The
//! browser backend is `window.localStorage`, which has no transactions, so callers are expected to
//! finish each read-modify-write before yielding control.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Shared, single-threaded handle to a [`KeyValueStore`] implementation.
pub type SharedKeyValueStore = Rc<dyn KeyValueStore>;

/// Host service for synchronous text values keyed by string, with enumerable keys.
pub trait KeyValueStore {
    /// Reads the raw text stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, String>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), String>;

    /// Lists every key currently present in the store.
    fn keys(&self) -> Result<Vec<String>, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryInner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string.
///
/// Clones share the same entries. An optional byte quota mimics the browser's storage limit so
/// write-failure paths can be exercised off-browser.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store that rejects writes once keys plus values exceed `quota_bytes`.
    pub fn with_quota_bytes(quota_bytes: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryInner {
                entries: BTreeMap::new(),
                quota_bytes: Some(quota_bytes),
            })),
        }
    }

    /// Creates a store pre-populated with `entries`, ignoring any quota.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        store.inner.borrow_mut().entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        store
    }

    /// Returns a copy of every entry, ordered by key.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.inner.borrow().entries.clone()
    }

    /// Replaces the byte quota; `None` removes the limit.
    pub fn set_quota_bytes(&self, quota_bytes: Option<usize>) {
        self.inner.borrow_mut().quota_bytes = quota_bytes;
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut inner = self.inner.borrow_mut();
        if let Some(quota) = inner.quota_bytes {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(format!(
                    "quota exceeded writing `{key}`: {needed} bytes needed, {quota} allowed"
                ));
            }
        }
        inner.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        Ok(self.inner.borrow().entries.keys().cloned().collect())
    }
}
