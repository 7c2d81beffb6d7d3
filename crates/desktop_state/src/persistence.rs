//! Write-through persistence helpers shared by the desktop state managers.
//!
//! Reads treat absent, unreadable, and malformed values alike as "nothing stored". Writes return a
//! [`StateError`] that callers log through [`warn_on_failure`] and then drop.

use platform_host::KeyValueStore;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StateError;

pub(crate) fn read_raw(store: &dyn KeyValueStore, key: &str) -> Result<Option<String>, StateError> {
    store.get(key).map_err(|message| StateError::Read {
        key: key.to_string(),
        message,
    })
}

pub(crate) fn write_raw(
    store: &dyn KeyValueStore,
    key: &str,
    value: &str,
) -> Result<(), StateError> {
    store.set(key, value).map_err(|message| StateError::Write {
        key: key.to_string(),
        message,
    })
}

pub(crate) fn remove_raw(store: &dyn KeyValueStore, key: &str) -> Result<(), StateError> {
    store.remove(key).map_err(|message| StateError::Remove {
        key: key.to_string(),
        message,
    })
}

pub(crate) fn list_keys(store: &dyn KeyValueStore) -> Result<Vec<String>, StateError> {
    store
        .keys()
        .map_err(|message| StateError::Enumerate { message })
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StateError> {
    let raw = serde_json::to_string(value).map_err(|err| StateError::Encode {
        key: key.to_string(),
        message: err.to_string(),
    })?;
    write_raw(store, key, &raw)
}

/// Loads a JSON value, returning `None` for absent or malformed data.
pub(crate) fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match read_raw(store, key) {
        Ok(raw) => raw?,
        Err(err) => {
            leptos::logging::warn!("{err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            leptos::logging::warn!("ignoring malformed `{key}`: {err}");
            None
        }
    }
}

/// Loads a JSON list, treating absent or malformed data as empty.
pub(crate) fn load_json_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    load_json(store, key).unwrap_or_default()
}

/// Logs a failed write and reports whether it succeeded.
pub(crate) fn warn_on_failure(cause: &str, result: Result<(), StateError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            leptos::logging::warn!("persist {cause} failed: {err}");
            false
        }
    }
}

/// Builds `{prefix}-{n}` from a monotonic timestamp, bumping `n` past any id `taken` reports.
///
/// The monotonic clock rules out collisions within a process; the bump covers ids persisted by a
/// previous session whose clock ran ahead.
pub(crate) fn unique_time_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    let mut stamp = platform_host::next_monotonic_timestamp_ms();
    loop {
        let id = format!("{prefix}-{stamp}");
        if !taken(&id) {
            return id;
        }
        stamp = stamp.saturating_add(1);
    }
}
