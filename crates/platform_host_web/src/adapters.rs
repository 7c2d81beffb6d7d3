use std::rc::Rc;

use platform_host::{KeyValueStore, NoopKeyValueStore, SharedKeyValueStore};

use crate::WebKeyValueStore;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Desktop placeholder adapters used while native transport is being introduced.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Adapter enum that erases the concrete key/value backend behind [`KeyValueStore`].
#[derive(Debug, Clone, Copy)]
pub enum KeyValueStoreAdapter {
    /// Browser-backed `localStorage` persistence.
    Browser(WebKeyValueStore),
    /// No-op fallback used when desktop transport is intentionally stubbed.
    DesktopStub(NoopKeyValueStore),
}

impl KeyValueStore for KeyValueStoreAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, String> {
        match self {
            Self::Browser(store) => store.get(key),
            Self::DesktopStub(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.set(key, value),
            Self::DesktopStub(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        match self {
            Self::Browser(store) => store.remove(key),
            Self::DesktopStub(store) => store.remove(key),
        }
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        match self {
            Self::Browser(store) => store.keys(),
            Self::DesktopStub(store) => store.keys(),
        }
    }
}

/// Builds the key/value store adapter for the selected host strategy.
pub fn key_value_store() -> KeyValueStoreAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => KeyValueStoreAdapter::Browser(WebKeyValueStore),
        HostStrategy::DesktopStub => KeyValueStoreAdapter::DesktopStub(NoopKeyValueStore),
    }
}

/// Builds a shared handle to the selected key/value store, ready to hand to state managers.
pub fn shared_key_value_store() -> SharedKeyValueStore {
    Rc::new(key_value_store())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_selects_browser_adapter() {
        #[cfg(not(feature = "desktop-host-stub"))]
        {
            assert_eq!(selected_host_strategy(), HostStrategy::Browser);
            assert_eq!(host_strategy_name(), "browser");
            assert!(matches!(
                key_value_store(),
                KeyValueStoreAdapter::Browser(_)
            ));
        }

        #[cfg(feature = "desktop-host-stub")]
        {
            assert_eq!(selected_host_strategy(), HostStrategy::DesktopStub);
            assert_eq!(host_strategy_name(), "desktop-stub");
        }
    }

    #[test]
    fn shared_store_is_usable_through_trait_object() {
        let store = shared_key_value_store();
        store.set("k", "v").expect("set");
        store.remove("k").expect("remove");
    }
}
