//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for the desktop state store. The
//! `localStorage` adapter lives under `storage::local_store`; compile-time host selection lives in
//! [`adapters`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod storage;

pub use adapters::{
    host_strategy_name, key_value_store, selected_host_strategy, shared_key_value_store,
    HostStrategy, KeyValueStoreAdapter,
};
pub use storage::local_store::WebKeyValueStore;
