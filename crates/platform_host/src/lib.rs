//! Typed host-domain contracts shared by the desktop state layer and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the synchronous
//! key/value store contract, in-memory and no-op stores for tests and unsupported targets, and
//! time helpers. Concrete browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::kv::{KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore, SharedKeyValueStore};
pub use time::{iso8601_from_unix_ms, iso8601_now, next_monotonic_timestamp_ms, unix_time_ms_now};
