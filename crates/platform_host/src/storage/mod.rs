//! Storage contracts shared by the desktop state layer and browser adapters.

pub mod kv;
