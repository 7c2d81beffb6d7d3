use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    model::CrashRecoveryRecord,
    persistence::{load_json, remove_raw, warn_on_failure, write_json},
};

/// Single-slot holder for the most recent unconsumed crash record.
pub struct CrashFlagManager {
    store: SharedKeyValueStore,
    key: String,
}

impl CrashFlagManager {
    pub fn new(store: SharedKeyValueStore, config: &StateLayerConfig) -> Self {
        Self {
            store,
            key: config.crash_record_key.clone(),
        }
    }

    /// Stores `record`, silently replacing any record not yet consumed.
    pub fn set(&self, record: &CrashRecoveryRecord) {
        warn_on_failure("crash record", write_json(&*self.store, &self.key, record));
    }

    /// Pending record, or `None` when absent or unparsable.
    pub fn get(&self) -> Option<CrashRecoveryRecord> {
        load_json(&*self.store, &self.key)
    }

    pub fn clear(&self) {
        warn_on_failure("crash record removal", remove_raw(&*self.store, &self.key));
    }
}
