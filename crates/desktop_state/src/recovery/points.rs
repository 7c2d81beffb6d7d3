use std::collections::BTreeMap;

use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    error::StateError,
    model::RecoveryPoint,
    persistence::{
        list_keys, load_json_list, read_raw, remove_raw, unique_time_id, warn_on_failure,
        write_json, write_raw,
    },
};

/// What a [`RecoveryPointManager::restore`] call actually did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Live keys deleted before writing the snapshot.
    pub removed: usize,
    /// Snapshot entries written back.
    pub written: usize,
    /// Storage failures encountered; the restore continues past each one.
    pub failures: Vec<StateError>,
}

impl RestoreSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Captures and restores whole-store snapshots kept in a bounded, newest-first ring.
pub struct RecoveryPointManager {
    store: SharedKeyValueStore,
    config: StateLayerConfig,
}

impl RecoveryPointManager {
    pub fn new(store: SharedKeyValueStore, config: &StateLayerConfig) -> Self {
        Self {
            store,
            config: config.clone(),
        }
    }

    /// Recovery points, most recent first. Absent or malformed ring data yields an empty list.
    pub fn list(&self) -> Vec<RecoveryPoint> {
        load_json_list(&*self.store, &self.config.recovery_points_key)
    }

    pub fn get(&self, point_id: &str) -> Option<RecoveryPoint> {
        self.list().into_iter().find(|p| p.id == point_id)
    }

    /// Copies every store entry outside the excluded prefixes.
    pub fn snapshot_data(&self) -> BTreeMap<String, String> {
        let keys = match list_keys(&*self.store) {
            Ok(keys) => keys,
            Err(err) => {
                leptos::logging::warn!("recovery snapshot skipped: {err}");
                return BTreeMap::new();
            }
        };

        let mut data = BTreeMap::new();
        for key in keys {
            if self.config.is_snapshot_excluded(&key) {
                continue;
            }
            match read_raw(&*self.store, &key) {
                Ok(Some(value)) => {
                    data.insert(key, value);
                }
                Ok(None) => {}
                Err(err) => leptos::logging::warn!("recovery snapshot omitted entry: {err}"),
            }
        }
        data
    }

    /// Snapshots the store into a new point, prepends it to the ring, and evicts beyond the cap.
    pub fn capture(&self, name: &str, auto_created: bool) -> RecoveryPoint {
        let mut ring = self.list();
        let id = unique_time_id("recovery", |candidate| ring.iter().any(|p| p.id == candidate));
        let point = RecoveryPoint {
            id,
            name: name.to_string(),
            timestamp: platform_host::iso8601_now(),
            data: self.snapshot_data(),
            auto_created,
        };

        ring.insert(0, point.clone());
        ring.truncate(self.config.max_recovery_points);
        self.persist(&ring);
        point
    }

    /// Replaces the store contents with `point.data`.
    ///
    /// Every live key except the ring itself is deleted first, so keys missing from the snapshot
    /// are lost. Failures are logged and collected; the restore never stops early.
    pub fn restore(&self, point: &RecoveryPoint) -> RestoreSummary {
        let mut summary = RestoreSummary::default();

        let keys = list_keys(&*self.store).unwrap_or_else(|err| {
            summary.failures.push(err);
            Vec::new()
        });
        for key in keys.iter().filter(|key| **key != self.config.recovery_points_key) {
            match remove_raw(&*self.store, key) {
                Ok(()) => summary.removed += 1,
                Err(err) => summary.failures.push(err),
            }
        }

        for (key, value) in &point.data {
            if *key == self.config.recovery_points_key {
                leptos::logging::warn!(
                    "recovery point `{}` carries the ring key; skipped",
                    point.id
                );
                continue;
            }
            match write_raw(&*self.store, key, value) {
                Ok(()) => summary.written += 1,
                Err(err) => summary.failures.push(err),
            }
        }

        for err in &summary.failures {
            leptos::logging::warn!("restore `{}`: {err}", point.id);
        }
        leptos::logging::log!(
            "restored recovery point `{}`: {} removed, {} written",
            point.id,
            summary.removed,
            summary.written
        );
        summary
    }

    /// Removes one point from the ring. Unknown ids leave the ring untouched.
    pub fn delete(&self, point_id: &str) {
        let mut ring = self.list();
        let before = ring.len();
        ring.retain(|p| p.id != point_id);
        if ring.len() != before {
            self.persist(&ring);
        }
    }

    /// Pretty-printed JSON of a point, for user-initiated download.
    pub fn export_json(point: &RecoveryPoint) -> Result<String, String> {
        serde_json::to_string_pretty(point).map_err(|e| e.to_string())
    }

    fn persist(&self, ring: &[RecoveryPoint]) {
        warn_on_failure(
            "recovery points",
            write_json(&*self.store, &self.config.recovery_points_key, ring),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{KeyValueStore, MemoryKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;

    fn manager_with(store: &MemoryKeyValueStore) -> RecoveryPointManager {
        RecoveryPointManager::new(Rc::new(store.clone()), &StateLayerConfig::default())
    }

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn capture_skips_bookkeeping_namespaces() {
        let config = StateLayerConfig::default();
        let store = MemoryKeyValueStore::from_entries([
            ("a", "1"),
            (config.crash_record_key.as_str(), "{}"),
            ("retrodesk.recovery.scratch", "x"),
            (config.desktops_key.as_str(), "[]"),
        ]);
        let manager = manager_with(&store);

        let point = manager.capture("manual", false);
        assert_eq!(
            point.data,
            entries(&[("a", "1"), (config.desktops_key.as_str(), "[]")])
        );
        assert!(!point.auto_created);
        assert!(point.id.starts_with("recovery-"));
        assert_eq!(manager.list(), vec![point]);
    }

    #[test]
    fn relocated_ring_and_crash_keys_are_never_captured() {
        let config = StateLayerConfig::from_json(
            r#"{"recovery_points_key": "app.ring", "crash_record_key": "pending_crash"}"#,
        );
        let store = MemoryKeyValueStore::from_entries([("a", "1"), ("pending_crash", "{}")]);
        let manager = RecoveryPointManager::new(Rc::new(store.clone()), &config);

        manager.capture("first", true);
        let second = manager.capture("second", true);
        assert_eq!(second.data, entries(&[("a", "1")]));
        assert!(manager.list().iter().all(|p| p.data == entries(&[("a", "1")])));

        store.remove("pending_crash").expect("remove");
        manager.restore(&second);
        assert_eq!(store.get("pending_crash").expect("get"), None);
        assert_eq!(manager.list().len(), 2);
    }

    #[test]
    fn ring_keeps_ten_newest_first() {
        let manager = manager_with(&MemoryKeyValueStore::default());
        let captured: Vec<RecoveryPoint> = (0..11)
            .map(|n| manager.capture(&format!("point {n}"), n % 2 == 0))
            .collect();

        let listed = manager.list();
        assert_eq!(listed.len(), 10);
        let expected: Vec<String> = captured.iter().rev().take(10).map(|p| p.id.clone()).collect();
        let listed_ids: Vec<String> = listed.iter().map(|p| p.id.clone()).collect();
        assert_eq!(listed_ids, expected);
        assert!(manager.get(&captured[0].id).is_none());
    }

    #[test]
    fn back_to_back_captures_get_distinct_ids() {
        let manager = manager_with(&MemoryKeyValueStore::default());
        let first = manager.capture("one", true);
        let second = manager.capture("two", true);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn restore_is_a_full_replace() {
        let store = MemoryKeyValueStore::from_entries([("a", "1"), ("b", "2")]);
        let manager = manager_with(&store);
        let point = RecoveryPoint {
            id: "recovery-1".to_string(),
            name: "seeded".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            data: entries(&[("a", "9"), ("c", "3")]),
            auto_created: false,
        };

        let summary = manager.restore(&point);
        assert!(summary.is_clean());
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.written, 2);
        assert_eq!(store.entries(), entries(&[("a", "9"), ("c", "3")]));
        assert_eq!(store.get("b").expect("get"), None);
    }

    #[test]
    fn restore_keeps_the_ring_and_drops_crash_record() {
        let config = StateLayerConfig::default();
        let store = MemoryKeyValueStore::from_entries([("a", "1")]);
        let manager = manager_with(&store);
        let point = manager.capture("before", false);

        store.set("a", "changed").expect("set");
        store.set("b", "new").expect("set");
        store.set(&config.crash_record_key, "{}").expect("set");

        manager.restore(&point);
        assert_eq!(store.get("a").expect("get"), Some("1".to_string()));
        assert_eq!(store.get("b").expect("get"), None);
        assert_eq!(store.get(&config.crash_record_key).expect("get"), None);
        assert_eq!(manager.list(), vec![point]);
    }

    #[test]
    fn restore_reports_write_failures_and_continues() {
        let store = MemoryKeyValueStore::default();
        let manager = manager_with(&store);
        let point = RecoveryPoint {
            id: "recovery-1".to_string(),
            name: "big".to_string(),
            timestamp: "t".to_string(),
            data: entries(&[("small", "1"), ("zz", "this value does not fit")]),
            auto_created: false,
        };
        store.set_quota_bytes(Some(12));

        let summary = manager.restore(&point);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].key(), Some("zz"));
        assert_eq!(store.get("small").expect("get"), Some("1".to_string()));
    }

    #[test]
    fn delete_removes_only_the_named_point() {
        let manager = manager_with(&MemoryKeyValueStore::default());
        let first = manager.capture("one", false);
        let second = manager.capture("two", false);

        manager.delete("recovery-missing");
        assert_eq!(manager.list().len(), 2);

        manager.delete(&first.id);
        assert_eq!(manager.list(), vec![second]);
    }

    #[test]
    fn malformed_ring_lists_as_empty_and_is_replaced_on_capture() {
        let config = StateLayerConfig::default();
        let store =
            MemoryKeyValueStore::from_entries([(config.recovery_points_key.as_str(), "[{")]);
        let manager = manager_with(&store);
        assert!(manager.list().is_empty());

        manager.capture("fresh", true);
        assert_eq!(manager.list().len(), 1);
    }

    #[test]
    fn export_is_pretty_camel_case_json() {
        let manager = manager_with(&MemoryKeyValueStore::from_entries([("k", "v")]));
        let point = manager.capture("export me", true);
        let text = RecoveryPointManager::export_json(&point).expect("export");
        assert!(text.contains("\n"));
        assert!(text.contains("\"autoCreated\": true"));
    }
}
