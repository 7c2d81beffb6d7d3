//! Storage layout and limits for the desktop state layer.

use serde::{Deserialize, Serialize};

/// Storage key names, snapshot exclusions, and size limits shared by every manager.
///
/// Unknown or missing fields fall back to [`StateLayerConfig::default`], so a host can override a
/// single key without restating the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateLayerConfig {
    /// Key holding the JSON list of virtual desktops.
    pub desktops_key: String,
    /// Key holding the active desktop id as raw text.
    pub active_desktop_key: String,
    /// Key holding the JSON list of window groups.
    pub window_groups_key: String,
    /// Key holding the JSON recovery point ring.
    pub recovery_points_key: String,
    /// Key holding the single pending crash record.
    pub crash_record_key: String,
    /// Key holding the JSON bugcheck log.
    pub bugcheck_log_key: String,
    /// Key prefixes never copied into recovery points or crash snapshots.
    pub snapshot_excluded_prefixes: Vec<String>,
    /// Maximum recovery points retained, newest first.
    pub max_recovery_points: usize,
    /// Maximum bugcheck reports retained, oldest dropped first.
    pub max_bugcheck_reports: usize,
    /// Maximum desktops the switcher UI allows the user to create.
    pub max_desktops: usize,
}

impl Default for StateLayerConfig {
    fn default() -> Self {
        Self {
            desktops_key: "retrodesk.desktops.v1".to_string(),
            active_desktop_key: "retrodesk.active_desktop.v1".to_string(),
            window_groups_key: "retrodesk.window_groups.v1".to_string(),
            recovery_points_key: "retrodesk.recovery.points.v1".to_string(),
            crash_record_key: "retrodesk.crash.pending.v1".to_string(),
            bugcheck_log_key: "retrodesk.bugchecks.v1".to_string(),
            snapshot_excluded_prefixes: vec![
                "retrodesk.recovery.".to_string(),
                "retrodesk.crash.".to_string(),
            ],
            max_recovery_points: 10,
            max_bugcheck_reports: 50,
            max_desktops: 8,
        }
    }
}

impl StateLayerConfig {
    /// Parses a (possibly partial) JSON override, falling back to defaults when it is invalid.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(err) => {
                leptos::logging::warn!("state layer config rejected, using defaults: {err}");
                Self::default()
            }
        }
    }

    /// Returns `true` when `key` must stay out of recovery snapshots.
    ///
    /// The recovery ring and the crash record are always excluded, wherever an override puts
    /// them, in addition to every key under `snapshot_excluded_prefixes`.
    pub fn is_snapshot_excluded(&self, key: &str) -> bool {
        key == self.recovery_points_key
            || key == self.crash_record_key
            || self
                .snapshot_excluded_prefixes
                .iter()
                .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bookkeeping_keys_are_excluded_by_default() {
        let config = StateLayerConfig::default();
        assert!(config.is_snapshot_excluded(&config.recovery_points_key));
        assert!(config.is_snapshot_excluded(&config.crash_record_key));
        assert!(!config.is_snapshot_excluded(&config.desktops_key));
        assert!(!config.is_snapshot_excluded(&config.bugcheck_log_key));
    }

    #[test]
    fn relocated_bookkeeping_keys_stay_excluded() {
        let config = StateLayerConfig::from_json(
            r#"{"recovery_points_key": "app.ring", "crash_record_key": "pending_crash"}"#,
        );
        assert!(config.is_snapshot_excluded("app.ring"));
        assert!(config.is_snapshot_excluded("pending_crash"));
        assert!(!config.is_snapshot_excluded("app.ring.backup"));
        assert!(config.is_snapshot_excluded("retrodesk.recovery.scratch"));
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config = StateLayerConfig::from_json(r#"{"max_recovery_points": 3}"#);
        assert_eq!(config.max_recovery_points, 3);
        assert_eq!(config.desktops_key, StateLayerConfig::default().desktops_key);
    }

    #[test]
    fn invalid_override_falls_back_to_defaults() {
        assert_eq!(
            StateLayerConfig::from_json("not json"),
            StateLayerConfig::default()
        );
    }
}
