use crate::{
    model::{CrashRecoveryRecord, RecoveryPoint},
    recovery::{CrashFlagManager, RecoveryPointManager, RestoreSummary},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// User choice offered by the crash recovery dialog.
pub enum RecoveryChoice {
    /// Keep the current state.
    ContinueWithoutRecovery,
    /// Restore the listed point with this id, then continue.
    RestorePoint(String),
    /// Dismiss the dialog without restoring.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of resolving a [`CrashRecoveryDialog`].
pub enum RecoveryOutcome {
    Continued,
    Restored {
        point_id: String,
        summary: RestoreSummary,
    },
    Skipped,
}

impl RecoveryOutcome {
    pub fn restored(&self) -> bool {
        matches!(self, Self::Restored { .. })
    }
}

/// Headless state of the recovery dialog shown at boot after a crash.
///
/// Resolving consumes the dialog, so the crash record is cleared exactly once per boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashRecoveryDialog {
    record: CrashRecoveryRecord,
    points: Vec<RecoveryPoint>,
}

impl CrashRecoveryDialog {
    /// Reads the pending crash record. `None` means no dialog should be shown.
    pub fn open(crash_flags: &CrashFlagManager, points: &RecoveryPointManager) -> Option<Self> {
        let record = crash_flags.get()?;
        Some(Self {
            record,
            points: points.list(),
        })
    }

    pub fn record(&self) -> &CrashRecoveryRecord {
        &self.record
    }

    /// Points available for restore, most recent first.
    pub fn points(&self) -> &[RecoveryPoint] {
        &self.points
    }

    pub fn can_restore(&self) -> bool {
        !self.points.is_empty()
    }

    /// Applies `choice` and clears the crash record.
    ///
    /// A restore choice naming a point this dialog did not list restores nothing and continues.
    pub fn resolve(
        self,
        choice: RecoveryChoice,
        crash_flags: &CrashFlagManager,
        points: &RecoveryPointManager,
    ) -> RecoveryOutcome {
        let outcome = match choice {
            RecoveryChoice::ContinueWithoutRecovery => RecoveryOutcome::Continued,
            RecoveryChoice::Skip => RecoveryOutcome::Skipped,
            RecoveryChoice::RestorePoint(point_id) => {
                match self.points.iter().find(|p| p.id == point_id) {
                    Some(point) => RecoveryOutcome::Restored {
                        summary: points.restore(point),
                        point_id,
                    },
                    None => {
                        leptos::logging::warn!(
                            "recovery point `{point_id}` is not available; continuing"
                        );
                        RecoveryOutcome::Continued
                    }
                }
            }
        };
        crash_flags.clear();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::{KeyValueStore, MemoryKeyValueStore, SharedKeyValueStore};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::StateLayerConfig;

    struct Fixture {
        store: MemoryKeyValueStore,
        flags: CrashFlagManager,
        points: RecoveryPointManager,
    }

    fn fixture() -> Fixture {
        let store = MemoryKeyValueStore::from_entries([("app.notes", "draft")]);
        let shared: SharedKeyValueStore = Rc::new(store.clone());
        let config = StateLayerConfig::default();
        Fixture {
            flags: CrashFlagManager::new(shared.clone(), &config),
            points: RecoveryPointManager::new(shared, &config),
            store,
        }
    }

    fn crash() -> CrashRecoveryRecord {
        CrashRecoveryRecord {
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            code: "STATE_CORRUPTION".to_string(),
            description: "inconsistent state".to_string(),
            window_state: None,
            local_storage: None,
        }
    }

    #[test]
    fn no_record_means_no_dialog() {
        let fx = fixture();
        fx.points.capture("point", false);
        assert_eq!(CrashRecoveryDialog::open(&fx.flags, &fx.points), None);
    }

    #[test]
    fn dialog_lists_record_and_points() {
        let fx = fixture();
        let point = fx.points.capture("point", true);
        fx.flags.set(&crash());

        let dialog = CrashRecoveryDialog::open(&fx.flags, &fx.points).expect("dialog");
        assert_eq!(dialog.record(), &crash());
        assert_eq!(dialog.points(), &[point]);
        assert!(dialog.can_restore());
    }

    #[test]
    fn every_path_clears_the_crash_record() {
        let choices = [
            RecoveryChoice::ContinueWithoutRecovery,
            RecoveryChoice::Skip,
            RecoveryChoice::RestorePoint("recovery-unknown".to_string()),
        ];
        for choice in choices {
            let fx = fixture();
            fx.flags.set(&crash());
            let dialog = CrashRecoveryDialog::open(&fx.flags, &fx.points).expect("dialog");
            let outcome = dialog.resolve(choice, &fx.flags, &fx.points);
            assert!(!outcome.restored());
            assert_eq!(fx.flags.get(), None);
            assert_eq!(fx.store.get("app.notes").expect("get"), Some("draft".to_string()));
        }
    }

    #[test]
    fn restore_path_replays_point_then_clears_record() {
        let fx = fixture();
        let point = fx.points.capture("clean", false);
        fx.store.set("app.notes", "corrupted").expect("set");
        fx.flags.set(&crash());

        let dialog = CrashRecoveryDialog::open(&fx.flags, &fx.points).expect("dialog");
        let outcome = dialog.resolve(
            RecoveryChoice::RestorePoint(point.id.clone()),
            &fx.flags,
            &fx.points,
        );

        match outcome {
            RecoveryOutcome::Restored { point_id, summary } => {
                assert_eq!(point_id, point.id);
                assert!(summary.is_clean());
            }
            other => panic!("expected restore, got {other:?}"),
        }
        assert_eq!(fx.store.get("app.notes").expect("get"), Some("draft".to_string()));
        assert_eq!(fx.flags.get(), None);
    }
}
