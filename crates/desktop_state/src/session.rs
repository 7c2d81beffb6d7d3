//! Session wiring that hands one shared store to every state manager.

use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    model::{BugcheckReport, CrashRecoveryRecord, RecoveryPoint, WindowStateEntry},
    recovery::{
        BugcheckLog, CrashFlagManager, CrashRecoveryDialog, RecoveryChoice, RecoveryOutcome,
        RecoveryPointManager, RestoreSummary,
    },
    virtual_desktops::DesktopManager,
    window_groups::WindowGroupManager,
};

/// All desktop state managers for one page lifetime, sharing a single store.
pub struct DesktopSession {
    config: StateLayerConfig,
    desktops: DesktopManager,
    groups: WindowGroupManager,
    recovery_points: RecoveryPointManager,
    crash_flags: CrashFlagManager,
    bugchecks: BugcheckLog,
}

impl DesktopSession {
    pub fn new(store: SharedKeyValueStore, config: StateLayerConfig) -> Self {
        Self {
            desktops: DesktopManager::new(store.clone(), &config),
            groups: WindowGroupManager::new(store.clone(), &config),
            recovery_points: RecoveryPointManager::new(store.clone(), &config),
            crash_flags: CrashFlagManager::new(store.clone(), &config),
            bugchecks: BugcheckLog::new(store, &config),
            config,
        }
    }

    /// Session backed by the host-selected store (`localStorage` in the browser).
    pub fn for_host(config: StateLayerConfig) -> Self {
        leptos::logging::log!(
            "desktop state session using {} store",
            platform_host_web::host_strategy_name()
        );
        Self::new(platform_host_web::shared_key_value_store(), config)
    }

    pub fn config(&self) -> &StateLayerConfig {
        &self.config
    }

    pub fn desktops(&self) -> &DesktopManager {
        &self.desktops
    }

    pub fn desktops_mut(&mut self) -> &mut DesktopManager {
        &mut self.desktops
    }

    pub fn groups(&self) -> &WindowGroupManager {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut WindowGroupManager {
        &mut self.groups
    }

    pub fn recovery_points(&self) -> &RecoveryPointManager {
        &self.recovery_points
    }

    pub fn crash_flags(&self) -> &CrashFlagManager {
        &self.crash_flags
    }

    pub fn bugchecks(&self) -> &BugcheckLog {
        &self.bugchecks
    }

    /// Returns the recovery dialog when the previous run left a crash record.
    pub fn boot(&self) -> Option<CrashRecoveryDialog> {
        CrashRecoveryDialog::open(&self.crash_flags, &self.recovery_points)
    }

    /// Resolves the boot dialog and, after a restore, reloads managers from the store.
    pub fn resolve_recovery(
        &mut self,
        dialog: CrashRecoveryDialog,
        choice: RecoveryChoice,
    ) -> RecoveryOutcome {
        let outcome = dialog.resolve(choice, &self.crash_flags, &self.recovery_points);
        if outcome.restored() {
            self.reload();
        }
        outcome
    }

    /// Records an unrecoverable fault: appends it to the bugcheck log and leaves a crash record
    /// for the next boot, carrying a snapshot of the non-bookkeeping store entries.
    pub fn report_fault(
        &self,
        report: &BugcheckReport,
        window_state: Option<Vec<WindowStateEntry>>,
    ) -> CrashRecoveryRecord {
        self.bugchecks.append(report);
        let record = CrashRecoveryRecord {
            timestamp: report.timestamp.clone(),
            code: report.code.clone(),
            description: report.description.clone(),
            window_state,
            local_storage: Some(self.recovery_points.snapshot_data()),
        };
        self.crash_flags.set(&record);
        leptos::logging::warn!("bugcheck {}: {}", report.code, report.description);
        record
    }

    /// Captures an automatic recovery point ahead of a risky operation.
    pub fn checkpoint(&self, operation: &str) -> RecoveryPoint {
        self.recovery_points.capture(operation, true)
    }

    /// Restores `point` and reloads desktops and groups so memory matches the store.
    pub fn restore_point(&mut self, point: &RecoveryPoint) -> RestoreSummary {
        let summary = self.recovery_points.restore(point);
        self.reload();
        summary
    }

    /// Drops every desktop and group membership held by a closed window.
    pub fn forget_window(&mut self, window_id: &str) {
        self.desktops.remove_window_from_desktop(window_id);
        self.groups.remove_window_from_all_groups(window_id);
    }

    fn reload(&mut self) {
        self.desktops.reload();
        self.groups.reload();
    }
}
