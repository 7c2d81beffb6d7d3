use platform_host::SharedKeyValueStore;

use crate::{
    config::StateLayerConfig,
    model::BugcheckReport,
    persistence::{load_json_list, remove_raw, warn_on_failure, write_json},
};

/// Capped history of fault reports kept for later inspection.
pub struct BugcheckLog {
    store: SharedKeyValueStore,
    key: String,
    max_reports: usize,
}

impl BugcheckLog {
    pub fn new(store: SharedKeyValueStore, config: &StateLayerConfig) -> Self {
        Self {
            store,
            key: config.bugcheck_log_key.clone(),
            max_reports: config.max_bugcheck_reports,
        }
    }

    /// Reports in arrival order, oldest first.
    pub fn list(&self) -> Vec<BugcheckReport> {
        load_json_list(&*self.store, &self.key)
    }

    /// Appends `report`, dropping the oldest entries beyond the cap.
    pub fn append(&self, report: &BugcheckReport) {
        let mut reports = self.list();
        reports.push(report.clone());
        let overflow = reports.len().saturating_sub(self.max_reports);
        reports.drain(..overflow);
        warn_on_failure("bugcheck log", write_json(&*self.store, &self.key, &reports));
    }

    pub fn clear(&self) {
        warn_on_failure("bugcheck log removal", remove_raw(&*self.store, &self.key));
    }
}

/// Pretty-printed JSON of a report, for copy or download.
pub fn export_report_json(report: &BugcheckReport) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|e| e.to_string())
}

/// Download file name for an exported report.
pub fn report_file_name(report: &BugcheckReport, unix_ms: u64) -> String {
    format!("bugcheck_{}_{unix_ms}.json", report.code)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn log() -> BugcheckLog {
        BugcheckLog::new(
            Rc::new(MemoryKeyValueStore::default()),
            &StateLayerConfig::default(),
        )
    }

    #[test]
    fn log_caps_at_fifty_dropping_oldest() {
        let log = log();
        for n in 0..53 {
            log.append(&BugcheckReport::new(format!("CODE_{n}"), "fault"));
        }
        let reports = log.list();
        assert_eq!(reports.len(), 50);
        assert_eq!(reports[0].code, "CODE_3");
        assert_eq!(reports[49].code, "CODE_52");

        log.clear();
        assert!(log.list().is_empty());
    }

    #[test]
    fn export_names_file_after_code() {
        let report = BugcheckReport::new("DEV_TEST", "manual")
            .with_location("settings")
            .with_stack_trace("at main");
        assert_eq!(
            report_file_name(&report, 1_700_000_000_000),
            "bugcheck_DEV_TEST_1700000000000.json"
        );
        let text = export_report_json(&report).expect("export");
        assert!(text.contains("\"stackTrace\": \"at main\""));
        assert!(!text.contains("systemInfo"));
    }
}
