//! Crash recovery: rotating recovery points, the pending crash record, the bugcheck log, and the
//! boot-time recovery dialog flow.
//!
//! Recovery points deliberately span every storage namespace. The ring and crash keys are kept
//! out of snapshots through the configured exclusion prefixes so a restore cannot overwrite the
//! bookkeeping it is driven by.

mod bugcheck;
mod crash_flag;
mod dialog;
mod points;

pub use bugcheck::{export_report_json, report_file_name, BugcheckLog};
pub use crash_flag::CrashFlagManager;
pub use dialog::{CrashRecoveryDialog, RecoveryChoice, RecoveryOutcome};
pub use points::{RecoveryPointManager, RestoreSummary};
