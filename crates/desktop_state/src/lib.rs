//! Window-organization and crash-recovery state for the desktop shell.
//!
//! Every manager receives the same injected [`platform_host::SharedKeyValueStore`] and confines
//! its writes to its own keys, except recovery point capture and restore, which span the whole
//! store minus the bookkeeping prefixes named in [`StateLayerConfig`].

pub mod config;
pub mod error;
pub mod model;
mod persistence;
pub mod recovery;
pub mod session;
pub mod virtual_desktops;
pub mod window_groups;

pub use config::StateLayerConfig;
pub use error::StateError;
pub use model::*;
pub use recovery::{
    export_report_json, report_file_name, BugcheckLog, CrashFlagManager, CrashRecoveryDialog,
    RecoveryChoice, RecoveryOutcome, RecoveryPointManager, RestoreSummary,
};
pub use session::DesktopSession;
pub use virtual_desktops::DesktopManager;
pub use window_groups::WindowGroupManager;
