use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DESKTOP_ID: &str = "desktop-1";

/// Fixed group color palette, assigned round-robin by creation order.
pub const GROUP_COLOR_PALETTE: [&str; 8] = [
    "#00d4ff", // cyan
    "#00ff88", // green
    "#ff6b6b", // red
    "#ffd93d", // yellow
    "#9b59b6", // purple
    "#e67e22", // orange
    "#3498db", // blue
    "#1abc9c", // teal
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualDesktop {
    pub id: String,
    pub name: String,
    pub window_ids: Vec<String>,
    pub created_at: String,
}

impl VirtualDesktop {
    pub fn contains(&self, window_id: &str) -> bool {
        self.window_ids.iter().any(|id| id == window_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowGroup {
    pub id: String,
    pub name: String,
    pub window_ids: Vec<String>,
    pub color: String,
    pub created_at: String,
}

impl WindowGroup {
    pub fn contains(&self, window_id: &str) -> bool {
        self.window_ids.iter().any(|id| id == window_id)
    }
}

/// Immutable snapshot of every non-bookkeeping store entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPoint {
    pub id: String,
    pub name: String,
    pub timestamp: String,
    pub data: BTreeMap<String, String>,
    pub auto_created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStateEntry {
    pub id: String,
    pub app_id: String,
    pub app_name: String,
}

/// Pending crash descriptor, consumed once by the recovery dialog at next boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecoveryRecord {
    pub timestamp: String,
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_state: Option<Vec<WindowStateEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_storage: Option<BTreeMap<String, String>>,
}

/// Fault report produced by the global fault handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugcheckReport {
    pub code: String,
    pub description: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_info: Option<BTreeMap<String, String>>,
}

impl BugcheckReport {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            timestamp: platform_host::iso8601_now(),
            location: None,
            stack_trace: None,
            system_info: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}
