//! Internal failure taxonomy for the desktop state layer.
//!
//! Public manager operations never return these: each operation already defines a safe fallback,
//! so failures are logged at the write site and swallowed. They do surface in
//! [`crate::recovery::RestoreSummary`] so a caller can show what a restore could not write.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Storage failure observed while reading, writing, or enumerating persisted state.
pub enum StateError {
    #[error("read `{key}` failed: {message}")]
    Read { key: String, message: String },
    #[error("write `{key}` failed: {message}")]
    Write { key: String, message: String },
    #[error("remove `{key}` failed: {message}")]
    Remove { key: String, message: String },
    #[error("enumerate keys failed: {message}")]
    Enumerate { message: String },
    #[error("encode `{key}` failed: {message}")]
    Encode { key: String, message: String },
}

impl StateError {
    /// Key the failure relates to, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Read { key, .. }
            | Self::Write { key, .. }
            | Self::Remove { key, .. }
            | Self::Encode { key, .. } => Some(key),
            Self::Enumerate { .. } => None,
        }
    }
}
