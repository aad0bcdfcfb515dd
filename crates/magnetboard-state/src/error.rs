//! Errors raised by the board snapshot store.

use thiserror::Error;

/// Result type alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("cannot open board store: {0}")]
    Open(String),

    /// Beginning or committing a transaction, or opening the snapshot table.
    #[error("board store unavailable: {0}")]
    Storage(String),

    #[error("cannot read {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("cannot write {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("cannot encode board snapshot: {0}")]
    Encode(String),

    /// The bytes under `board/v{version}` are not a valid document of that version.
    #[error("board snapshot v{version} is corrupt: {reason}")]
    Corrupt { version: u32, reason: String },

    #[error("no migration from schema v{found} (current is v{current})")]
    UnsupportedVersion { found: u32, current: u32 },
}

impl StateError {
    pub(crate) fn read(key: &str, e: impl std::fmt::Display) -> Self {
        Self::Read {
            key: key.to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn write(key: &str, e: impl std::fmt::Display) -> Self {
        Self::Write {
            key: key.to_string(),
            reason: e.to_string(),
        }
    }

    pub(crate) fn corrupt(version: u32, e: impl std::fmt::Display) -> Self {
        Self::Corrupt {
            version,
            reason: e.to_string(),
        }
    }
}
