//! Error types for mirror-core
//!
//! Per-item failures inside a reconciliation pass never surface here; they
//! are turned into error events by the applier. These errors cover
//! configuration and scheduler setup, which happen before any pass runs.

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration value failed its validation predicate
    #[error("Invalid {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A configured path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Source and destination are the same tree or nested inside each other
    #[error("Source {source_dir} and destination {destination_dir} overlap")]
    OverlappingTrees {
        source_dir: PathBuf,
        destination_dir: PathBuf,
    },

    /// The value provider gave up before a valid value was supplied
    #[error("No valid value for {field}: {message}")]
    ValueUnavailable { field: String, message: String },

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
