//! Error types for mirror-fs

use std::path::{Path, PathBuf};

/// Result type for mirror-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A file could not be opened or fully read
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A destination file could not be created, written, renamed or removed
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be created or recursively removed
    #[error("Cannot change directory structure at {path}: {source}")]
    DirectoryStructure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryStructure {
            path: path.into(),
            source,
        }
    }

    /// The path this error occurred at, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. }
            | Self::Write { path, .. }
            | Self::DirectoryStructure { path, .. }
            | Self::Io { path, .. }
            | Self::LockFailed { path }
            | Self::ConfigParse { path, .. } => Some(path),
            Self::UnsupportedFormat { .. } => None,
        }
    }

    /// The underlying reason without the path prefix.
    ///
    /// Log lines print the path and the reason separately
    /// (`<path> - <reason>`), so this strips the path from the message.
    pub fn reason(&self) -> String {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::DirectoryStructure { source, .. }
            | Self::Io { source, .. } => source.to_string(),
            Self::LockFailed { .. } => "lock acquisition failed".to_string(),
            Self::ConfigParse { message, .. } => message.clone(),
            Self::UnsupportedFormat { extension } => {
                format!("unsupported config format: {extension}")
            }
        }
    }
}
