//! Filesystem actions a reconciliation pass can take
//!
//! Each action knows how to describe itself in the sync log, both when it
//! succeeds and when it fails.

use mirror_fs::RelativePath;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Why a file is being copied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyReason {
    /// No file existed at the destination path
    New,
    /// The destination file's content digest differed from the source
    Modified,
}

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A relative path together with its kind, the unit compared across trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeEntry {
    pub path: RelativePath,
    pub kind: EntryKind,
}

/// One mutation of the destination tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncAction {
    CreateDirectory {
        path: RelativePath,
    },
    CopyFile {
        path: RelativePath,
        source: PathBuf,
        destination: PathBuf,
        reason: CopyReason,
    },
    RemoveFile {
        path: RelativePath,
    },
    RemoveDirectory {
        path: RelativePath,
    },
}

impl SyncAction {
    /// Relative path the action applies to.
    pub fn path(&self) -> &RelativePath {
        match self {
            Self::CreateDirectory { path }
            | Self::CopyFile { path, .. }
            | Self::RemoveFile { path }
            | Self::RemoveDirectory { path } => path,
        }
    }

    /// Log text once the action has been applied.
    pub fn describe(&self, source_root: &Path, destination_root: &Path) -> String {
        match self {
            Self::CreateDirectory { path } => {
                format!("New directory {} created in {}", path, destination_root.display())
            }
            Self::CopyFile { path, reason, .. } => format!(
                "{} file {} copied from {} to {}",
                match reason {
                    CopyReason::New => "New",
                    CopyReason::Modified => "Modified",
                },
                path,
                source_root.display(),
                destination_root.display()
            ),
            Self::RemoveFile { path } => {
                format!("Abandoned file {} removed from {}", path, destination_root.display())
            }
            Self::RemoveDirectory { path } => format!(
                "Abandoned directory {} removed from {}",
                path,
                destination_root.display()
            ),
        }
    }

    /// Log text for a dry run, where the action is only planned.
    pub fn describe_planned(&self) -> String {
        match self {
            Self::CreateDirectory { path } => format!("[dry-run] Would create directory {}", path),
            Self::CopyFile { path, reason, .. } => format!(
                "[dry-run] Would copy {} file {}",
                match reason {
                    CopyReason::New => "new",
                    CopyReason::Modified => "modified",
                },
                path
            ),
            Self::RemoveFile { path } => format!("[dry-run] Would remove abandoned file {}", path),
            Self::RemoveDirectory { path } => {
                format!("[dry-run] Would remove abandoned directory {}", path)
            }
        }
    }

    /// Log text when applying the action failed.
    pub fn describe_failure(&self, err: &mirror_fs::Error) -> String {
        let (subject, verb) = match self {
            Self::CreateDirectory { .. } => ("Directory", "created"),
            Self::CopyFile { .. } => ("File", "copied"),
            Self::RemoveFile { .. } => ("File", "removed"),
            Self::RemoveDirectory { .. } => ("Directory", "removed"),
        };
        failure_line(subject, self.path(), verb, err)
    }
}

/// `ERROR: <subject> <path> cannot be <verb>: <file> - <reason>.`
pub(crate) fn failure_line(
    subject: &str,
    path: &RelativePath,
    verb: &str,
    err: &mirror_fs::Error,
) -> String {
    let file = err
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| path.to_string());
    format!(
        "ERROR: {} {} cannot be {}: {} - {}.",
        subject,
        path,
        verb,
        file,
        err.reason()
    )
}
