//! Summary of one reconciliation pass

use mirror_fs::RelativePath;
use serde::{Deserialize, Serialize};

use crate::action::{CopyReason, SyncAction};

/// An item whose action failed during the pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// Relative path of the entry that failed
    pub path: RelativePath,
    /// The error line that was logged for it
    pub message: String,
}

/// Report from a single pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// Whether actions were only planned, not applied
    pub dry_run: bool,
    /// Actions applied (or planned, in a dry run), in order
    pub actions: Vec<SyncAction>,
    /// Files present on both sides with identical content
    pub unchanged: Vec<RelativePath>,
    /// Per-item failures; none of them aborted the pass
    pub failures: Vec<FailedItem>,
}

impl PassReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Whether the pass finished without any per-item failure
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of actions that changed (or would change) the destination
    pub fn mutations(&self) -> usize {
        self.actions.len()
    }

    pub fn copied_new(&self) -> usize {
        self.count_copies(CopyReason::New)
    }

    pub fn copied_modified(&self) -> usize {
        self.count_copies(CopyReason::Modified)
    }

    pub fn created_dirs(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::CreateDirectory { .. }))
            .count()
    }

    /// Files and directories removed from the destination
    pub fn removed(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| {
                matches!(
                    a,
                    SyncAction::RemoveFile { .. } | SyncAction::RemoveDirectory { .. }
                )
            })
            .count()
    }

    fn count_copies(&self, wanted: CopyReason) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, SyncAction::CopyFile { reason, .. } if *reason == wanted))
            .count()
    }
}
