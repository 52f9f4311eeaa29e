//! Reconciliation of a destination tree against a source tree
//!
//! This module provides:
//! - **applier**: the two-phase pass that copies, creates and removes entries
//! - **report**: the per-pass summary returned to callers

mod applier;
mod report;

pub use applier::{SyncOptions, TreeDiffApplier};
pub use report::{FailedItem, PassReport};
