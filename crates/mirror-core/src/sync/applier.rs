//! TreeDiffApplier implementation
//!
//! One reconciliation pass runs in two phases:
//!
//! 1. Walk the source and push every directory and new or modified file into
//!    the destination.
//! 2. Walk the destination and remove every entry whose relative path no
//!    longer exists in the source.
//!
//! Every attempted action produces exactly one event. A failing item is
//! logged and skipped; nothing inside a pass aborts it.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_fs::{ContentHasher, RelativePath, Sha256Hasher, io};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::action::{CopyReason, EntryKind, RelativeEntry, SyncAction, failure_line};
use crate::clock::Clock;
use crate::event::{EventSink, SyncEvent};

use super::report::{FailedItem, PassReport};

/// Options for a reconciliation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// If true, plan and log actions without modifying the destination.
    /// Descriptions are prefixed with "[dry-run] Would ..."
    pub dry_run: bool,
}

/// Brings a destination tree into content parity with a source tree
pub struct TreeDiffApplier {
    source: PathBuf,
    destination: PathBuf,
    hasher: Box<dyn ContentHasher>,
    options: SyncOptions,
}

impl TreeDiffApplier {
    /// Create an applier using SHA-256 content digests.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            hasher: Box::new(Sha256Hasher),
            options: SyncOptions::default(),
        }
    }

    /// Replace the content hasher.
    pub fn with_hasher(mut self, hasher: impl ContentHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Run one full reconciliation pass.
    ///
    /// Tree state is read fresh; nothing is cached between calls. Per-item
    /// failures are recorded as error events and in the returned report.
    pub fn run_pass(&self, sink: &mut dyn EventSink, clock: &dyn Clock) -> PassReport {
        let mut pass = Pass {
            sink,
            clock,
            report: PassReport::new(self.options.dry_run),
            indeterminate: Vec::new(),
        };

        info!(source = ?self.source, destination = ?self.destination, dry_run = self.options.dry_run, "Pass started");
        pass.log(if self.options.dry_run {
            "Synchronization started (dry run)".to_string()
        } else {
            "Synchronization started".to_string()
        });

        self.propagate(&mut pass);
        self.remove_orphans(&mut pass);

        pass.log("Synchronization finished".to_string());
        info!(
            mutations = pass.report.mutations(),
            unchanged = pass.report.unchanged.len(),
            failures = pass.report.failures.len(),
            "Pass finished"
        );

        pass.report
    }

    // ── Phase 1: additions and modifications ──────────────────────────────

    fn propagate(&self, pass: &mut Pass<'_>) {
        let walker = WalkDir::new(&self.source)
            .follow_links(true)
            .sort_by_file_name();

        for next in walker {
            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    // Nothing beneath an unreadable source path may be
                    // treated as an orphan in phase 2
                    let rel = record_walk_error(pass, &self.source, err);
                    pass.indeterminate.push(rel);
                    continue;
                }
            };

            let Some(rel) = RelativePath::from_root(&self.source, entry.path()) else {
                continue;
            };

            let Some(kind) = entry_kind(entry.file_type()) else {
                let err = mirror_fs::Error::read(
                    entry.path(),
                    std::io::Error::other("not a regular file or directory"),
                );
                pass.fail(rel.clone(), failure_line("Entry", &rel, "mirrored", &err));
                continue;
            };

            let item = RelativeEntry { path: rel, kind };
            match item.kind {
                EntryKind::Directory => self.ensure_directory(pass, item.path),
                EntryKind::File => self.propagate_file(pass, item.path, entry.path()),
            }
        }
    }

    fn ensure_directory(&self, pass: &mut Pass<'_>, rel: RelativePath) {
        let target = rel.resolve(&self.destination);
        match fs::symlink_metadata(&target) {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %rel, "Directory already exists");
            }
            Ok(_) => {
                // A file or link sits where the directory belongs
                if self.apply(pass, SyncAction::RemoveFile { path: rel.clone() }) {
                    self.apply(pass, SyncAction::CreateDirectory { path: rel });
                }
            }
            Err(_) => {
                self.apply(pass, SyncAction::CreateDirectory { path: rel });
            }
        }
    }

    fn propagate_file(&self, pass: &mut Pass<'_>, rel: RelativePath, source: &Path) {
        let destination = rel.resolve(&self.destination);

        let reason = match fs::symlink_metadata(&destination) {
            Err(_) => CopyReason::New,
            Ok(meta) if meta.is_file() => match self.same_content(source, &destination) {
                Ok(true) => {
                    pass.log(format!("Existing file {} checked, no changes", rel));
                    pass.report.unchanged.push(rel);
                    return;
                }
                Ok(false) => CopyReason::Modified,
                Err(err) => {
                    pass.fail(rel.clone(), failure_line("File", &rel, "compared", &err));
                    return;
                }
            },
            Ok(meta) => {
                let removal = if meta.is_dir() {
                    SyncAction::RemoveDirectory { path: rel.clone() }
                } else {
                    SyncAction::RemoveFile { path: rel.clone() }
                };
                if !self.apply(pass, removal) {
                    return;
                }
                CopyReason::New
            }
        };

        self.apply(
            pass,
            SyncAction::CopyFile {
                path: rel,
                source: source.to_path_buf(),
                destination,
                reason,
            },
        );
    }

    fn same_content(&self, source: &Path, destination: &Path) -> mirror_fs::Result<bool> {
        let source_digest = self.hasher.hash(source)?;
        let destination_digest = self.hasher.hash(destination)?;
        debug!(source = %source_digest, destination = %destination_digest, "Compared digests");
        Ok(source_digest == destination_digest)
    }

    // ── Phase 2: orphan removal ───────────────────────────────────────────

    fn remove_orphans(&self, pass: &mut Pass<'_>) {
        if !self.destination.is_dir() {
            debug!(destination = ?self.destination, "Destination missing, nothing to prune");
            return;
        }

        let mut walker = WalkDir::new(&self.destination)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match walker.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    record_walk_error(pass, &self.destination, err);
                    continue;
                }
            };

            let Some(rel) = RelativePath::from_root(&self.destination, entry.path()) else {
                continue;
            };
            let is_dir = entry.file_type().is_dir();

            if pass.is_indeterminate(&rel) {
                debug!(path = %rel, "Source side unreadable, keeping destination entry");
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            if rel.resolve(&self.source).exists() {
                continue;
            }

            if is_dir {
                self.apply(pass, SyncAction::RemoveDirectory { path: rel });
                // Already gone; do not descend
                walker.skip_current_dir();
            } else {
                self.apply(pass, SyncAction::RemoveFile { path: rel });
            }
        }
    }

    // ── Action execution ──────────────────────────────────────────────────

    /// Apply (or plan) one action and log the outcome. Returns whether it
    /// succeeded.
    fn apply(&self, pass: &mut Pass<'_>, action: SyncAction) -> bool {
        if self.options.dry_run {
            pass.log(action.describe_planned());
            pass.report.actions.push(action);
            return true;
        }

        let result = match &action {
            SyncAction::CreateDirectory { path } => {
                io::create_dir_all(&path.resolve(&self.destination))
            }
            SyncAction::CopyFile {
                source,
                destination,
                ..
            } => io::copy_atomic(source, destination),
            SyncAction::RemoveFile { path } => io::remove_file(&path.resolve(&self.destination)),
            SyncAction::RemoveDirectory { path } => {
                io::remove_dir_all(&path.resolve(&self.destination))
            }
        };

        match result {
            Ok(()) => {
                debug!(action = ?action, "Applied");
                pass.log(action.describe(&self.source, &self.destination));
                pass.report.actions.push(action);
                true
            }
            Err(err) => {
                let message = action.describe_failure(&err);
                pass.fail(action.path().clone(), message);
                false
            }
        }
    }
}

/// Files and directories are mirrored; sockets, pipes and devices are not.
fn entry_kind(file_type: fs::FileType) -> Option<EntryKind> {
    if file_type.is_dir() {
        Some(EntryKind::Directory)
    } else if file_type.is_file() {
        Some(EntryKind::File)
    } else {
        None
    }
}

/// Log a traversal error and return the relative path it concerns.
fn record_walk_error(pass: &mut Pass<'_>, root: &Path, err: walkdir::Error) -> RelativePath {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let rel = RelativePath::from_root(root, &path).unwrap_or_else(RelativePath::root);

    let description = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other(description));
    let err = mirror_fs::Error::read(path, source);

    pass.fail(rel.clone(), failure_line("Entry", &rel, "read", &err));
    rel
}

/// State of one running pass
struct Pass<'a> {
    sink: &'a mut dyn EventSink,
    clock: &'a dyn Clock,
    report: PassReport,
    /// Source paths whose traversal failed
    indeterminate: Vec<RelativePath>,
}

impl Pass<'_> {
    fn log(&mut self, description: String) {
        let event = SyncEvent::success(self.clock.now(), description);
        self.sink.record(&event);
    }

    fn fail(&mut self, path: RelativePath, message: String) {
        debug!(path = %path, "{}", message);
        let event = SyncEvent::error(self.clock.now(), message.clone());
        self.sink.record(&event);
        self.report.failures.push(FailedItem { path, message });
    }

    fn is_indeterminate(&self, rel: &RelativePath) -> bool {
        self.indeterminate.iter().any(|base| rel.starts_with(base))
    }
}
