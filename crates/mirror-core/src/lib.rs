//! Core mirroring engine for dirmirror
//!
//! This crate sits on top of `mirror-fs` and implements:
//!
//! - **TreeDiffApplier**: one reconciliation pass that makes a destination
//!   tree an exact content copy of a source tree
//! - **SyncScheduler**: repeats passes forever at a fixed interval
//! - **Events and sinks**: one log record per attempted action
//! - **Configuration**: the validated inputs the scheduler needs
//!
//! # Architecture
//!
//! ```text
//!                  dirmirror CLI
//!                        |
//!                  SyncScheduler ── Clock
//!                        |
//!                 TreeDiffApplier ── EventSink
//!                        |
//!                    mirror-fs (ContentHasher, atomic copy)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use mirror_core::{LogFileSink, SyncScheduler, SystemClock, TreeDiffApplier};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! fn main() -> mirror_core::Result<()> {
//!     let applier = TreeDiffApplier::new("/data/source", "/data/replica");
//!     let sink = LogFileSink::new(Path::new("/var/log/dirmirror"));
//!     let mut scheduler = SyncScheduler::new(applier, sink, SystemClock, Duration::from_secs(60))?;
//!     scheduler.run()
//! }
//! ```

pub mod action;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod sync;

pub use action::{CopyReason, EntryKind, RelativeEntry, SyncAction};
pub use clock::{Clock, SystemClock};
pub use config::{ConfigField, MirrorConfig, NoPrompt, PartialConfig, ValueProvider};
pub use error::{Error, Result};
pub use event::{EventSink, LogFileSink, MemorySink, Outcome, SyncEvent};
pub use scheduler::SyncScheduler;
pub use sync::{FailedItem, PassReport, SyncOptions, TreeDiffApplier};
