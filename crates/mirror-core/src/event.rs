//! Sync events and the sinks that record them
//!
//! Every attempted action and every pass boundary produces exactly one
//! [`SyncEvent`]. Events are handed to an [`EventSink`] as soon as they
//! happen and are never modified afterwards.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Timestamp layout used at the start of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Name of the persistent log file inside the log directory
pub const LOG_FILE_NAME: &str = "sync_log.txt";

/// Whether the recorded step succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Error,
}

/// One immutable log record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub timestamp: DateTime<Local>,
    pub outcome: Outcome,
    pub description: String,
}

impl SyncEvent {
    pub fn success(timestamp: DateTime<Local>, description: impl Into<String>) -> Self {
        Self {
            timestamp,
            outcome: Outcome::Success,
            description: description.into(),
        }
    }

    pub fn error(timestamp: DateTime<Local>, description: impl Into<String>) -> Self {
        Self {
            timestamp,
            outcome: Outcome::Error,
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::Error
    }

    /// Render as `<timestamp> <description>`.
    pub fn line(&self) -> String {
        format!("{} {}", self.timestamp.format(TIMESTAMP_FORMAT), self.description)
    }
}

/// Destination for sync events.
///
/// Recording never fails from the caller's point of view: a sink that cannot
/// persist an event reports that on its own and keeps accepting events.
pub trait EventSink {
    fn record(&mut self, event: &SyncEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &SyncEvent) {
        (**self).record(event);
    }
}

/// Appends every event to `<log_dir>/sync_log.txt` and echoes it to stdout.
#[derive(Debug, Clone)]
pub struct LogFileSink {
    log_path: PathBuf,
    echo: bool,
}

impl LogFileSink {
    /// Create a sink writing into `log_dir`, echoing lines to stdout.
    pub fn new(log_dir: &Path) -> Self {
        Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            echo: true,
        }
    }

    /// Enable or disable the stdout echo.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

impl EventSink for LogFileSink {
    fn record(&mut self, event: &SyncEvent) {
        let line = event.line();
        if self.echo {
            println!("{}", line);
        }
        if let Err(e) = mirror_fs::io::append_line(&self.log_path, &line) {
            tracing::warn!(log = ?self.log_path, "Failed to append to sync log: {}", e);
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Vec<SyncEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SyncEvent] {
        &self.events
    }

    /// Descriptions of all recorded events, in order.
    pub fn descriptions(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.description.as_str()).collect()
    }

    /// Number of events whose description contains `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.events
            .iter()
            .filter(|e| e.description.contains(needle))
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &SyncEvent> {
        self.events.iter().filter(|e| e.is_error())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: &SyncEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn line_starts_with_timestamp() {
        let event = SyncEvent::success(at_noon(), "Synchronization started");
        assert_eq!(event.line(), "2024-05-01 12:00:00.000000 Synchronization started");
    }

    #[test]
    fn log_file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = LogFileSink::new(dir.path()).with_echo(false);

        sink.record(&SyncEvent::success(at_noon(), "first"));
        sink.record(&SyncEvent::error(at_noon(), "ERROR: second"));

        let content = std::fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" first"));
        assert!(lines[1].ends_with(" ERROR: second"));
    }

    #[test]
    fn log_file_sink_survives_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = LogFileSink::new(&dir.path().join("missing")).with_echo(false);

        // Must not panic
        sink.record(&SyncEvent::success(at_noon(), "lost"));
    }

    #[test]
    fn outcome_serializes_lowercase() {
        let event = SyncEvent::error(at_noon(), "ERROR: x");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["outcome"], "error");
    }
}
