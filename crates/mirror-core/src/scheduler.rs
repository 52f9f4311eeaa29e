//! Sync scheduler - repeats reconciliation passes on a fixed interval
//!
//! ```text
//! run_once ──→ TreeDiffApplier::run_pass ──→ EventSink
//!     │
//!  Clock::sleep(interval)   (measured from pass completion)
//!     │
//!     └──→ next pass
//! ```
//!
//! Passes never overlap, are never skipped or coalesced, and the interval
//! does not adapt to how long a pass took.

use std::time::Duration;

use tracing::{info, info_span};

use crate::clock::Clock;
use crate::event::EventSink;
use crate::sync::{PassReport, TreeDiffApplier};
use crate::{Error, Result};

/// Drives a [`TreeDiffApplier`] forever at a fixed period
pub struct SyncScheduler<S, C> {
    applier: TreeDiffApplier,
    sink: S,
    clock: C,
    interval: Duration,
    passes: u64,
}

impl<S: EventSink, C: Clock> SyncScheduler<S, C> {
    /// Creates a new `SyncScheduler`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `interval` is zero.
    pub fn new(applier: TreeDiffApplier, sink: S, clock: C, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::invalid("interval", "must be greater than zero"));
        }

        info!(
            interval_secs = interval.as_secs(),
            source = ?applier.source(),
            destination = ?applier.destination(),
            "Creating sync scheduler"
        );

        Ok(Self {
            applier,
            sink,
            clock,
            interval,
            passes: 0,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run a single pass without waiting afterwards.
    pub fn run_once(&mut self) -> PassReport {
        self.passes += 1;
        let span = info_span!("pass", number = self.passes);
        let _guard = span.enter();
        self.applier.run_pass(&mut self.sink, &self.clock)
    }

    /// Run `count` full cycles (pass, then wait) and return their reports.
    pub fn run_passes(&mut self, count: usize) -> Vec<PassReport> {
        (0..count).map(|_| self.cycle()).collect()
    }

    /// Run cycles until the process is terminated.
    pub fn run(&mut self) -> ! {
        info!("Sync scheduler starting");
        loop {
            self.cycle();
        }
    }

    fn cycle(&mut self) -> PassReport {
        let report = self.run_once();
        self.clock.sleep(self.interval);
        report
    }
}
