//! Deterministic [`Clock`] for scheduler tests.

use chrono::{DateTime, Local, TimeZone};
use mirror_core::Clock;
use std::sync::Mutex;
use std::time::Duration;

/// A clock that never blocks.
///
/// `sleep` advances the reported time by the requested duration and records
/// the request, so a test can run many scheduler cycles instantly and then
/// inspect the waits.
pub struct FakeClock {
    state: Mutex<State>,
}

struct State {
    now: DateTime<Local>,
    sleeps: Vec<Duration>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeClock {
    /// Start at 2024-01-01 00:00:00 local time.
    pub fn new() -> Self {
        let start = Local
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .earliest()
            .unwrap_or_else(Local::now);
        Self {
            state: Mutex::new(State {
                now: start,
                sleeps: Vec::new(),
            }),
        }
    }

    /// Every duration passed to `sleep`, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Local> {
        self.state.lock().unwrap().now
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.now += chrono::Duration::from_std(duration).unwrap();
        state.sleeps.push(duration);
    }
}
