//! Time source for event timestamps and the inter-pass wait

use chrono::{DateTime, Local};
use std::time::Duration;

/// Supplies the current time and blocks between passes.
///
/// The scheduler never touches the system clock directly, so tests can run
/// many cycles without waiting in real time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Wall-clock implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
