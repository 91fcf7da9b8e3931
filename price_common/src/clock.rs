//! Wall-clock access for the fetcher and the scheduler.
//!
//! Production code uses `SystemClock`; tests plug in a clock whose `sleep`
//! advances virtual time so that hours of scheduling run instantly.
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};

/// Source of local time and of blocking waits.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;

    /// Blocks the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Local system time and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Drops the sub-second part of `time`.
pub fn truncate_to_seconds(time: NaiveDateTime) -> NaiveDateTime {
    time.with_nanosecond(0).unwrap_or(time)
}
