//! Source of "now" for timestamps and the freshness check.

use chrono::{DateTime, Local};

/// Supplies the current local time to a [`Logger`](crate::Logger).
pub trait Clock: Send {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
