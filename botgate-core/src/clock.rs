use chrono::{DateTime, Local};

/// Source of the current local time. Admission decisions take `now` from
/// here once per invocation, so tests can substitute a manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
