// File: src/test_utils/mod.rs
//
// Shared fixtures for unit and integration tests.

use chrono::{DateTime, Duration, Local, TimeZone};
use parking_lot::Mutex;

use crate::clock::Clock;

/// A clock that only moves when told to, so tests can replay an exact
/// timeline of invocations.
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Local>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// A fixed mid-January anchor, far from any DST transition.
    pub fn at_midday() -> Self {
        let anchor = Local
            .with_ymd_and_hms(2025, 1, 15, 12, 0, 0)
            .single()
            .unwrap_or_else(|| Local::now());
        Self::starting_at(anchor)
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock() = now;
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock();
        *now += Duration::seconds(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock()
    }
}
