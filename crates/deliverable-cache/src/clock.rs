//! Time source used to stamp and age cached locations.

use std::fmt;
use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

/// Supplies the current wall-clock time.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> OffsetDateTime;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Manually advanced clock for deterministic expiry tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Start at the Unix epoch plus `seconds`.
    pub fn at_unix_seconds(seconds: i64) -> Self {
        Self::new(OffsetDateTime::UNIX_EPOCH + Duration::seconds(seconds))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Fractional Unix seconds, the representation stored in `create_date`.
pub(crate) fn unix_seconds(at: OffsetDateTime) -> f64 {
    let nanos = at.unix_timestamp_nanos();
    (nanos as f64) / 1_000_000_000.0
}
