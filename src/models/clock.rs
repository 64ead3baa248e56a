//! Time sources. Scheduling never reads the wall clock itself; callers pick
//! a clock at the boundary and pass `now` down.
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Wall clock shifted forward by whole days. Backs the "Next Day" button so
/// the schedule can be exercised without waiting.
#[derive(Clone, Copy, Debug, Default)]
pub struct OffsetClock {
    pub offset_days: i64,
}

impl OffsetClock {
    pub fn new(offset_days: i64) -> Self {
        Self { offset_days }
    }

    pub fn advance_day(&mut self) {
        self.offset_days += 1;
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now() + Duration::days(self.offset_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_advance() {
        let start = Utc.with_ymd_and_hms(2024, 2, 28, 12, 0, 0).unwrap();
        let clock = FixedClock::new(start);
        clock.advance_days(2);
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_offset_clock_runs_ahead() {
        let mut clock = OffsetClock::new(0);
        clock.advance_day();
        clock.advance_day();
        let ahead = clock.now() - Utc::now();
        assert!(ahead > Duration::days(1) && ahead <= Duration::days(2));
    }
}
