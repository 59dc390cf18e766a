//! Available-time arithmetic against a same-day deadline in Korea Standard Time.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

use crate::CoreError;

/// Asia/Seoul has observed a fixed +09:00 offset with no DST since 1988.
const SEOUL_OFFSET_SECS: i32 = 9 * 3600;

#[must_use]
pub fn seoul_offset() -> FixedOffset {
    FixedOffset::east_opt(SEOUL_OFFSET_SECS).expect("+09:00 is a valid UTC offset")
}

/// Current wall-clock time in Asia/Seoul.
#[must_use]
pub fn seoul_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&seoul_offset())
}

/// Source of "now" for available-time computations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        seoul_now()
    }
}

/// Always returns the same instant. Used by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// A local departure time ("today at HH:MM" in Seoul).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    time: NaiveTime,
}

impl Deadline {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDeadline`] unless `hour` is 0-23 and
    /// `minute` is 0-59.
    pub fn new(hour: u32, minute: u32) -> Result<Self, CoreError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(|time| Self { time })
            .ok_or(CoreError::InvalidDeadline { hour, minute })
    }

    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.time
    }
}

/// Whole minutes from `now` until the deadline on `now`'s Seoul calendar date.
///
/// The result is floored and signed: a deadline that already passed today
/// yields a negative count rather than wrapping around to tomorrow.
#[must_use]
pub fn minutes_until(deadline: Deadline, now: DateTime<FixedOffset>) -> i64 {
    let local = now.with_timezone(&seoul_offset()).time();
    let remaining = deadline.time - local;
    remaining.num_milliseconds().div_euclid(60_000)
}
