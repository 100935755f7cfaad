use chrono::{DateTime, FixedOffset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

pub(crate) const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Source of the invocation-time wall clock reading.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Seconds elapsed since midnight in the time zone of `t`.
///
/// chrono reports a leap second as second 59 with an oversized nanosecond
/// field, so the result stays below [`SECONDS_PER_DAY`].
pub fn seconds_since_midnight<Z: TimeZone>(t: &DateTime<Z>) -> u32 {
    t.hour() * 3600 + t.minute() * 60 + t.second()
}

/// Where "midnight" is. A named zone follows its daylight saving rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportingZone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl ReportingZone {
    pub fn seconds_since_midnight(&self, t: &DateTime<Utc>) -> u32 {
        match self {
            ReportingZone::Fixed(offset) => seconds_since_midnight(&t.with_timezone(offset)),
            ReportingZone::Named(tz) => seconds_since_midnight(&t.with_timezone(tz)),
        }
    }
}
