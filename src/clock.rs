//! The source of "now" and "today" for everything that depends on the current date.
//!
//! Date-range presets, future-date checks and record timestamps all read the
//! time through a [Clock] so that tests can pin the date with [FixedClock].

use std::fmt::Debug;

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// Abstraction over the current time.
pub trait Clock: Debug + Send + Sync {
    /// The current date and time in the clock's local offset.
    fn now(&self) -> OffsetDateTime;

    /// The current calendar date in the clock's local offset.
    fn today(&self) -> Date {
        self.now().date()
    }
}

/// Reads the system time and converts it to a canonical timezone, e.g. "Pacific/Auckland".
///
/// The UTC offset is looked up on every call so daylight saving transitions
/// are picked up without restarting the server.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: &'static Tz,
}

impl SystemClock {
    /// Create a clock for the canonical timezone `timezone`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `timezone` is not a known canonical timezone name.
    pub fn new(timezone: &str) -> Result<Self, Error> {
        time_tz::timezones::get_by_name(timezone)
            .map(|timezone| Self { timezone })
            .ok_or_else(|| Error::InvalidTimezoneError(timezone.to_owned()))
    }

    /// The UTC offset of the clock's timezone at the current instant.
    pub fn local_offset(&self) -> UtcOffset {
        self.timezone
            .get_offset_utc(&OffsetDateTime::now_utc())
            .to_utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.local_offset())
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: OffsetDateTime,
}

impl FixedClock {
    /// A clock stuck at `now`.
    pub fn new(now: OffsetDateTime) -> Self {
        Self { now }
    }

    /// A clock stuck at midnight UTC on `date`.
    pub fn on(date: Date) -> Self {
        Self::new(date.midnight().assume_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.now
    }
}
