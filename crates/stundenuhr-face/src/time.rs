//! Time source for the face.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Timezone the face displays.
pub const FACE_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Source of the current zoned time.
pub trait Clock {
    fn now(&self) -> DateTime<Tz>;
}

/// Reads the system clock and converts it to [`FACE_TIMEZONE`].
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&FACE_TIMEZONE)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self { at }
    }

    /// Fixed clock at a UTC instant, shown in [`FACE_TIMEZONE`].
    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self::new(at.with_timezone(&FACE_TIMEZONE))
    }

    /// Fixed clock at a local wall time in [`FACE_TIMEZONE`].
    ///
    /// Returns `None` for wall times skipped by a DST transition or outside
    /// the calendar. Ambiguous times pick the earlier instant.
    pub fn at_local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        FACE_TIMEZONE
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .earliest()
            .map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.at
    }
}

/// The part of a time the face shows: hour (`0..=23`) and minute (`0..=59`).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct WallTime {
    hour: u8,
    minute: u8,
}

impl WallTime {
    /// Builds a wall time, clamping out-of-range fields.
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour: hour.min(23) as u8, minute: minute.min(59) as u8 }
    }

    pub fn from_time<T: Timelike>(t: &T) -> Self {
        Self::new(t.hour(), t.minute())
    }

    #[inline]
    pub fn hour(self) -> u8 {
        self.hour
    }

    #[inline]
    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Hour on a 12-hour dial (`0..=11`, 0 = twelve o'clock).
    #[inline]
    pub fn dial_hour(self) -> u8 {
        self.hour % 12
    }
}
