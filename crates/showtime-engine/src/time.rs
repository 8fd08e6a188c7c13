//! Wall-clock times and calendar dates.
//!
//! Showtimes carry a date-only calendar day and wall-clock start/end times with no
//! timezone. Times are held as minutes since midnight so ordering never depends on
//! how the string was padded.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, ScheduleError};

/// Number of minutes in one wall-clock day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WallTime(u16);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);

    /// Build a time from hour and minute, `None` when either is out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Build a time from minutes since midnight, `None` past 23:59.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    /// Parse a zero-padded 24-hour `HH:MM` string.
    ///
    /// `HH:MM:SS` is accepted as well, since persisted showtimes come back from the
    /// backend with a seconds component. Seconds are truncated.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTime` for any other shape or an out-of-range value.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let format = match s.len() {
            5 => "%H:%M",
            8 => "%H:%M:%S",
            _ => return Err(invalid()),
        };

        // chrono's %H also takes a single digit; require the padded form.
        let shaped = s.bytes().enumerate().all(|(i, b)| {
            if i % 3 == 2 {
                b == b':'
            } else {
                b.is_ascii_digit()
            }
        });
        if !shaped {
            return Err(invalid());
        }

        NaiveTime::parse_from_str(s, format)
            .map(Self::from)
            .map_err(|_| invalid())
    }

    /// Add `minutes` in wall-clock arithmetic.
    ///
    /// The result wraps modulo 24 hours. The flag is `true` when the addition passed
    /// midnight; no date change is represented here.
    pub fn add_minutes(self, minutes: u32) -> (WallTime, bool) {
        let per_day = u32::from(MINUTES_PER_DAY);
        // Reduce first so durations near u32::MAX cannot overflow the sum.
        let end = (u32::from(self.0) + minutes % per_day) % per_day;
        let crosses = u64::from(self.0) + u64::from(minutes) >= u64::from(per_day);
        (Self(end as u16), crosses)
    }
}

impl From<NaiveTime> for WallTime {
    fn from(t: NaiveTime) -> Self {
        Self((t.hour() * 60 + t.minute()) as u16)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for WallTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
/// Returns `ScheduleError::InvalidDate` when the string is not a real calendar day.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}
