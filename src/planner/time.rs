//! Clock-time-of-day values for the segment timeline.
//!
//! Times are whole minutes since midnight and always wrap at 24 hours, so
//! a leg that starts at 23:50 and lasts 20 minutes ends at 00:10.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 1440;

/// A wall-clock time of day, rendered as `"HH:MM"` in 24-hour form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// 00:00.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { minutes: 0 };

    /// Create a time from an hour (0-23) and minute (0-59).
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }
        Ok(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Build a time from a (possibly fractional, possibly out-of-range)
    /// count of minutes, rounding to the nearest minute and wrapping at 24h.
    pub fn from_minutes(total: f64) -> Self {
        if !total.is_finite() {
            return Self::MIDNIGHT;
        }
        let wrapped = (total.round() as i64).rem_euclid(MINUTES_PER_DAY as i64);
        Self {
            minutes: wrapped as u16,
        }
    }

    /// Minutes since midnight (0-1439).
    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(&self) -> u16 {
        self.minutes % 60
    }

    /// Advance by `minutes`, wrapping past midnight.
    pub fn add_minutes(self, minutes: f64) -> Self {
        Self::from_minutes(self.minutes as f64 + minutes)
    }

    /// Minutes from `self` forward to `end`, crossing midnight when `end`
    /// is earlier in the day.
    pub fn minutes_until(self, end: TimeOfDay) -> u16 {
        let diff = end.minutes as i32 - self.minutes as i32;
        if diff < 0 {
            (diff + MINUTES_PER_DAY as i32) as u16
        } else {
            diff as u16
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (hours, minutes) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

        let valid_part = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !valid_part(hours, 2) || minutes.len() != 2 || !valid_part(minutes, 2) {
            return Err(TimeParseError::InvalidFormat(s.to_string()));
        }

        let hour: u32 = hours
            .parse()
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;
        let minute: u32 = minutes
            .parse()
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

        Self::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Parse an `"HH:MM"` string.
pub fn parse_time(s: &str) -> Result<TimeOfDay, TimeParseError> {
    s.parse()
}

/// Format a minute count as `"HH:MM"`, wrapping at 24h (1500 -> `"01:00"`).
pub fn format_minutes(total_minutes: f64) -> String {
    TimeOfDay::from_minutes(total_minutes).to_string()
}

/// Add minutes to an `"HH:MM"` string, wrapping past midnight.
pub fn add_minutes(start: &str, minutes: f64) -> Result<String, TimeParseError> {
    Ok(parse_time(start)?.add_minutes(minutes).to_string())
}

/// Format a duration in hours as `"2h 35m"`.
pub fn format_duration_hours(hours: f64) -> String {
    let total = if hours.is_finite() && hours > 0.0 {
        (hours * 60.0).round() as u64
    } else {
        0
    };
    format!("{}h {:02}m", total / 60, total % 60)
}

/// Errors parsing a clock time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("Invalid time {0:?}, expected HH:MM")]
    InvalidFormat(String),

    #[error("Hour out of range: {0}")]
    HourOutOfRange(u32),

    #[error("Minute out of range: {0}")]
    MinuteOutOfRange(u32),
}
