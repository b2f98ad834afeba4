use std::{fmt, str::FromStr};

use crate::error::ConversionError;

const DATE_HINT: &str = "use el formato AAAA-MM-DD o AAAA-MM-DD HH:MM:SS";
const TIME_HINT: &str = "use el formato HH:MM:SS";
const DURATION_HINT: &str = "use unidades h, m y s, por ejemplo 2h30m";

/// A clock time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    /// Hour, `0..=23`.
    pub hour:   u8,
    /// Minute, `0..=59`.
    pub minute: u8,
    /// Second, `0..=59`.
    pub second: u8,
}

impl TimeOfDay {
    /// Builds a time of day, rejecting out-of-range components.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::temporal::TimeOfDay;
    ///
    /// assert!(TimeOfDay::new(23, 59, 59).is_some());
    /// assert!(TimeOfDay::new(24, 0, 0).is_none());
    /// ```
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour < 24 && minute < 60 && second < 60 {
            Some(Self { hour, minute, second })
        } else {
            None
        }
    }

    /// Seconds elapsed since midnight.
    #[must_use]
    pub fn seconds(&self) -> i64 {
        i64::from(self.hour) * 3600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl FromStr for TimeOfDay {
    type Err = ConversionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = || ConversionError::new(text, "hora", TIME_HINT);
        let bytes = text.as_bytes();
        if !text.is_ascii() || bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
            return Err(fail());
        }
        let hour = fixed_digits(&text[0..2]).ok_or_else(fail)?;
        let minute = fixed_digits(&text[3..5]).ok_or_else(fail)?;
        let second = fixed_digits(&text[6..8]).ok_or_else(fail)?;

        let component = |n: u32| u8::try_from(n).ok();
        match (component(hour), component(minute), component(second)) {
            (Some(h), Some(m), Some(s)) => Self::new(h, m, s).ok_or_else(fail),
            _ => Err(fail()),
        }
    }
}

/// A calendar date with an optional time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Four-digit year.
    pub year:  i32,
    /// Month, `1..=12`.
    pub month: u8,
    /// Day of month, validated against the month length.
    pub day:   u8,
    /// Optional time component.
    pub time:  Option<TimeOfDay>,
}

impl Date {
    /// Builds a date, validating month length and leap years.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::temporal::Date;
    ///
    /// assert!(Date::new(2024, 2, 29).is_some());
    /// assert!(Date::new(2023, 2, 29).is_none());
    /// assert!(Date::new(2024, 13, 1).is_none());
    /// ```
    #[must_use]
    pub const fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        if month == 0 || month > 12 || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year,
                    month,
                    day,
                    time: None })
    }

    /// Attaches a time of day.
    #[must_use]
    pub const fn with_time(mut self, time: TimeOfDay) -> Self {
        self.time = Some(time);
        self
    }
}

/// Returns `true` for Gregorian leap years.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
#[must_use]
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if let Some(time) = self.time {
            write!(f, " {time}")?;
        }
        Ok(())
    }
}

impl FromStr for Date {
    type Err = ConversionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = || ConversionError::new(text, "fecha", DATE_HINT);
        if !text.is_ascii() {
            return Err(fail());
        }
        let (date_part, time_part) = match text.len() {
            10 => (text, None),
            19 if text.as_bytes()[10] == b' ' => (&text[..10], Some(&text[11..])),
            _ => return Err(fail()),
        };

        let bytes = date_part.as_bytes();
        if bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(fail());
        }
        let year = fixed_digits(&date_part[0..4]).and_then(|y| i32::try_from(y).ok())
                                                 .ok_or_else(fail)?;
        let month = fixed_digits(&date_part[5..7]).and_then(|m| u8::try_from(m).ok())
                                                  .ok_or_else(fail)?;
        let day = fixed_digits(&date_part[8..10]).and_then(|d| u8::try_from(d).ok())
                                                 .ok_or_else(fail)?;
        let date = Self::new(year, month, day).ok_or_else(fail)?;

        match time_part {
            Some(time) => Ok(date.with_time(time.parse().map_err(|_| fail())?)),
            None => Ok(date),
        }
    }
}

/// A signed span of whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    /// Total seconds.
    pub seconds: i64,
}

impl Duration {
    /// Creates a duration from seconds.
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }
}

impl fmt::Display for Duration {
    /// Formats as compound units, omitting zero components.
    ///
    /// # Example
    /// ```
    /// use nepa::interpreter::value::temporal::Duration;
    ///
    /// assert_eq!(Duration::from_seconds(9000).to_string(), "2h30m");
    /// assert_eq!(Duration::from_seconds(3605).to_string(), "1h5s");
    /// assert_eq!(Duration::from_seconds(0).to_string(), "0s");
    /// assert_eq!(Duration::from_seconds(-45).to_string(), "-45s");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds == 0 {
            return write!(f, "0s");
        }
        if self.seconds < 0 {
            write!(f, "-")?;
        }
        let total = self.seconds.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, total % 3600 / 60, total % 60);
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        if seconds > 0 {
            write!(f, "{seconds}s")?;
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = ConversionError;

    /// Parses compound `h`/`m`/`s` units in that order, each at most once.
    /// A bare integer is read as seconds.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fail = || ConversionError::new(text, "tiempo", DURATION_HINT);
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if body.is_empty() {
            return Err(fail());
        }
        if let Ok(seconds) = body.parse::<i64>() {
            return Ok(Self::from_seconds(if negative { -seconds } else { seconds }));
        }

        let mut total: i64 = 0;
        let mut digits = String::new();
        let mut last_rank = 0;
        for ch in body.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }
            let (rank, factor) = match ch {
                'h' => (1, 3600),
                'm' => (2, 60),
                's' => (3, 1),
                _ => return Err(fail()),
            };
            if digits.is_empty() || rank <= last_rank {
                return Err(fail());
            }
            let amount = digits.parse::<i64>().map_err(|_| fail())?;
            total = amount.checked_mul(factor)
                          .and_then(|part| total.checked_add(part))
                          .ok_or_else(fail)?;
            digits.clear();
            last_rank = rank;
        }
        if !digits.is_empty() {
            return Err(fail());
        }
        Ok(Self::from_seconds(if negative { -total } else { total }))
    }
}

fn fixed_digits(text: &str) -> Option<u32> {
    if text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}
