//! Time utilities: day start parsing, wall-clock formatting, timezone handling.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::ScheduleError;

/// Event timestamps: local wall clock, second precision, no offset.
pub const WALL_CLOCK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Where the first event of the day starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStart {
    /// Wall-clock time, combined with a date at resolution.
    Clock(NaiveTime),
    /// Fully specified local date-time.
    At(NaiveDateTime),
}

impl DayStart {
    /// Parse `"HH:MM"` (hour may be a single digit).
    pub fn parse_clock(s: &str) -> Result<Self, ScheduleError> {
        parse_clock(s).map(DayStart::Clock)
    }

    /// Concrete start instant, using `day` for clock-only starts.
    pub fn resolve(&self, day: NaiveDate) -> NaiveDateTime {
        match self {
            DayStart::Clock(t) => day.and_time(*t),
            DayStart::At(dt) => *dt,
        }
    }
}

impl FromStr for DayStart {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_clock(s)
    }
}

impl From<NaiveDateTime> for DayStart {
    fn from(dt: NaiveDateTime) -> Self {
        DayStart::At(dt)
    }
}

impl From<NaiveTime> for DayStart {
    fn from(t: NaiveTime) -> Self {
        DayStart::Clock(t)
    }
}

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid regex"))
}

/// Strict `H:MM` / `HH:MM` in 00:00..=23:59.
pub fn parse_clock(s: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidStartTime(s.to_string());

    let caps = clock_re().captures(s.trim()).ok_or_else(invalid)?;
    let h: u32 = caps[1].parse().map_err(|_| invalid())?;
    let m: u32 = caps[2].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}

pub fn format_wall_clock(dt: &NaiveDateTime) -> String {
    dt.format(WALL_CLOCK_FORMAT).to_string()
}

pub fn parse_wall_clock(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, WALL_CLOCK_FORMAT)
}

/// Parse an IANA zone like "Asia/Kolkata".
pub fn parse_timezone(tz: &str) -> Result<Tz, ScheduleError> {
    tz.trim()
        .parse()
        .map_err(|_| ScheduleError::InvalidTimezone(tz.to_string()))
}

/// Interpret a wall-clock time in `tz` and return UTC.
pub fn local_to_utc(local: &NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, ScheduleError> {
    let local_dt = tz.from_local_datetime(local).single().ok_or_else(|| {
        ScheduleError::NonexistentLocalTime(format_wall_clock(local), tz.name().to_string())
    })?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Serde adapter for `YYYY-MM-DDTHH:MM:SS` timestamps.
pub mod wall_clock {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_wall_clock(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_wall_clock(&raw).map_err(serde::de::Error::custom)
    }
}
