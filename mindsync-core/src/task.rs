//! Task model and normalization of raw, possibly malformed task rows.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

pub const UNTITLED_TASK: &str = "Untitled Task";

/// Canonical task: trimmed non-empty name and a whole-minute duration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub duration_minutes: u32,
}

impl Task {
    pub fn new(name: impl AsRef<str>, duration_minutes: u32) -> Self {
        Self {
            name: normalize_name(Some(name.as_ref())),
            duration_minutes,
        }
    }

    pub fn from_hours_minutes(name: impl AsRef<str>, hours: u32, minutes: u32) -> Self {
        Self::new(name, hours.saturating_mul(60).saturating_add(minutes))
    }
}

/// A numeric cell as it arrives from a form or JSON payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
    /// Booleans, arrays, objects. Always coerces to 0.
    Other(IgnoredAny),
}

impl RawNumber {
    /// Lenient integer value: floats truncate toward zero, strings are trimmed
    /// and parsed, anything unparseable or negative becomes 0.
    pub fn coerce(&self) -> u32 {
        let v: i64 = match self {
            RawNumber::Int(i) => *i,
            RawNumber::Float(f) if f.is_finite() => f.trunc() as i64,
            RawNumber::Float(_) => 0,
            RawNumber::Text(s) => s.trim().parse().unwrap_or(0),
            RawNumber::Other(_) => 0,
        };
        v.clamp(0, u32::MAX as i64) as u32
    }
}

impl From<i64> for RawNumber {
    fn from(v: i64) -> Self {
        RawNumber::Int(v)
    }
}

impl From<i32> for RawNumber {
    fn from(v: i32) -> Self {
        RawNumber::Int(v.into())
    }
}

impl From<&str> for RawNumber {
    fn from(v: &str) -> Self {
        RawNumber::Text(v.to_string())
    }
}

/// Unvalidated task row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTask {
    pub name: Option<String>,
    pub hours: Option<RawNumber>,
    pub minutes: Option<RawNumber>,
}

impl RawTask {
    pub fn new(name: impl Into<String>, hours: impl Into<RawNumber>, minutes: impl Into<RawNumber>) -> Self {
        Self {
            name: Some(name.into()),
            hours: Some(hours.into()),
            minutes: Some(minutes.into()),
        }
    }

    /// Strict parse of a command-line task spec: `NAME=H:MM`, `NAME=1h30m`,
    /// `NAME=45m` or `NAME=2h`. The name may itself contain `=`; the last one
    /// separates the duration.
    pub fn parse_spec(spec: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidDuration {
            field: "duration",
            value: spec.to_string(),
        };

        let (name, duration) = spec.rsplit_once('=').ok_or_else(invalid)?;
        let duration = duration.trim();

        if let Some(caps) = clock_duration_re().captures(duration) {
            let hours = parse_duration("hours", &caps[1])?;
            let minutes = parse_duration("minutes", &caps[2])?;
            return Ok(Self::new(name, hours as i64, minutes as i64));
        }

        let caps = unit_duration_re().captures(duration).ok_or_else(invalid)?;
        if caps.get(1).is_none() && caps.get(2).is_none() {
            return Err(invalid());
        }
        let hours = caps.get(1).map(|m| parse_duration("hours", m.as_str())).transpose()?;
        let minutes = caps.get(2).map(|m| parse_duration("minutes", m.as_str())).transpose()?;

        Ok(Self::new(
            name,
            hours.unwrap_or(0) as i64,
            minutes.unwrap_or(0) as i64,
        ))
    }
}

fn clock_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+):(\d{1,2})$").expect("valid regex"))
}

fn unit_duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:(\d+)\s*h)?\s*(?:(\d+)\s*m)?$").expect("valid regex"))
}

/// Strict non-negative integer field, for callers that must not coerce.
pub fn parse_duration(field: &'static str, value: &str) -> Result<u32, ScheduleError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ScheduleError::InvalidDuration {
            field,
            value: value.to_string(),
        })
}

fn normalize_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNTITLED_TASK.to_string(),
    }
}

/// Convert raw rows into tasks. Order and count are preserved; a malformed row
/// never affects its neighbours.
pub fn normalize(raw: &[RawTask]) -> Vec<Task> {
    raw.iter()
        .map(|r| {
            let hours = r.hours.as_ref().map(RawNumber::coerce).unwrap_or(0);
            let minutes = r.minutes.as_ref().map(RawNumber::coerce).unwrap_or(0);
            Task::from_hours_minutes(normalize_name(r.name.as_deref()), hours, minutes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_components() {
        let tasks = normalize(&[RawTask::new("Report", 1, 30)]);
        assert_eq!(tasks, vec![Task::new("Report", 90)]);
    }

    #[test]
    fn test_blank_names_become_untitled() {
        let raw = vec![
            RawTask::new("   ", 0, 10),
            RawTask {
                name: None,
                ..Default::default()
            },
            RawTask::new("  Walk  ", 0, 30),
        ];
        let tasks = normalize(&raw);
        assert_eq!(tasks[0].name, UNTITLED_TASK);
        assert_eq!(tasks[1].name, UNTITLED_TASK);
        assert_eq!(tasks[2].name, "Walk");
    }

    #[test]
    fn test_malformed_numbers_coerce_to_zero() {
        let raw = vec![
            RawTask::new("a", "abc", 15),
            RawTask::new("b", 1, "x"),
            RawTask::new("c", " 2 ", "5"),
            RawTask::new("d", -3, 20),
        ];
        let minutes: Vec<u32> = normalize(&raw).iter().map(|t| t.duration_minutes).collect();
        assert_eq!(minutes, vec![15, 60, 125, 20]);
    }

    #[test]
    fn test_json_rows_of_any_shape() {
        let json = r#"[
            {"name": "Report", "hours": 1, "minutes": 0},
            {"name": "Walk", "hours": 0.9, "minutes": 30.7},
            {"name": "Odd", "hours": true, "minutes": [1]},
            {"name": "Null", "hours": null},
            {}
        ]"#;
        let raw: Vec<RawTask> = serde_json::from_str(json).unwrap();
        let tasks = normalize(&raw);

        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].duration_minutes, 60);
        assert_eq!(tasks[1].duration_minutes, 30);
        assert_eq!(tasks[2].duration_minutes, 0);
        assert_eq!(tasks[3].duration_minutes, 0);
        assert_eq!(tasks[4].name, UNTITLED_TASK);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_parse_spec_forms() {
        let cases = [
            ("Report=1:00", "Report", 60),
            ("Walk=0:30", "Walk", 30),
            ("Deep work=1h30m", "Deep work", 90),
            ("Email=45m", "Email", 45),
            ("Gym=2h", "Gym", 120),
            ("a=b=5m", "a=b", 5),
        ];
        for (spec, name, minutes) in cases {
            let tasks = normalize(&[RawTask::parse_spec(spec).unwrap()]);
            assert_eq!(tasks[0], Task::new(name, minutes), "{spec}");
        }
    }

    #[test]
    fn test_parse_spec_rejects_bad_durations() {
        for spec in ["Report", "Report=", "Report=soon", "Report=-1:00", "Report=1.5h"] {
            let err = RawTask::parse_spec(spec).unwrap_err();
            assert!(matches!(err, ScheduleError::InvalidDuration { .. }), "{spec}");
        }
    }

    #[test]
    fn test_parse_duration_strict() {
        assert_eq!(parse_duration("hours", " 3 ").unwrap(), 3);
        assert!(parse_duration("hours", "3.5").is_err());
        assert!(parse_duration("minutes", "-1").is_err());
    }
}
