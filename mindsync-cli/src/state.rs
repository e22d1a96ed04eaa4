use anyhow::{bail, Context, Result};
use mindsync_core::PlanOutcome;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `$MINDSYNC_HOME`, else `~/.mindsync`.
pub fn mindsync_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("MINDSYNC_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".mindsync"))
}

pub fn ensure_mindsync_home() -> Result<PathBuf> {
    let dir = mindsync_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn schedule_path() -> Result<PathBuf> {
    Ok(ensure_mindsync_home()?.join("schedule.json"))
}

/// Last generated schedule. Replaced wholesale on every `plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub generated_at: String,
    #[serde(flatten)]
    pub outcome: PlanOutcome,
}

impl SavedSchedule {
    pub fn new(outcome: PlanOutcome) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            outcome,
        }
    }
}

pub fn write_schedule(path: &Path, saved: &SavedSchedule) -> Result<()> {
    let json = serde_json::to_string_pretty(saved)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_schedule(path: &Path) -> Result<SavedSchedule> {
    if !path.exists() {
        bail!(
            "No saved schedule at {}. Run: mindsync plan --task \"Name=H:MM\"",
            path.display()
        );
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mindsync_core::{DayStart, KeywordClassifier, Pipeline, RawTask};

    #[test]
    fn test_schedule_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let outcome = Pipeline::new(KeywordClassifier, day)
            .run(
                "tired",
                &[RawTask::new("Report", 1, 0), RawTask::new("Walk", 0, 30)],
                DayStart::parse_clock("09:00").unwrap(),
                10,
            )
            .unwrap();
        let saved = SavedSchedule::new(outcome);

        write_schedule(&path, &saved).unwrap();
        let back = read_schedule(&path).unwrap();
        assert_eq!(back, saved);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["strategy"], "short-first");
        assert_eq!(raw["events"][0]["start"], "2026-03-02T09:00:00");
    }

    #[test]
    fn test_missing_schedule_is_helpful_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_schedule(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("mindsync plan"));
    }
}
