use anyhow::{Context, Result};
use mindsync_core::{parse_clock, parse_timezone, validate_gap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_mindsync_home;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schedule: ScheduleSection,
    pub classifier: ClassifierSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Day start as HH:MM.
    pub start: String,
    /// Minutes between consecutive tasks.
    pub gap_minutes: i64,
    /// IANA zone used for calendar export (e.g. "Asia/Kolkata").
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSection {
    /// JSON model artifact. Keyword heuristic is used when unset or missing.
    pub model_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default tracing filter level; RUST_LOG overrides.
    pub level: String,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            start: "09:00".to_string(),
            gap_minutes: 10,
            timezone: "UTC".to_string(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Reject schedule values the scheduler would refuse later anyway. Only
    /// commands that build a schedule call this.
    pub fn validate(&self) -> Result<()> {
        parse_clock(&self.schedule.start).context("config schedule.start")?;
        validate_gap(self.schedule.gap_minutes).context("config schedule.gap_minutes")?;
        parse_timezone(&self.schedule.timezone).context("config schedule.timezone")?;
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_mindsync_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Parse only. Values are checked by [`Config::validate`] where they matter.
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(p: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
