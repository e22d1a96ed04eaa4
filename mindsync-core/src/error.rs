//! Error types for the scheduling engine.
//!
//! Only input validation surfaces to callers. Model problems are absorbed by the
//! classifier fallback and only show up in logs.

use std::path::PathBuf;
use thiserror::Error;

/// Caller-visible validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid start time '{0}': expected HH:MM (00:00-23:59)")]
    InvalidStartTime(String),

    #[error("gap must be >= 0 minutes, got {0}")]
    NegativeGap(i64),

    #[error("gap of {0} minutes is out of range (max 4294967295)")]
    GapTooLarge(i64),

    #[error("invalid {field} '{value}': expected a non-negative integer")]
    InvalidDuration { field: &'static str, value: String },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("local time {0} does not exist or is ambiguous in {1} (DST?)")]
    NonexistentLocalTime(String, String),

    #[error("task '{0}' ends past the last representable date")]
    ScheduleOutOfRange(String),
}

/// Failures while loading or running a learned model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("model shape mismatch: {0}")]
    Shape(String),

    #[error("inference failed: {0}")]
    Inference(String),
}
