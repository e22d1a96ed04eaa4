//! Emotion label -> task ordering strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Low energy: shortest tasks first.
    ShortFirst,
    /// High energy: longest tasks first.
    LongFirst,
    /// Keep the input order.
    #[default]
    Neutral,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ShortFirst => "short-first",
            Strategy::LongFirst => "long-first",
            Strategy::Neutral => "neutral",
        }
    }

    /// One-line notice shown when a schedule is generated.
    pub fn announcement(&self) -> &'static str {
        match self {
            Strategy::LongFirst => "High energy: long tasks first.",
            Strategy::ShortFirst => "Low energy: starting easy.",
            Strategy::Neutral => "Neutral: default order.",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short-first" => Ok(Strategy::ShortFirst),
            "long-first" => Ok(Strategy::LongFirst),
            "neutral" => Ok(Strategy::Neutral),
            other => Err(format!(
                "unknown strategy '{other}' (expected short-first, long-first or neutral)"
            )),
        }
    }
}

/// Total mapping from an (optional) emotion label to a strategy.
pub fn select_strategy(label: Option<&str>) -> Strategy {
    let Some(label) = label else {
        return Strategy::Neutral;
    };

    match label.trim().to_lowercase().as_str() {
        "sadness" | "fear" | "anger" => Strategy::ShortFirst,
        "joy" | "optimism" | "love" => Strategy::LongFirst,
        _ => Strategy::Neutral,
    }
}
