//! Emotion results and the label -> (icon, friendly name) table.

use serde::{Deserialize, Serialize};

pub const NEUTRAL: &str = "neutral";

/// Known labels with their icon and display name.
const EMOTION_TABLE: &[(&str, &str, &str)] = &[
    ("joy", "😄", "Joy"),
    ("sadness", "😢", "Sadness"),
    ("anger", "😡", "Anger"),
    ("fear", "😨", "Fear"),
    ("optimism", "😊", "Optimism"),
    ("love", "😍", "Love"),
    (NEUTRAL, "🙂", "Neutral"),
];

const NEUTRAL_ICON: &str = "🙂";
const NEUTRAL_NAME: &str = "Neutral";

/// Output of a single classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    /// Lower-cased label. May be outside the known table when a learned model
    /// emits its own label set.
    pub label: String,
    pub friendly_name: String,
    pub icon: String,
    /// Probability of `label`, in [0, 1].
    pub confidence: f32,
}

impl EmotionResult {
    /// Build a result for `label`, filling icon and friendly name from the table.
    /// Unknown labels keep their text but get the neutral icon and name.
    pub fn for_label(label: impl Into<String>, confidence: f32) -> Self {
        let label = label.into().trim().to_lowercase();
        let (icon, friendly) = lookup(&label).unwrap_or((NEUTRAL_ICON, NEUTRAL_NAME));
        Self {
            label,
            friendly_name: friendly.to_string(),
            icon: icon.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Result for empty input: neutral with zero confidence.
    pub fn empty() -> Self {
        Self::for_label(NEUTRAL, 0.0)
    }

    pub fn is_known_label(&self) -> bool {
        lookup(&self.label).is_some()
    }

    /// Confidence as a whole percentage, truncated.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0) as u8
    }

    /// Short encouragement line for this mood.
    pub fn motivation(&self) -> &'static str {
        match self.label.as_str() {
            "joy" => "You're in a great mood! Take advantage of it: handle creative or challenging tasks first.",
            "sadness" => "Be kind to yourself today. Focus on light, rewarding tasks that help rebuild energy.",
            "fear" => "Break things into smaller, actionable steps. Avoid overloading yourself.",
            "anger" => "Direct your energy productively: quick, result-driven tasks work best now.",
            _ => "Steady and focused: a great time for consistent progress.",
        }
    }
}

fn lookup(label: &str) -> Option<(&'static str, &'static str)> {
    EMOTION_TABLE
        .iter()
        .find(|(l, _, _)| *l == label)
        .map(|(_, icon, name)| (*icon, *name))
}
