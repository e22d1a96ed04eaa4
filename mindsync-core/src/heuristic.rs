//! Deterministic keyword classifier. Always available.

use crate::classifier::EmotionClassifier;
use crate::emotion::{EmotionResult, NEUTRAL};

/// Fallback confidence when nothing matches.
pub const NEUTRAL_CONFIDENCE: f32 = 0.6;

/// Checked in order; first hit wins.
const KEYWORD_RULES: &[(&str, &[&str], f32)] = &[
    ("joy", &["happy", "great", "excited", "optimistic"], 0.85),
    ("sadness", &["sad", "down", "tired", "exhausted", "anxious"], 0.80),
    ("anger", &["angry", "mad", "furious"], 0.80),
    ("fear", &["scared", "afraid", "worried", "panic"], 0.75),
];

/// Substring keyword matcher over the lower-cased text.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify non-empty text. Empty input handling lives in
    /// [`EmotionClassifier::classify`].
    pub fn match_keywords(&self, text: &str) -> EmotionResult {
        let lower = text.to_lowercase();

        for (label, keywords, confidence) in KEYWORD_RULES {
            if keywords.iter().any(|k| lower.contains(k)) {
                return EmotionResult::for_label(*label, *confidence);
            }
        }

        EmotionResult::for_label(NEUTRAL, NEUTRAL_CONFIDENCE)
    }
}

impl EmotionClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> EmotionResult {
        if text.trim().is_empty() {
            return EmotionResult::empty();
        }
        self.match_keywords(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joy_keywords() {
        let r = KeywordClassifier.classify("Feeling GREAT and excited today");
        assert_eq!(r.label, "joy");
        assert_eq!(r.confidence, 0.85);
    }

    #[test]
    fn test_sadness_keywords() {
        let r = KeywordClassifier.classify("so exhausted after last night");
        assert_eq!(r.label, "sadness");
        assert_eq!(r.confidence, 0.80);
    }

    #[test]
    fn test_anger_keywords() {
        let r = KeywordClassifier.classify("I'm furious about the build");
        assert_eq!(r.label, "anger");
        assert_eq!(r.confidence, 0.80);
    }

    #[test]
    fn test_fear_keywords() {
        let r = KeywordClassifier.classify("worried about the exam");
        assert_eq!(r.label, "fear");
        assert_eq!(r.confidence, 0.75);
    }

    /// Joy is checked before sadness even when both appear.
    #[test]
    fn test_priority_order() {
        let r = KeywordClassifier.classify("happy but tired");
        assert_eq!(r.label, "joy");
    }

    /// Matching is by substring, so "mad" hits inside "made".
    #[test]
    fn test_substring_matching() {
        let r = KeywordClassifier.classify("I made dinner");
        assert_eq!(r.label, "anger");
    }

    #[test]
    fn test_no_match_is_neutral() {
        let r = KeywordClassifier.classify("just a regular tuesday");
        assert_eq!(r.label, "neutral");
        assert_eq!(r.confidence, NEUTRAL_CONFIDENCE);
    }

    #[test]
    fn test_empty_text_zero_confidence() {
        for text in ["", "   ", "\n\t"] {
            let r = KeywordClassifier.classify(text);
            assert_eq!(r.label, "neutral");
            assert_eq!(r.confidence, 0.0);
        }
    }
}
