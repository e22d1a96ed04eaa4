//! The classification capability and the startup-selected implementation.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::emotion::EmotionResult;
use crate::heuristic::KeywordClassifier;
use crate::learned::{LearnedClassifier, ModelStore};
use crate::model::BagOfWordsModel;

/// Maps free text to an emotion. Implementations never fail: empty input gives
/// neutral with zero confidence, and internal problems degrade to a heuristic.
pub trait EmotionClassifier {
    fn classify(&self, text: &str) -> EmotionResult;
}

impl<T: EmotionClassifier + ?Sized> EmotionClassifier for &T {
    fn classify(&self, text: &str) -> EmotionResult {
        (**self).classify(text)
    }
}

impl<T: EmotionClassifier + ?Sized> EmotionClassifier for Arc<T> {
    fn classify(&self, text: &str) -> EmotionResult {
        (**self).classify(text)
    }
}

/// Classifier picked once at startup by probing for a model artifact.
#[derive(Debug, Clone)]
pub enum Classifier {
    Keyword(KeywordClassifier),
    Learned(LearnedClassifier<BagOfWordsModel>),
}

impl Classifier {
    /// Use the learned model if `model_path` is set and the file exists.
    /// Does not load the model; that happens on first classification.
    pub fn probe(model_path: Option<&Path>) -> Self {
        match model_path {
            Some(p) if p.is_file() => {
                info!(path = %p.display(), "learned emotion model available");
                Self::with_store(Arc::new(ModelStore::from_path(p)))
            }
            Some(p) => {
                info!(path = %p.display(), "emotion model not found; using keyword heuristic");
                Self::Keyword(KeywordClassifier::new())
            }
            None => {
                debug!("no emotion model configured; using keyword heuristic");
                Self::Keyword(KeywordClassifier::new())
            }
        }
    }

    /// Learned variant over an existing store handle.
    pub fn with_store(store: Arc<ModelStore<BagOfWordsModel>>) -> Self {
        Self::Learned(LearnedClassifier::new(store))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Learned(_) => "learned",
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::Keyword(KeywordClassifier::new())
    }
}

impl EmotionClassifier for Classifier {
    fn classify(&self, text: &str) -> EmotionResult {
        match self {
            Self::Keyword(c) => c.classify(text),
            Self::Learned(c) => c.classify(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_probe_without_path_is_keyword() {
        assert_eq!(Classifier::probe(None).kind(), "keyword");
    }

    #[test]
    fn test_probe_missing_file_is_keyword() {
        let c = Classifier::probe(Some(Path::new("/nonexistent/emotion.json")));
        assert_eq!(c.kind(), "keyword");
        assert_eq!(c.classify("furious").label, "anger");
    }

    #[test]
    fn test_probe_existing_file_is_learned() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"labels": ["love", "neutral"], "vocabulary": ["hug"],
                "weights": [[4.0, 0.0]], "bias": [0.0, 0.0]}}"#
        )
        .unwrap();

        let c = Classifier::probe(Some(f.path()));
        assert_eq!(c.kind(), "learned");
        let r = c.classify("a big hug");
        assert_eq!(r.label, "love");
        assert_eq!(r.icon, "😍");
    }

    /// A file that exists but isn't a valid model still classifies, via keywords.
    #[test]
    fn test_probe_corrupt_file_falls_back() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();

        let c = Classifier::probe(Some(f.path()));
        assert_eq!(c.kind(), "learned");
        let r = c.classify("feeling down");
        assert_eq!(r.label, "sadness");
        assert_eq!(r.confidence, 0.80);
    }
}
