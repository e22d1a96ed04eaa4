//! Learned classifier with keyword fallback, plus the process-wide model store.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::classifier::EmotionClassifier;
use crate::emotion::EmotionResult;
use crate::error::ModelError;
use crate::heuristic::KeywordClassifier;
use crate::model::{BagOfWordsModel, SequenceClassifier};

type Loader<M> = Box<dyn Fn() -> Result<M, ModelError> + Send + Sync>;

/// Holds a model that is loaded at most once, on first use.
///
/// Concurrent first callers block in [`ModelStore::get`] until the single load
/// finishes, then all see the same instance. A failed load is remembered as
/// unavailable and is not retried.
pub struct ModelStore<M> {
    source: String,
    loader: Loader<M>,
    cell: OnceLock<Option<Arc<M>>>,
}

impl<M> ModelStore<M> {
    pub fn with_loader(
        source: impl Into<String>,
        loader: impl Fn() -> Result<M, ModelError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: source.into(),
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    /// Wrap an already-built model.
    pub fn preloaded(source: impl Into<String>, model: M) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(Arc::new(model)));
        Self {
            source: source.into(),
            loader: Box::new(|| Err(ModelError::Inference("store was preloaded".to_string()))),
            cell,
        }
    }

    /// Loaded model, or `None` if loading failed.
    pub fn get(&self) -> Option<Arc<M>> {
        self.cell
            .get_or_init(|| match (self.loader)() {
                Ok(m) => {
                    info!(source = %self.source, "emotion model loaded");
                    Some(Arc::new(m))
                }
                Err(e) => {
                    warn!(source = %self.source, error = %e, "emotion model unavailable; using keyword heuristic");
                    None
                }
            })
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.cell.get(), Some(Some(_)))
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl ModelStore<BagOfWordsModel> {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = path.display().to_string();
        Self::with_loader(source, move || BagOfWordsModel::load(&path))
    }
}

impl<M> fmt::Debug for ModelStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelStore")
            .field("source", &self.source)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Runs a [`SequenceClassifier`] and degrades to [`KeywordClassifier`] whenever
/// the model is missing or inference fails.
#[derive(Debug)]
pub struct LearnedClassifier<M> {
    store: Arc<ModelStore<M>>,
    fallback: KeywordClassifier,
}

impl<M> Clone for LearnedClassifier<M> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            fallback: self.fallback,
        }
    }
}

impl<M: SequenceClassifier> LearnedClassifier<M> {
    pub fn new(store: Arc<ModelStore<M>>) -> Self {
        Self {
            store,
            fallback: KeywordClassifier::new(),
        }
    }

    pub fn store(&self) -> &Arc<ModelStore<M>> {
        &self.store
    }

    fn infer(&self, model: &M, text: &str) -> Result<EmotionResult, ModelError> {
        let logits = model.logits(text)?;
        let labels = model.labels();
        if logits.len() != labels.len() {
            return Err(ModelError::Shape(format!(
                "model returned {} logits for {} labels",
                logits.len(),
                labels.len()
            )));
        }

        let probs = softmax(&logits)?;
        let (idx, p) = argmax(&probs)
            .ok_or_else(|| ModelError::Inference("empty distribution".to_string()))?;

        Ok(EmotionResult::for_label(labels[idx].as_str(), p))
    }
}

impl<M: SequenceClassifier> EmotionClassifier for LearnedClassifier<M> {
    fn classify(&self, text: &str) -> EmotionResult {
        let text = text.trim();
        if text.is_empty() {
            return EmotionResult::empty();
        }

        let Some(model) = self.store.get() else {
            return self.fallback.match_keywords(text);
        };

        match self.infer(&model, text) {
            Ok(r) => {
                debug!(label = %r.label, confidence = r.confidence, "learned classification");
                r
            }
            Err(e) => {
                warn!(error = %e, "inference failed; using keyword heuristic");
                self.fallback.match_keywords(text)
            }
        }
    }
}

/// Max-subtracted softmax.
pub fn softmax(logits: &[f32]) -> Result<Vec<f32>, ModelError> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return Err(ModelError::Inference("logits are empty or non-finite".to_string()));
    }

    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if !(sum.is_finite() && sum > 0.0) {
        return Err(ModelError::Inference(format!("bad softmax normaliser {sum}")));
    }
    Ok(exps.into_iter().map(|e| e / sum).collect())
}

/// Index and value of the largest entry. Ties go to the lowest index.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
}
