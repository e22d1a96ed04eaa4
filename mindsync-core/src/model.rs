//! Learned text classifier backends.
//!
//! A backend only has to produce one logit per label; softmax, argmax and label
//! presentation live in [`crate::learned`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Single-label sequence classifier: text in, logits out.
pub trait SequenceClassifier: Send + Sync {
    /// Label for each logit index.
    fn labels(&self) -> &[String];

    /// Forward pass. Must return exactly `labels().len()` values.
    fn logits(&self, text: &str) -> Result<Vec<f32>, ModelError>;
}

/// On-disk JSON artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub labels: Vec<String>,
    pub vocabulary: Vec<String>,
    /// One row per vocabulary entry, one column per label.
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

/// Linear bag-of-words classifier.
#[derive(Debug, Clone)]
pub struct BagOfWordsModel {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
    max_tokens: usize,
}

impl BagOfWordsModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let n_labels = artifact.labels.len();
        if n_labels == 0 {
            return Err(ModelError::Shape("model has no labels".to_string()));
        }
        if artifact.bias.len() != n_labels {
            return Err(ModelError::Shape(format!(
                "bias has {} entries, expected {}",
                artifact.bias.len(),
                n_labels
            )));
        }
        if artifact.weights.len() != artifact.vocabulary.len() {
            return Err(ModelError::Shape(format!(
                "weights has {} rows, vocabulary has {} tokens",
                artifact.weights.len(),
                artifact.vocabulary.len()
            )));
        }
        if let Some((i, row)) = artifact
            .weights
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_labels)
        {
            return Err(ModelError::Shape(format!(
                "weights row {} has {} columns, expected {}",
                i,
                row.len(),
                n_labels
            )));
        }

        let index = artifact
            .vocabulary
            .into_iter()
            .enumerate()
            .map(|(i, tok)| (tok.to_lowercase(), i))
            .collect();

        Ok(Self {
            labels: artifact.labels,
            index,
            weights: artifact.weights,
            bias: artifact.bias,
            max_tokens: artifact.max_tokens.max(1),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let s = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&s)
    }
}

impl SequenceClassifier for BagOfWordsModel {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, text: &str) -> Result<Vec<f32>, ModelError> {
        let mut logits = self.bias.clone();

        for tok in tokenize(text).iter().take(self.max_tokens) {
            if let Some(&row) = self.index.get(tok) {
                for (l, w) in logits.iter_mut().zip(&self.weights[row]) {
                    *l += w;
                }
            }
        }

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ModelError::Inference("non-finite logit".to_string()));
        }
        Ok(logits)
    }
}

/// Lower-case and split on anything that isn't alphanumeric or an apostrophe.
pub fn tokenize(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}
