//! Model interfaces and the concrete fitted artifacts behind them
//!
//! The pipeline only sees three narrow traits, one per artifact:
//! text → vector, vector → index, index → label.

mod classifier;
mod label_encoder;
mod vectorizer;

pub use classifier::{ClassifierArtifact, LinearModel, MultinomialNb};
pub use label_encoder::LabelEncoder;
pub use vectorizer::{Norm, TfidfVectorizer};

use serde::{Deserialize, Serialize};

use crate::text::NormalizedText;
use crate::Result;

/// Sparse feature vector with a fixed logical dimension
///
/// Entries are sorted by index with no duplicates; absent indices are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from unordered entries; duplicates are summed, indices past
    /// `dimension` and explicit zeros are dropped
    pub fn from_entries(dimension: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = entries
            .into_iter()
            .filter(|&(index, _)| index < dimension)
            .collect();
        entries.sort_by_key(|&(index, _)| index);

        let mut merged: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
        for (index, value) in entries {
            match merged.last_mut() {
                Some((last, acc)) if *last == index => *acc += value,
                _ => merged.push((index, value)),
            }
        }
        merged.retain(|&(_, value)| value != 0.0);

        Self {
            dimension,
            entries: merged,
        }
    }

    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero entries in index order
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product with a dense row of the same dimension
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, value)| value * dense.get(index).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Class identifier produced by a classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelIndex(pub usize);

/// Human-readable genre decoded from a [`LabelIndex`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GenreLabel(String);

impl GenreLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for GenreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized text → feature vector
pub trait TextVectorizer: Send + Sync {
    /// Vocabulary size; every vector produced has this dimension
    fn dimension(&self) -> usize;

    /// Unknown terms contribute nothing
    fn transform(&self, text: &NormalizedText) -> FeatureVector;
}

/// Feature vector → label index
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    /// Every index `predict` can return
    fn class_indices(&self) -> &[usize];

    fn predict(&self, features: &FeatureVector) -> Result<LabelIndex>;
}

/// Label index → genre string
pub trait LabelDecoder: Send + Sync {
    fn decode(&self, index: LabelIndex) -> Result<GenreLabel>;

    /// Known labels in index order
    fn labels(&self) -> &[String];
}
