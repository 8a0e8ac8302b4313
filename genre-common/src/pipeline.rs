//! The prediction pipeline: normalize → vectorize → classify → decode

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::artifacts::Artifacts;
use crate::model::{GenreLabel, LabelIndex};
use crate::text::{NormalizationCache, NormalizedText, Normalizer};
use crate::{Error, Result};

/// Characters of the original summary echoed back with a prediction
pub const PREVIEW_CHARS: usize = 100;

/// Result of one successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub genre: GenreLabel,
    pub label_index: LabelIndex,
    pub normalized: NormalizedText,
}

/// Reject an empty summary before any inference
///
/// Whitespace-only text is not empty: it is classified like any other input
/// and normalizes to no tokens.
pub fn validate_summary(raw: &str) -> Result<&str> {
    if raw.is_empty() {
        Err(Error::EmptySummary)
    } else {
        Ok(raw)
    }
}

/// First [`PREVIEW_CHARS`] characters of the original summary
pub fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_offset, _)) => &raw[..byte_offset],
        None => raw,
    }
}

/// Normalizer plus shared artifacts, built once at startup
#[derive(Debug)]
pub struct PredictionPipeline {
    normalizer: Normalizer,
    artifacts: Arc<Artifacts>,
    cache: Option<NormalizationCache>,
}

impl PredictionPipeline {
    pub fn new(normalizer: Normalizer, artifacts: Arc<Artifacts>) -> Self {
        Self {
            normalizer,
            artifacts,
            cache: None,
        }
    }

    /// Memoize normalization for up to `capacity` distinct inputs (0 disables)
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = NormalizationCache::with_capacity(capacity);
        self
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn cache(&self) -> Option<&NormalizationCache> {
        self.cache.as_ref()
    }

    /// Known genres in label-index order
    pub fn genres(&self) -> &[String] {
        self.artifacts.label_decoder.labels()
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        match &self.cache {
            Some(cache) => cache.get_or_insert_with(raw, |text| self.normalizer.normalize(text)),
            None => self.normalizer.normalize(raw),
        }
    }

    /// Run the full pipeline on a summary
    ///
    /// Callers check for empty input with [`validate_summary`] first.
    pub fn predict(&self, raw: &str) -> Result<Prediction> {
        let normalized = self.normalize(raw);
        let features = self.artifacts.vectorizer.transform(&normalized);
        let label_index = self.artifacts.classifier.predict(&features)?;
        let genre = self.artifacts.label_decoder.decode(label_index)?;

        debug!(
            "Predicted {:?} (index {}) from {} tokens, {} known terms",
            genre.as_str(),
            label_index.0,
            normalized.tokens().count(),
            features.nnz()
        );

        Ok(Prediction {
            genre,
            label_index,
            normalized,
        })
    }
}
