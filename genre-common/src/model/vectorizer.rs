//! Fitted TF-IDF vectorizer

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{FeatureVector, TextVectorizer};
use crate::text::NormalizedText;

/// Tokens of two or more word characters
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Row normalization applied after IDF weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

/// Vocabulary and IDF weights exported from a fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term → column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
}

impl TfidfVectorizer {
    /// Unigram, raw-count, L2-normalized vectorizer over the given vocabulary
    ///
    /// Fails when `idf` does not carry exactly one weight per vocabulary column.
    pub fn new(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f64>,
    ) -> std::result::Result<Self, String> {
        let vectorizer = Self {
            vocabulary,
            idf,
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            norm: Norm::default(),
            lowercase: default_lowercase(),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Check internal consistency of a deserialized vectorizer
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.vocabulary.is_empty() {
            return Err("vocabulary is empty".to_string());
        }
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf has {} weights for a vocabulary of {} terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }
        if let Some((term, index)) = self
            .vocabulary
            .iter()
            .find(|(_, &index)| index >= self.idf.len())
        {
            return Err(format!("term {:?} maps to out-of-range column {}", term, index));
        }
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({}, {})", min_n, max_n));
        }
        Ok(())
    }

    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens: Vec<&str> = TOKEN_PATTERN.find_iter(&text).map(|m| m.as_str()).collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        terms
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &NormalizedText) -> FeatureVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text.as_str()) {
            // A column without an IDF weight cannot be scored
            if let Some(&index) = self.vocabulary.get(&term).filter(|&&i| i < self.idf.len()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let length = match self.norm {
            Norm::L2 => weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => weighted.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if length > 0.0 {
            for (_, value) in &mut weighted {
                *value /= length;
            }
        }

        FeatureVector::from_entries(self.dimension(), weighted)
    }
}
