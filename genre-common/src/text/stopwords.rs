//! English stopword set

use std::collections::HashSet;
use std::path::Path;

use crate::{Error, Result};

const BUNDLED_ENGLISH: &str = include_str!("../../resources/stopwords_english.txt");

/// Immutable stopword set, built once at startup
#[derive(Debug, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// The bundled NLTK English list
    pub fn english() -> Self {
        Self::parse(BUNDLED_ENGLISH)
    }

    /// Load a replacement list, one word per line
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
        let stopwords = Self::parse(&content);
        if stopwords.is_empty() {
            return Err(Error::resource(path, "stopword file contains no words"));
        }
        Ok(stopwords)
    }

    /// Parse a word list; blank lines and `#` comments are skipped
    pub fn parse(content: &str) -> Self {
        let words = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Drop stopword tokens, keeping the order of the rest
    pub fn remove_from(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|word| !self.contains(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::english()
    }
}
