//! Text normalization
//!
//! Summaries go through four fixed steps before vectorization:
//! clean → remove stopwords → lemmatize → stem. The order matters: stopwords
//! are matched against cleaned lowercase tokens, and the stemmer sees
//! dictionary base forms rather than inflected words.

mod cache;
mod clean;
mod lemmatizer;
mod stemmer;
mod stopwords;

pub use cache::NormalizationCache;
pub use clean::clean;
pub use lemmatizer::Lemmatizer;
pub use stemmer::Stemmer;
pub use stopwords::StopWords;

use std::fmt;

use serde::Serialize;

/// Output of the normalizer: lowercase alphabetic tokens joined by single spaces
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    /// Wrap text that is already normalized (e.g. vectorizer fixtures)
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four-step normalizer with its linguistic resources
#[derive(Debug)]
pub struct Normalizer {
    stopwords: StopWords,
    lemmatizer: Lemmatizer,
    stemmer: Stemmer,
}

impl Normalizer {
    pub fn new(stopwords: StopWords, lemmatizer: Lemmatizer, stemmer: Stemmer) -> Self {
        Self {
            stopwords,
            lemmatizer,
            stemmer,
        }
    }

    /// Bundled English resources
    pub fn english() -> Self {
        Self::new(StopWords::english(), Lemmatizer::english(), Stemmer::porter())
    }

    pub fn clean(&self, text: &str) -> String {
        clean(text)
    }

    pub fn remove_stopwords(&self, text: &str) -> String {
        self.stopwords.remove_from(text)
    }

    pub fn lemmatize(&self, text: &str) -> String {
        self.lemmatizer.lemmatize(text)
    }

    pub fn stem(&self, text: &str) -> String {
        self.stemmer.stem(text)
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        let text = self.clean(raw);
        let text = self.remove_stopwords(&text);
        let text = self.lemmatize(&text);
        NormalizedText(self.stem(&text))
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIZARD: &str =
        "A young wizard discovers his magical heritage and attends a school of magic";

    #[test]
    fn test_wizard_summary_normalizes_to_alphabetic_content_words() {
        let normalizer = Normalizer::english();
        let normalized = normalizer.normalize(WIZARD);

        assert!(!normalized.is_empty());
        assert!(normalized
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == ' '));
        for token in normalized.tokens() {
            assert!(!normalizer.stopwords().contains(token), "stopword {}", token);
        }

        let tokens: Vec<&str> = normalized.tokens().collect();
        assert!(tokens.contains(&"wizard"));
        assert!(tokens.contains(&"magic"));
        assert!(!tokens.contains(&"a"));
        assert!(!tokens.contains(&"his"));
    }

    #[test]
    fn test_steps_run_in_order() {
        let normalizer = Normalizer::english();
        // Stopword removal sees cleaned lowercase text, so "The" is dropped
        assert_eq!(normalizer.normalize("The WIZARDS!"), NormalizedText::new("wizard"));
    }

    #[test]
    fn test_running_is_stable() {
        let normalizer = Normalizer::english();
        let first = normalizer.stem(&normalizer.lemmatize("running"));
        assert_eq!(first, "run");
        for _ in 0..3 {
            assert_eq!(normalizer.stem(&normalizer.lemmatize("running")), first);
        }
    }

    #[test]
    fn test_normalize_twice_equals_once() {
        let normalizer = Normalizer::english();
        let inputs = [
            WIZARD,
            "The detective hunts a killer through the foggy streets of London.",
            "Robots and aliens wage war across the galaxy",
        ];
        for raw in inputs {
            let once = normalizer.normalize(raw);
            let twice = normalizer.normalize(once.as_str());
            assert_eq!(twice, once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_empty_and_symbol_only_inputs() {
        let normalizer = Normalizer::english();
        assert!(normalizer.normalize("").is_empty());
        assert!(normalizer.normalize("?! 123 ...").is_empty());
        assert!(normalizer.normalize("the and of").is_empty());
    }
}
