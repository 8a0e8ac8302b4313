//! Dictionary-backed noun lemmatizer
//!
//! Works like WordNet's morphy for nouns: irregular forms come from an
//! exception table, regular plurals are detached by suffix rules, and a
//! candidate is only accepted if the dictionary knows it.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::{Error, Result};

const BUNDLED_ENGLISH: &str = include_str!("../../resources/lemmas_english.txt");

/// Noun detachment rules, tried in order: (suffix, replacement)
const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

/// Immutable lemma dictionary, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    base_forms: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl Lemmatizer {
    /// The bundled English noun dictionary
    pub fn english() -> Self {
        Self::parse(BUNDLED_ENGLISH)
    }

    /// Load a replacement dictionary
    ///
    /// One entry per line: a lone word is a base form, `form<TAB>lemma`
    /// is an irregular form. Blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::resource(path, e))?;
        let lemmatizer = Self::parse(&content);
        if lemmatizer.is_empty() {
            return Err(Error::resource(path, "lemma file contains no entries"));
        }
        Ok(lemmatizer)
    }

    pub fn parse(content: &str) -> Self {
        let mut lemmatizer = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t').map(str::trim).filter(|f| !f.is_empty());
            match (fields.next(), fields.next()) {
                (Some(form), Some(lemma)) => lemmatizer
                    .exceptions
                    .entry(form.to_lowercase())
                    .or_default()
                    .push(lemma.to_lowercase()),
                (Some(word), None) => {
                    lemmatizer.base_forms.insert(word.to_lowercase());
                }
                _ => {}
            }
        }

        lemmatizer
    }

    pub fn is_empty(&self) -> bool {
        self.base_forms.is_empty() && self.exceptions.is_empty()
    }

    /// Base form of a single token; unknown tokens come back unchanged
    ///
    /// The shortest accepted candidate wins, the token itself first on ties.
    pub fn lemma<'a>(&self, word: &'a str) -> Cow<'a, str> {
        if let Some(lemmas) = self.exceptions.get(word) {
            let own = self.base_forms.contains(word).then_some(word);
            let shortest = own
                .into_iter()
                .chain(lemmas.iter().map(String::as_str))
                .min_by_key(|candidate| candidate.len())
                .unwrap_or(word);
            return Cow::Owned(shortest.to_string());
        }

        let mut best: Option<Cow<'a, str>> =
            self.base_forms.contains(word).then_some(Cow::Borrowed(word));

        for (suffix, replacement) in NOUN_RULES {
            let Some(stem) = word.strip_suffix(suffix) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            let candidate = format!("{}{}", stem, replacement);
            let shorter = best.as_ref().map_or(true, |b| candidate.len() < b.len());
            if shorter && self.base_forms.contains(&candidate) {
                best = Some(Cow::Owned(candidate));
            }
        }

        best.unwrap_or(Cow::Borrowed(word))
    }

    /// Lemmatize every whitespace-separated token
    pub fn lemmatize(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.lemma(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
