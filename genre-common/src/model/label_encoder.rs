//! Fitted label encoder: sorted class names, index ↔ string

use serde::{Deserialize, Serialize};

use super::{GenreLabel, LabelDecoder, LabelIndex};
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// Class names in index order (sorted, unique)
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit on arbitrary labels: sorted and deduplicated
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        if let Some(pair) = self.classes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(format!(
                "classes must be sorted and unique ({:?} before {:?})",
                pair[0], pair[1]
            ));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn encode(&self, label: &str) -> Result<LabelIndex> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map(LabelIndex)
            .map_err(|_| Error::UnknownLabel(label.to_string()))
    }
}

impl LabelDecoder for LabelEncoder {
    fn decode(&self, index: LabelIndex) -> Result<GenreLabel> {
        self.classes
            .get(index.0)
            .map(|class| GenreLabel::new(class.clone()))
            .ok_or(Error::LabelOutOfRange {
                index: index.0,
                known: self.classes.len(),
            })
    }

    fn labels(&self) -> &[String] {
        &self.classes
    }
}
