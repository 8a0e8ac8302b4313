//! Fitted classifiers
//!
//! Both kinds score every class with a linear function of the feature vector
//! and pick the highest score; the first maximum wins on ties.

use serde::{Deserialize, Serialize};

use super::{Classifier, FeatureVector, LabelIndex};
use crate::{Error, Result};

/// Linear decision function (logistic regression, linear SVM, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// One row per class, or a single row for a binary problem
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    /// Encoded label index for each class
    pub classes: Vec<usize>,
}

/// Multinomial naive Bayes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Log P(feature | class), one row per class
    pub feature_log_prob: Vec<Vec<f64>>,
    pub class_log_prior: Vec<f64>,
    pub classes: Vec<usize>,
}

/// A classifier artifact as stored on disk, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Linear(LinearModel),
    MultinomialNb(MultinomialNb),
}

fn argmax(scores: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.into_iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

fn check_matrix(name: &str, rows: &[Vec<f64>]) -> std::result::Result<usize, String> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| format!("{} has no rows", name))?;
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(format!(
            "{} row {} has {} columns, expected {}",
            name,
            i,
            row.len(),
            width
        ));
    }
    Ok(width)
}

impl ClassifierArtifact {
    /// Check internal consistency of a deserialized classifier
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            ClassifierArtifact::Linear(model) => {
                check_matrix("coef", &model.coef)?;
                if model.intercept.len() != model.coef.len() {
                    return Err(format!(
                        "{} intercepts for {} coefficient rows",
                        model.intercept.len(),
                        model.coef.len()
                    ));
                }
                let expected_classes = if model.coef.len() == 1 { 2 } else { model.coef.len() };
                if model.classes.len() != expected_classes {
                    return Err(format!(
                        "{} classes for {} coefficient rows",
                        model.classes.len(),
                        model.coef.len()
                    ));
                }
            }
            ClassifierArtifact::MultinomialNb(model) => {
                check_matrix("feature_log_prob", &model.feature_log_prob)?;
                let rows = model.feature_log_prob.len();
                if model.class_log_prior.len() != rows || model.classes.len() != rows {
                    return Err(format!(
                        "{} priors and {} classes for {} feature_log_prob rows",
                        model.class_log_prior.len(),
                        model.classes.len(),
                        rows
                    ));
                }
            }
        }
        Ok(())
    }

    fn scores(&self, features: &FeatureVector) -> Vec<f64> {
        match self {
            ClassifierArtifact::Linear(model) => model
                .coef
                .iter()
                .zip(&model.intercept)
                .map(|(row, bias)| features.dot(row) + bias)
                .collect(),
            ClassifierArtifact::MultinomialNb(model) => model
                .feature_log_prob
                .iter()
                .zip(&model.class_log_prior)
                .map(|(row, prior)| features.dot(row) + prior)
                .collect(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        let rows = match self {
            ClassifierArtifact::Linear(model) => &model.coef,
            ClassifierArtifact::MultinomialNb(model) => &model.feature_log_prob,
        };
        rows.first().map(Vec::len).unwrap_or(0)
    }

    fn class_indices(&self) -> &[usize] {
        match self {
            ClassifierArtifact::Linear(model) => &model.classes,
            ClassifierArtifact::MultinomialNb(model) => &model.classes,
        }
    }

    fn predict(&self, features: &FeatureVector) -> Result<LabelIndex> {
        if features.dimension() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                actual: features.dimension(),
            });
        }

        let scores = self.scores(features);
        let classes = self.class_indices();

        let position = match self {
            // Single decision row: positive score selects the second class
            ClassifierArtifact::Linear(model) if model.coef.len() == 1 => {
                usize::from(scores[0] > 0.0)
            }
            _ => argmax(scores).unwrap_or(0),
        };

        classes
            .get(position)
            .copied()
            .map(LabelIndex)
            .ok_or(Error::LabelOutOfRange {
                index: position,
                known: classes.len(),
            })
    }
}
