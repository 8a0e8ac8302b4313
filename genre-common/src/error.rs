//! Common error types for the genre prediction service

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for genre prediction operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading resources or serving a prediction
#[derive(Error, Debug)]
pub enum Error {
    /// Model artifact missing, unreadable, corrupt or incompatible with its siblings
    #[error("Artifact error ({}): {reason}", path.display())]
    Artifact { path: PathBuf, reason: String },

    /// Linguistic resource override could not be read
    #[error("Resource error ({}): {reason}", path.display())]
    Resource { path: PathBuf, reason: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User submitted no summary text
    #[error("Please enter a summary.")]
    EmptySummary,

    /// Feature vector does not match the classifier's input width
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Classifier produced an index the label encoder was never fitted on
    #[error("Label index {index} out of range (encoder knows {known} labels)")]
    LabelOutOfRange { index: usize, known: usize },

    /// Label string not present in the label encoder
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}

impl Error {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn resource(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Resource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors that stop the process from serving predictions at all
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Error::Artifact { .. } | Error::Resource { .. } | Error::Config(_)
        )
    }
}
