//! Loading of the three fitted artifacts
//!
//! Artifacts are JSON exports of the fitted vectorizer, classifier and label
//! encoder. They are read once, checked against each other, and then shared
//! read-only for the life of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::model::{
    Classifier, ClassifierArtifact, LabelDecoder, LabelEncoder, TextVectorizer, TfidfVectorizer,
};
use crate::{Error, Result};

pub const DEFAULT_CLASSIFIER_FILE: &str = "genre_prediction_model.json";
pub const DEFAULT_VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const DEFAULT_LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Filesystem locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub label_encoder: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join(DEFAULT_CLASSIFIER_FILE),
            vectorizer: dir.join(DEFAULT_VECTORIZER_FILE),
            label_encoder: dir.join(DEFAULT_LABEL_ENCODER_FILE),
        }
    }
}

/// The loaded, mutually consistent artifact triple
pub struct Artifacts {
    pub vectorizer: Box<dyn TextVectorizer>,
    pub classifier: Box<dyn Classifier>,
    pub label_decoder: Box<dyn LabelDecoder>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("dimension", &self.vectorizer.dimension())
            .field("classes", &self.label_decoder.labels())
            .finish()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::artifact(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::artifact(path, e))
}

impl Artifacts {
    /// Read all three files and check that they fit together
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        debug!("Loading vectorizer from {}", paths.vectorizer.display());
        let vectorizer: TfidfVectorizer = read_json(&paths.vectorizer)?;
        vectorizer
            .validate()
            .map_err(|reason| Error::artifact(&paths.vectorizer, reason))?;

        debug!("Loading classifier from {}", paths.classifier.display());
        let classifier: ClassifierArtifact = read_json(&paths.classifier)?;
        classifier
            .validate()
            .map_err(|reason| Error::artifact(&paths.classifier, reason))?;

        debug!("Loading label encoder from {}", paths.label_encoder.display());
        let label_encoder: LabelEncoder = read_json(&paths.label_encoder)?;
        label_encoder
            .validate()
            .map_err(|reason| Error::artifact(&paths.label_encoder, reason))?;

        let artifacts = Self::from_parts(
            Box::new(vectorizer),
            Box::new(classifier),
            Box::new(label_encoder),
        )
        .map_err(|reason| Error::artifact(&paths.classifier, reason))?;

        info!(
            "Loaded artifacts: {} features, {} genres",
            artifacts.vectorizer.dimension(),
            artifacts.label_decoder.labels().len()
        );
        Ok(artifacts)
    }

    /// Assemble from already-built models, checking cross-artifact compatibility
    pub fn from_parts(
        vectorizer: Box<dyn TextVectorizer>,
        classifier: Box<dyn Classifier>,
        label_decoder: Box<dyn LabelDecoder>,
    ) -> std::result::Result<Self, String> {
        if classifier.n_features() != vectorizer.dimension() {
            return Err(format!(
                "classifier expects {} features but vectorizer produces {}",
                classifier.n_features(),
                vectorizer.dimension()
            ));
        }

        let known = label_decoder.labels().len();
        if let Some(index) = classifier.class_indices().iter().find(|&&i| i >= known) {
            return Err(format!(
                "classifier can emit label index {} but label encoder knows {} labels",
                index, known
            ));
        }

        Ok(Self {
            vectorizer,
            classifier,
            label_decoder,
        })
    }
}

/// Loads the artifacts on first use and hands out the same shared copy after
///
/// Concurrent first callers block until the single load finishes. A failed
/// load leaves the loader empty; nothing retries on its own.
#[derive(Debug)]
pub struct ArtifactLoader {
    paths: ArtifactPaths,
    cell: OnceCell<Arc<Artifacts>>,
}

impl ArtifactLoader {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            cell: OnceCell::new(),
        }
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    pub fn get_or_load(&self) -> Result<Arc<Artifacts>> {
        self.cell
            .get_or_try_init(|| Artifacts::load(&self.paths).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
