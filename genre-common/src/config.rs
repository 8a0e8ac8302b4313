//! Configuration loading and resolution
//!
//! Every setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The command line and environment are merged by the binary's argument
//! parser and arrive here together as [`ConfigOverrides`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::artifacts::{
    ArtifactPaths, DEFAULT_CLASSIFIER_FILE, DEFAULT_LABEL_ENCODER_FILE, DEFAULT_VECTORIZER_FILE,
};
use crate::text::{Lemmatizer, Normalizer, StopWords, Stemmer};
use crate::{Error, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_CACHE_SIZE: usize = 256;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the optional TOML config file; every key may be omitted
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub artifact_dir: Option<PathBuf>,
    pub classifier_file: Option<String>,
    pub vectorizer_file: Option<String>,
    pub label_encoder_file: Option<String>,
    pub stopwords_path: Option<PathBuf>,
    pub lemmas_path: Option<PathBuf>,
    pub normalization_cache_size: Option<usize>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse a config file if present
    ///
    /// A missing file is not an error: `None` lets startup continue on
    /// defaults. A file that exists but does not parse is fatal.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }
}

/// Platform location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("genre-predict").join("config.toml"))
}

/// Settings taken from the command line or environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub artifact_dir: Option<PathBuf>,
    pub stopwords_path: Option<PathBuf>,
    pub lemmas_path: Option<PathBuf>,
    pub normalization_cache_size: Option<usize>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub artifact_dir: PathBuf,
    pub classifier_file: String,
    pub vectorizer_file: String,
    pub label_encoder_file: String,
    /// `None` uses the bundled English list
    pub stopwords_path: Option<PathBuf>,
    /// `None` uses the bundled English dictionary
    pub lemmas_path: Option<PathBuf>,
    pub normalization_cache_size: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(ConfigOverrides::default(), None)
    }
}

impl Config {
    pub fn resolve(overrides: ConfigOverrides, file: Option<TomlConfig>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            bind_address: overrides
                .bind_address
                .or(file.bind_address)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            // Artifacts live in the working directory unless told otherwise
            artifact_dir: overrides
                .artifact_dir
                .or(file.artifact_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            classifier_file: file
                .classifier_file
                .unwrap_or_else(|| DEFAULT_CLASSIFIER_FILE.to_string()),
            vectorizer_file: file
                .vectorizer_file
                .unwrap_or_else(|| DEFAULT_VECTORIZER_FILE.to_string()),
            label_encoder_file: file
                .label_encoder_file
                .unwrap_or_else(|| DEFAULT_LABEL_ENCODER_FILE.to_string()),
            stopwords_path: overrides.stopwords_path.or(file.stopwords_path),
            lemmas_path: overrides.lemmas_path.or(file.lemmas_path),
            normalization_cache_size: overrides
                .normalization_cache_size
                .or(file.normalization_cache_size)
                .unwrap_or(DEFAULT_CACHE_SIZE),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            classifier: self.artifact_dir.join(&self.classifier_file),
            vectorizer: self.artifact_dir.join(&self.vectorizer_file),
            label_encoder: self.artifact_dir.join(&self.label_encoder_file),
        }
    }

    /// Build the normalizer from bundled or overridden linguistic resources
    pub fn build_normalizer(&self) -> Result<Normalizer> {
        let stopwords = match &self.stopwords_path {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };
        let lemmatizer = match &self.lemmas_path {
            Some(path) => Lemmatizer::from_file(path)?,
            None => Lemmatizer::english(),
        };
        Ok(Normalizer::new(stopwords, lemmatizer, Stemmer::porter()))
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
