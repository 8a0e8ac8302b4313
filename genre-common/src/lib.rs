//! # Genre Common Library
//!
//! Shared code for the book genre prediction service:
//! - Text normalization and its linguistic resources
//! - Model interfaces and fitted artifact types
//! - Artifact loading
//! - The prediction pipeline
//! - Configuration loading
//! - Error types

pub mod artifacts;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod text;

pub use error::{Error, Result};
pub use pipeline::{preview, validate_summary, Prediction, PredictionPipeline};
