//! genre-web library - book genre prediction web service
//!
//! One HTML page with a summary form, plus a small JSON API over the same
//! prediction pipeline.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use genre_common::PredictionPipeline;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Normalizer and artifacts, loaded once at startup (read-only)
    pub pipeline: Arc<PredictionPipeline>,
    /// Service start time, for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: Arc<PredictionPipeline>) -> Self {
        Self {
            pipeline,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::serve_index).post(api::submit_form))
        .route("/api/predict", post(api::predict))
        .route("/api/genres", get(api::list_genres))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
