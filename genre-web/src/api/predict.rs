//! JSON prediction API

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use genre_common::{preview, validate_summary};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub genre: String,
    pub label_index: usize,
    pub normalized: String,
    /// First 100 characters of the submitted summary
    pub summary_preview: String,
}

#[derive(Debug, Serialize)]
pub struct GenresResponse {
    pub genres: Vec<String>,
}

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> ApiResult<Json<PredictResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let summary = validate_summary(&request.summary).inspect_err(|_| {
        info!("Rejected empty summary");
    })?;

    let prediction = state.pipeline.predict(summary).inspect_err(|e| {
        error!("Prediction failed: {}", e);
    })?;

    Ok(Json(PredictResponse {
        genre: prediction.genre.into_string(),
        label_index: prediction.label_index.0,
        normalized: prediction.normalized.into_string(),
        summary_preview: preview(summary).to_string(),
    }))
}

/// GET /api/genres
///
/// Every genre the label encoder knows, in index order
pub async fn list_genres(State(state): State<AppState>) -> Json<GenresResponse> {
    Json(GenresResponse {
        genres: state.pipeline.genres().to_vec(),
    })
}
