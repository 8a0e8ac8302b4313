//! API error type
//!
//! Empty input is the user's mistake (400); anything raised by the pipeline
//! itself is a failed request (500). Both render as
//! `{"error": {"code", "message"}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body missing or malformed (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Error from the prediction pipeline
    #[error(transparent)]
    Pipeline(#[from] genre_common::Error),
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        use genre_common::Error as E;

        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Pipeline(E::EmptySummary) => (StatusCode::BAD_REQUEST, "EMPTY_SUMMARY"),
            ApiError::Pipeline(E::LabelOutOfRange { .. } | E::UnknownLabel(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "LABEL_DECODE_ERROR")
            }
            ApiError::Pipeline(E::DimensionMismatch { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DIMENSION_MISMATCH")
            }
            ApiError::Pipeline(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let empty = ApiError::from(genre_common::Error::EmptySummary);
        assert_eq!(empty.status_and_code(), (StatusCode::BAD_REQUEST, "EMPTY_SUMMARY"));

        let decode = ApiError::from(genre_common::Error::LabelOutOfRange { index: 9, known: 3 });
        assert_eq!(
            decode.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "LABEL_DECODE_ERROR")
        );

        let bad = ApiError::BadRequest("no body".to_string());
        assert_eq!(bad.status_and_code().0, StatusCode::BAD_REQUEST);
    }
}
