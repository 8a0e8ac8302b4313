//! UI routes - the single prediction page
//!
//! Server-rendered HTML: the form posts back to `/` and the response is the
//! same page with the outcome shown under the form.

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use genre_common::{preview, validate_summary};
use html_escape::encode_text;
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;

/// Form body of `POST /`
#[derive(Debug, Deserialize)]
pub struct SummaryForm {
    #[serde(default)]
    pub summary: String,
}

/// What to show under the form
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { genre: String, preview: String },
    Warning(String),
    Failure(String),
}

fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success { genre, preview } => format!(
            r#"    <div class="alert success">Predicted Genre: {}</div>
    <p class="preview">Summary (first 100 characters): {}...</p>
"#,
            encode_text(genre),
            encode_text(preview)
        ),
        Outcome::Warning(message) => format!(
            "    <div class=\"alert warning\">{}</div>\n",
            encode_text(message)
        ),
        Outcome::Failure(message) => format!(
            "    <div class=\"alert failure\">Prediction failed: {}</div>\n",
            encode_text(message)
        ),
    }
}

/// Render the page, keeping the submitted text in the text area
pub fn render_page(summary: &str, outcome: Option<&Outcome>) -> String {
    let result = outcome.map(render_outcome).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Book Genre Prediction</title>
    <style>
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }}
        h1 {{
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }}
        textarea {{
            width: 100%;
            min-height: 180px;
            font: inherit;
            padding: 8px;
            box-sizing: border-box;
        }}
        button {{
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            margin: 10px 0;
            cursor: pointer;
        }}
        button:hover {{
            background: #0052a3;
        }}
        .alert {{
            padding: 12px 16px;
            border-radius: 4px;
            margin: 16px 0;
        }}
        .success {{ background: #e6f4ea; color: #1e4620; }}
        .warning {{ background: #fff4e5; color: #663c00; }}
        .failure {{ background: #fdecea; color: #611a15; }}
        .preview {{ color: #555; }}
    </style>
</head>
<body>
    <h1>Book Genre Prediction</h1>
    <form method="post" action="/">
        <label for="summary">Enter the Summary of the Book</label>
        <textarea id="summary" name="summary">{summary}</textarea>
        <button type="submit">Predict</button>
    </form>
{result}</body>
</html>
"#,
        summary = encode_text(summary),
        result = result,
    )
}

/// GET /
pub async fn serve_index() -> Html<String> {
    Html(render_page("", None))
}

/// POST /
///
/// Empty input shows a warning and runs no inference.
pub async fn submit_form(State(state): State<AppState>, Form(form): Form<SummaryForm>) -> Response {
    let summary = match validate_summary(&form.summary) {
        Ok(summary) => summary,
        Err(e) => {
            info!("Rejected empty summary");
            let outcome = Outcome::Warning(e.to_string());
            return Html(render_page(&form.summary, Some(&outcome))).into_response();
        }
    };

    match state.pipeline.predict(summary) {
        Ok(prediction) => {
            let outcome = Outcome::Success {
                genre: prediction.genre.into_string(),
                preview: preview(summary).to_string(),
            };
            Html(render_page(summary, Some(&outcome))).into_response()
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            let outcome = Outcome::Failure(e.to_string());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(summary, Some(&outcome))),
            )
                .into_response()
        }
    }
}
