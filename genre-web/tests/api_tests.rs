//! Integration tests for genre-web endpoints
//!
//! Tests cover:
//! - Form page rendering and submission (success, empty input, decode failure)
//! - JSON prediction API
//! - Genre listing, health and build info

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use genre_common::artifacts::Artifacts;
use genre_common::model::{
    Classifier, ClassifierArtifact, FeatureVector, LabelEncoder, LabelIndex, LinearModel,
    TextVectorizer, TfidfVectorizer,
};
use genre_common::text::{NormalizedText, Normalizer};
use genre_common::PredictionPipeline;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot` method
use genre_web::{build_router, AppState};

const WIZARD: &str =
    "A young wizard discovers his magical heritage and attends a school of magic";

/// Test helper: vocabulary built from the normalizer's own output
fn vectorizer(normalizer: &Normalizer) -> TfidfVectorizer {
    let terms = normalizer.normalize("detective murder wizard magic robot planet");
    let vocabulary: HashMap<String, usize> = terms
        .tokens()
        .enumerate()
        .map(|(index, term)| (term.to_string(), index))
        .collect();
    let idf = vec![1.0; vocabulary.len()];
    TfidfVectorizer::new(vocabulary, idf).expect("one weight per term")
}

/// Test helper: one class per pair of vocabulary terms
fn setup_app() -> axum::Router {
    let normalizer = Normalizer::english();
    let vectorizer = vectorizer(&normalizer);
    assert_eq!(vectorizer.dimension(), 6);
    setup_app_with(normalizer, Box::new(vectorizer))
}

fn setup_app_with(normalizer: Normalizer, vectorizer: Box<dyn TextVectorizer>) -> axum::Router {
    let classifier = ClassifierArtifact::Linear(LinearModel {
        coef: vec![
            vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0],
        ],
        intercept: vec![0.0, 0.0, 0.0],
        classes: vec![0, 1, 2],
    });
    let encoder = LabelEncoder::fit(&["crime", "fantasy", "science"]);

    let artifacts = Artifacts::from_parts(
        vectorizer,
        Box::new(classifier),
        Box::new(encoder),
    )
    .expect("test artifacts are compatible");

    let pipeline = PredictionPipeline::new(normalizer, Arc::new(artifacts));
    build_router(AppState::new(Arc::new(pipeline)))
}

/// Vectorizer that records how often inference reached it
struct CountingVectorizer {
    inner: TfidfVectorizer,
    calls: Arc<AtomicUsize>,
}

impl TextVectorizer for CountingVectorizer {
    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn transform(&self, text: &NormalizedText) -> FeatureVector {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.transform(text)
    }
}

fn setup_counting_app() -> (axum::Router, Arc<AtomicUsize>) {
    let normalizer = Normalizer::english();
    let calls = Arc::new(AtomicUsize::new(0));
    let vectorizer = CountingVectorizer {
        inner: vectorizer(&normalizer),
        calls: Arc::clone(&calls),
    };
    (setup_app_with(normalizer, Box::new(vectorizer)), calls)
}

/// Classifier that claims to emit index 0 but returns an index the
/// encoder has never seen
struct RogueClassifier;

impl Classifier for RogueClassifier {
    fn n_features(&self) -> usize {
        1
    }

    fn class_indices(&self) -> &[usize] {
        &[0]
    }

    fn predict(&self, _features: &FeatureVector) -> genre_common::Result<LabelIndex> {
        Ok(LabelIndex(7))
    }
}

struct OneTermVectorizer;

impl TextVectorizer for OneTermVectorizer {
    fn dimension(&self) -> usize {
        1
    }

    fn transform(&self, _text: &NormalizedText) -> FeatureVector {
        FeatureVector::from_entries(1, [(0, 1.0)])
    }
}

fn setup_rogue_app() -> axum::Router {
    let artifacts = Artifacts::from_parts(
        Box::new(OneTermVectorizer),
        Box::new(RogueClassifier),
        Box::new(LabelEncoder::fit(&["fantasy"])),
    )
    .expect("claimed indices are in range");
    let pipeline = PredictionPipeline::new(Normalizer::english(), Arc::new(artifacts));
    build_router(AppState::new(Arc::new(pipeline)))
}

fn form_request(summary: &str) -> Request<Body> {
    let body = format!("summary={}", form_encode(summary));
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn form_encode(text: &str) -> String {
    text.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).expect("Should parse JSON")
}

// =============================================================================
// Form page
// =============================================================================

#[tokio::test]
async fn test_index_serves_form() {
    let response = setup_app().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Book Genre Prediction"));
    assert!(page.contains("<textarea"));
    assert!(page.contains("Predict"));
}

#[tokio::test]
async fn test_form_submission_shows_genre_and_preview() {
    let response = setup_app().oneshot(form_request(WIZARD)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Predicted Genre: fantasy"));
    assert!(page.contains(&format!("Summary (first 100 characters): {}...", WIZARD)));
}

#[tokio::test]
async fn test_form_preview_is_truncated() {
    let long = format!("{} {}", WIZARD, "and then much more happens ".repeat(10));
    let response = setup_app().oneshot(form_request(&long)).await.unwrap();

    let page = body_text(response).await;
    let expected: String = long.chars().take(100).collect();
    assert!(page.contains(&format!("Summary (first 100 characters): {}...", expected)));
}

#[tokio::test]
async fn test_empty_form_shows_warning() {
    let response = setup_app().oneshot(form_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("Please enter a summary."));
    assert!(!page.contains("Predicted Genre"));
}

#[tokio::test]
async fn test_empty_input_never_reaches_vectorizer() {
    let (app, calls) = setup_counting_app();

    let response = app.clone().oneshot(form_request("")).await.unwrap();
    assert!(body_text(response).await.contains("Please enter a summary."));

    for body in [json!({ "summary": "" }), json!({})] {
        let response = app
            .clone()
            .oneshot(json_request("/api/predict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Same app, real text: the vectorizer is wired in
    let response = app.oneshot(form_request(WIZARD)).await.unwrap();
    assert!(body_text(response).await.contains("Predicted Genre: fantasy"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_whitespace_form_is_classified() {
    let (app, calls) = setup_counting_app();
    let response = app.oneshot(form_request("   ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(!page.contains("Please enter a summary."));
    // All-zero scores: the first class wins
    assert!(page.contains("Predicted Genre: crime"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_decode_failure_is_visible() {
    let response = setup_rogue_app().oneshot(form_request(WIZARD)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let page = body_text(response).await;
    assert!(page.contains("Prediction failed"));
    assert!(page.contains("Label index 7 out of range"));
    assert!(!page.contains("Predicted Genre"));
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn test_api_predict() {
    let response = setup_app()
        .oneshot(json_request("/api/predict", json!({ "summary": WIZARD })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["genre"], "fantasy");
    assert_eq!(body["label_index"], 1);
    assert_eq!(body["summary_preview"], WIZARD);
    let normalized = body["normalized"].as_str().unwrap();
    assert!(normalized.split(' ').any(|t| t == "wizard"));
}

#[tokio::test]
async fn test_api_other_genres() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/predict",
            json!({ "summary": "The detective solves a murder" }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["genre"], "crime");

    let response = app
        .oneshot(json_request(
            "/api/predict",
            json!({ "summary": "A robot lands on a hostile planet" }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["genre"], "science");
}

#[tokio::test]
async fn test_api_empty_summary() {
    for body in [json!({ "summary": "" }), json!({})] {
        let response = setup_app()
            .oneshot(json_request("/api/predict", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EMPTY_SUMMARY");
    }
}

#[tokio::test]
async fn test_api_whitespace_summary_is_classified() {
    let response = setup_app()
        .oneshot(json_request("/api/predict", json!({ "summary": " \n\t " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["genre"], "crime");
    assert_eq!(body["label_index"], 0);
    assert_eq!(body["normalized"], "");
}

#[tokio::test]
async fn test_api_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = setup_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_api_decode_failure() {
    let response = setup_rogue_app()
        .oneshot(json_request("/api/predict", json!({ "summary": WIZARD })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"]["code"], "LABEL_DECODE_ERROR");
}

#[tokio::test]
async fn test_api_genres() {
    let response = setup_app().oneshot(get_request("/api/genres")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["genres"],
        json!(["crime", "fantasy", "science"])
    );
}

// =============================================================================
// Health and build info
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let response = setup_app().oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "genre-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(body["vocabulary_size"], 6);
    assert_eq!(body["genre_count"], 3);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let response = setup_app().oneshot(get_request("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
}
