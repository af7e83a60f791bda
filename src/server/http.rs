//! HTTP handlers for feedback submission and analytics

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::CurationError;
use crate::server::ServerState;
use crate::types::{Category, FeedbackRecord};

/// Feedback submission request
#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub prompt: String,
    pub incorrect_category: String,
    pub correct_category: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub user_quality_score: Option<u8>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Status handler
pub async fn status_handler(State(state): State<ServerState>) -> impl IntoResponse {
    let total_feedback = state
        .service
        .stats()
        .map(|s| s.total_feedback)
        .unwrap_or(0);
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "total_feedback": total_feedback,
    }))
}

/// Accept one correction and trigger curation in the background
///
/// The response reflects only the submission; the curation pass that
/// follows runs detached and cannot fail the request.
pub async fn submit_feedback_handler(
    State(state): State<ServerState>,
    Json(req): Json<SubmitFeedbackRequest>,
) -> impl IntoResponse {
    let incorrect = match parse_category(&req.incorrect_category) {
        Ok(category) => category,
        Err(response) => return response,
    };
    let correct = match parse_category(&req.correct_category) {
        Ok(category) => category,
        Err(response) => return response,
    };

    let mut record = FeedbackRecord::new(req.prompt, incorrect, correct, Utc::now());
    if let Some(confidence) = req.confidence {
        record.confidence = confidence.clamp(0.0, 1.0);
    }
    record.user_quality_score = req.user_quality_score.map(|s| s.min(100));
    if let Some(source) = req.source {
        record.source = source;
    }

    match state.service.submit_feedback(record) {
        Ok(()) => {
            state.service.trigger_curation();
            (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))).into_response()
        }
        Err(CurationError::InvalidRecord(reason)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid feedback record", "details": reason })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to persist feedback", "details": e.to_string() })),
        )
            .into_response(),
    }
}

/// Current golden set handler
pub async fn golden_set_handler(State(state): State<ServerState>) -> impl IntoResponse {
    match state.service.golden_set() {
        Ok(entries) => Json(json!({ "count": entries.len(), "entries": entries })).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Summary statistics handler
pub async fn stats_handler(State(state): State<ServerState>) -> impl IntoResponse {
    match state.service.stats() {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Export snapshot handler
pub async fn export_handler(State(state): State<ServerState>) -> impl IntoResponse {
    match state.service.export() {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => internal_error(e),
    }
}

fn parse_category(label: &str) -> Result<Category, axum::response::Response> {
    Category::parse(label).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Unknown category",
                "details": CurationError::UnknownCategory(label.to_string()).to_string(),
            })),
        )
            .into_response()
    })
}

fn internal_error(e: CurationError) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Store read failed", "details": e.to_string() })),
    )
        .into_response()
}
