//! Axum route handlers for the Interview API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, InterviewAnalysis, QuestionSet};
use crate::errors::AppError;
use crate::results::{load_results, SessionResults};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeInterviewRequest {
    #[serde(default)]
    pub transcript: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LatestResultsResponse {
    pub results: Option<SessionResults>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interview/questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    body: Result<Json<QuestionsRequest>, JsonRejection>,
) -> Result<Json<QuestionSet>, AppError> {
    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let role = required(req.role, "Role is required")?;

    let questions = state
        .pipeline
        .generate_questions(&role)
        .await
        .map_err(|e| AppError::analysis(AnalysisKind::QuestionGeneration, e))?;

    Ok(Json(questions))
}

/// POST /api/interview/analyze
pub async fn handle_analyze_interview(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeInterviewRequest>, JsonRejection>,
) -> Result<Json<InterviewAnalysis>, AppError> {
    let Json(req) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let transcript = required(req.transcript, "Transcript is required")?;

    let analysis = state
        .pipeline
        .analyze_interview(&transcript)
        .await
        .map_err(|e| AppError::analysis(AnalysisKind::InterviewAnalysis, e))?;

    Ok(Json(analysis))
}

/// GET /api/interview/results
/// Latest stored session results, or `null` when there are none.
pub async fn handle_latest_results(
    State(state): State<AppState>,
) -> Result<Json<LatestResultsResponse>, AppError> {
    let results = load_results(state.results.as_ref()).await?;
    Ok(Json(LatestResultsResponse { results }))
}

/// Missing and whitespace-only values are the same thing to the caller.
fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
