use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::{AnalysisKind, PipelineError};
use crate::resume::pdf::DocumentError;
use crate::results::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Caller-input problems become 400; collaborator and parse problems become 500.
/// Every body is `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to parse PDF: {0}")]
    Document(#[from] DocumentError),

    #[error("Failed to {action}: {source}")]
    Analysis {
        action: &'static str,
        #[source]
        source: PipelineError,
    },

    #[error("Results store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn analysis(kind: AnalysisKind, source: PipelineError) -> Self {
        AppError::Analysis {
            action: kind.action(),
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Document(DocumentError::NotPdf) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Analysis { source, .. } if source.is_validation() => StatusCode::BAD_REQUEST,
            AppError::Document(_)
            | AppError::Analysis { .. }
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!("{message}");
        } else {
            tracing::debug!("rejected request: {message}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ExtractError, RequestError};
    use crate::llm_client::LlmError;

    #[test]
    fn test_validation_is_bad_request() {
        let err = AppError::Validation("Role is required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Role is required");
    }

    #[test]
    fn test_payload_failures_are_server_errors_with_context() {
        let err = AppError::analysis(
            AnalysisKind::QuestionGeneration,
            PipelineError::Payload(ExtractError::NoStructuredPayload),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Failed to generate questions: model response contained no structured payload"
        );
    }

    #[test]
    fn test_upstream_failure_is_server_error() {
        let err = AppError::analysis(
            AnalysisKind::InterviewAnalysis,
            PipelineError::Upstream(LlmError::EmptyContent),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to analyze interview: model call failed"));
    }

    #[test]
    fn test_pipeline_validation_maps_to_bad_request() {
        let err = AppError::analysis(
            AnalysisKind::ResumeAnalysis,
            PipelineError::InvalidRequest(RequestError::EmptyInput {
                field: "resume text",
            }),
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(
            AppError::from(DocumentError::NotPdf).status(),
            StatusCode::BAD_REQUEST
        );
        let parse = AppError::from(DocumentError::Parse("bad xref".to_string()));
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.to_string(), "Failed to parse PDF: bad xref");
    }
}
