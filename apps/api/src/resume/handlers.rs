//! Axum route handlers for the Resume API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::{AnalysisKind, ResumeAnalysis};
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "resume";
const PDF_MIME: &str = "application/pdf";

/// POST /api/resume/analyze
///
/// Multipart upload, field `resume`, PDF only. The model is only called once
/// the document has yielded some text.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;

    let text = state.documents.extract_text(upload).await?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from PDF".to_string(),
        ));
    }
    info!(chars = text.len(), "resume text extracted");

    let analysis = state
        .pipeline
        .analyze_resume(&text)
        .await
        .map_err(|e| AppError::analysis(AnalysisKind::ResumeAnalysis, e))?;

    Ok(Json(analysis))
}

/// Pulls the `resume` field out of the form, skipping anything else.
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // Clients that omit the part's content type fall through to the magic-byte check.
        if let Some(content_type) = field.content_type() {
            if content_type != PDF_MIME {
                return Err(AppError::Validation(
                    "Please upload only PDF files".to_string(),
                ));
            }
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        if bytes.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "File is too large (max {})",
                describe_limit(max_bytes)
            )));
        }
        if bytes.is_empty() {
            break;
        }
        return Ok(bytes);
    }

    Err(AppError::Validation("No PDF file uploaded".to_string()))
}

/// Human-readable upload limit, rounded up so it never reads as zero.
fn describe_limit(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if bytes >= MIB {
        format!("{} MB", bytes.div_ceil(MIB))
    } else if bytes >= KIB {
        format!("{} KB", bytes.div_ceil(KIB))
    } else {
        format!("{bytes} bytes")
    }
}
