//! Analysis pipeline: prompt → model → raw text → validated payload.
//!
//! Stateless apart from the shared model handle, so one `Pipeline` can serve any
//! number of concurrent requests. Nothing here retries.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::extractor::{extract, extract_result, ExtractError, StructuredPayload};
use crate::analysis::models::{InterviewAnalysis, QuestionSet, ResumeAnalysis, StructuredResult};
use crate::analysis::prompts::build_prompt;
use crate::analysis::request::{AnalysisKind, AnalysisRequest, RequestError};
use crate::llm_client::{LlmError, ModelInvoker};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("model call failed: {0}")]
    Upstream(#[from] LlmError),

    #[error(transparent)]
    Payload(#[from] ExtractError),
}

impl PipelineError {
    /// True when the caller's input was at fault and no model call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, PipelineError::InvalidRequest(_))
    }
}

#[derive(Clone)]
pub struct Pipeline {
    model: Arc<dyn ModelInvoker>,
}

impl Pipeline {
    pub fn new(model: Arc<dyn ModelInvoker>) -> Self {
        Self { model }
    }

    pub async fn generate_questions(&self, role: &str) -> Result<QuestionSet, PipelineError> {
        let request = AnalysisRequest::question_generation(role)?;
        self.run(&request).await
    }

    pub async fn analyze_resume(&self, resume_text: &str) -> Result<ResumeAnalysis, PipelineError> {
        let request = AnalysisRequest::resume_analysis(resume_text)?;
        self.run(&request).await
    }

    pub async fn analyze_interview(
        &self,
        transcript: &str,
    ) -> Result<InterviewAnalysis, PipelineError> {
        let request = AnalysisRequest::interview_analysis(transcript)?;
        self.run(&request).await
    }

    /// Runs any request, returning the payload shape its kind calls for.
    pub async fn execute(&self, request: &AnalysisRequest) -> Result<StructuredResult, PipelineError> {
        let raw = self.invoke(request).await?;
        extract_result(&raw, request.kind()).map_err(|e| extraction_failed(request.kind(), e))
    }

    async fn run<T: StructuredPayload>(&self, request: &AnalysisRequest) -> Result<T, PipelineError> {
        debug_assert_eq!(request.kind(), T::KIND);
        let raw = self.invoke(request).await?;
        extract::<T>(&raw).map_err(|e| extraction_failed(request.kind(), e))
    }

    async fn invoke(&self, request: &AnalysisRequest) -> Result<String, PipelineError> {
        let kind = request.kind();
        let prompt = build_prompt(request);
        info!(%kind, prompt_len = prompt.len(), "invoking model");

        let raw = self.model.complete(&prompt).await.map_err(|e| {
            warn!(%kind, error = %e, "model call failed");
            PipelineError::Upstream(e)
        })?;

        info!(%kind, completion_len = raw.len(), "model responded");
        Ok(raw)
    }
}

fn extraction_failed(kind: AnalysisKind, err: ExtractError) -> PipelineError {
    warn!(%kind, error = %err, "could not extract structured payload");
    PipelineError::Payload(err)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;

    fn pipeline_with(model: &Arc<ScriptedModel>) -> Pipeline {
        Pipeline::new(model.clone())
    }

    #[tokio::test]
    async fn test_generate_questions_end_to_end() {
        let model = Arc::new(ScriptedModel::replying([
            r#"Sure! {"questions":["Tell me about yourself"]}"#,
        ]));
        let set = pipeline_with(&model)
            .generate_questions("Software Engineer")
            .await
            .unwrap();

        assert_eq!(set.questions, vec!["Tell me about yourself".to_string()]);
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Software Engineer"));
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_model() {
        let model = Arc::new(ScriptedModel::default());
        let err = pipeline_with(&model).analyze_resume("  \n ").await.unwrap_err();

        assert!(err.is_validation());
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates_without_retry() {
        let model = Arc::new(ScriptedModel::default());
        model.push(Err(LlmError::Api {
            status: 503,
            message: "unavailable".to_string(),
        }));
        model.push(Ok(r#"{"questions": ["never used"]}"#.to_string()));

        let err = pipeline_with(&model)
            .generate_questions("Nurse")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upstream(LlmError::Api { status: 503, .. })));
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_prose_only_completion_is_no_payload() {
        let model = Arc::new(ScriptedModel::replying(["I'm sorry, I can't do that."]));
        let err = pipeline_with(&model)
            .analyze_interview("Q1: Hi\nA1: Hello")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Payload(ExtractError::NoStructuredPayload)
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_score_is_malformed() {
        let model = Arc::new(ScriptedModel::replying([
            r#"{"atsScore": "high", "suggestions": ["Add metrics"]}"#,
        ]));
        let err = pipeline_with(&model)
            .analyze_resume("Jane Doe, Engineer")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Payload(ExtractError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_returns_kind_tagged_result() {
        let model = Arc::new(ScriptedModel::replying([
            r#"{"atsScore": 77, "suggestions": ["Lead with impact"]}"#,
        ]));
        let request = AnalysisRequest::resume_analysis("Resume body").unwrap();
        let result = pipeline_with(&model).execute(&request).await.unwrap();

        assert_eq!(
            result,
            StructuredResult::ResumeAnalysis(ResumeAnalysis {
                ats_score: 77,
                suggestions: vec!["Lead with impact".to_string()],
            })
        );
    }
}
