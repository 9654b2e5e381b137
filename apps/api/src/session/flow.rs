use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};

use crate::analysis::{Pipeline, PipelineError};
use crate::results::{save_results, ResultsStore, SessionResults, StoreError};
use crate::session::machine::{CandidateDetails, InterviewSession, SessionError, Step};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("question generation failed: {0}")]
    QuestionGeneration(#[source] PipelineError),

    #[error("interview analysis failed: {0}")]
    Analysis(#[source] PipelineError),

    #[error("could not store results: {0}")]
    Store(#[from] StoreError),
}

impl FlowError {
    /// What to show the candidate. Collaborator detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Session(e) => e.to_string(),
            FlowError::QuestionGeneration(_) => {
                "Failed to generate questions. Please try again.".to_string()
            }
            FlowError::Analysis(_) => "Failed to analyze interview. Please try again.".to_string(),
            FlowError::Store(_) => "Your results could not be saved. Please try again.".to_string(),
        }
    }
}

/// Drives one session against the pipeline and the results store.
#[derive(Clone)]
pub struct InterviewFlow {
    pipeline: Pipeline,
    results: Arc<dyn ResultsStore>,
}

impl InterviewFlow {
    pub fn new(pipeline: Pipeline, results: Arc<dyn ResultsStore>) -> Self {
        Self { pipeline, results }
    }

    /// Validates the candidate's details, fetches questions and opens the
    /// interview. If question generation fails the session is left collecting
    /// details, so the candidate can simply try again.
    pub async fn start(
        &self,
        session: &mut InterviewSession,
        name: Option<&str>,
        role: &str,
    ) -> Result<(), FlowError> {
        session.ensure_step(Step::CollectingDetails, "begin the interview")?;
        let details = CandidateDetails::new(name, role)?;

        let questions = self
            .pipeline
            .generate_questions(&details.role)
            .await
            .map_err(|e| {
                error!(session = %session.id(), error = %e, "question generation failed");
                FlowError::QuestionGeneration(e)
            })?;

        info!(
            session = %session.id(),
            role = %details.role,
            count = questions.questions.len(),
            "interview started"
        );
        session.begin(details, questions)?;
        Ok(())
    }

    /// Analyzes a completed session and stores the outcome.
    ///
    /// Takes the session by reference: a failed analysis can be retried
    /// without replaying the interview.
    pub async fn finish(&self, session: &InterviewSession) -> Result<SessionResults, FlowError> {
        let transcript = session.transcript()?;
        let details = session
            .details()
            .cloned()
            .ok_or(SessionError::WrongStep {
                action: "finish the interview",
                step: session.step(),
            })?;

        let analysis = self
            .pipeline
            .analyze_interview(&transcript)
            .await
            .map_err(|e| {
                error!(session = %session.id(), error = %e, "interview analysis failed");
                FlowError::Analysis(e)
            })?;

        let results = SessionResults {
            analysis,
            candidate_name: details.name,
            role: details.role,
            completed_at: Utc::now(),
        };
        save_results(self.results.as_ref(), &results).await?;
        info!(session = %session.id(), "interview finished");
        Ok(results)
    }
}
