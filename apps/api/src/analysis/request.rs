use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which of the three model calls a request (and its expected payload) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    QuestionGeneration,
    ResumeAnalysis,
    InterviewAnalysis,
}

impl AnalysisKind {
    /// Name of the caller-supplied input, as it appears in error messages.
    pub fn input_field(self) -> &'static str {
        match self {
            AnalysisKind::QuestionGeneration => "role",
            AnalysisKind::ResumeAnalysis => "resume text",
            AnalysisKind::InterviewAnalysis => "transcript",
        }
    }

    /// Verb phrase used in "Failed to ..." messages.
    pub fn action(self) -> &'static str {
        match self {
            AnalysisKind::QuestionGeneration => "generate questions",
            AnalysisKind::ResumeAnalysis => "analyze resume",
            AnalysisKind::InterviewAnalysis => "analyze interview",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisKind::QuestionGeneration => "question_generation",
            AnalysisKind::ResumeAnalysis => "resume_analysis",
            AnalysisKind::InterviewAnalysis => "interview_analysis",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{field} is required")]
    EmptyInput { field: &'static str },
}

/// A validated request for one model call.
///
/// Fields are private: the only way to get one is through a constructor,
/// which guarantees the input is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    kind: AnalysisKind,
    input: String,
}

impl AnalysisRequest {
    pub fn new(kind: AnalysisKind, input: &str) -> Result<Self, RequestError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(RequestError::EmptyInput {
                field: kind.input_field(),
            });
        }
        Ok(Self {
            kind,
            input: input.to_string(),
        })
    }

    pub fn question_generation(role: &str) -> Result<Self, RequestError> {
        Self::new(AnalysisKind::QuestionGeneration, role)
    }

    pub fn resume_analysis(resume_text: &str) -> Result<Self, RequestError> {
        Self::new(AnalysisKind::ResumeAnalysis, resume_text)
    }

    pub fn interview_analysis(transcript: &str) -> Result<Self, RequestError> {
        Self::new(AnalysisKind::InterviewAnalysis, transcript)
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}
