// Structured-response pipeline: request validation, prompt templates,
// model invocation, and payload extraction for the three analysis calls.
// All model calls go through llm_client::ModelInvoker.

pub mod extractor;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod request;

pub use extractor::ExtractError;
pub use models::{InterviewAnalysis, QuestionSet, ResumeAnalysis, StructuredResult};
pub use pipeline::{Pipeline, PipelineError};
pub use request::{AnalysisKind, AnalysisRequest, RequestError};
