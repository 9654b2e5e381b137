//! Prompt templates for the three analysis calls, and the builder that fills them.
//! Each template ends with the literal JSON shape the extractor will enforce.

use crate::analysis::request::{AnalysisKind, AnalysisRequest};

/// How many questions a generated interview contains.
pub const QUESTION_COUNT: usize = 5;

/// Question generation. Replace `{role}` and `{question_count}`.
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate {question_count} interview questions for a {role} position.
Mix behavioral, technical, and situational questions.

Please respond in this exact JSON format:
{
  "questions": [
    "question 1",
    "question 2",
    ...
  ]
}

OUTPUT RULES:
- "questions" is an array of strings with at least one entry
- Do NOT add any other fields"#;

/// Resume analysis. Replace `{resume_text}`.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Analyze this resume and provide:
1. ATS Score (0-100)
2. Improvement suggestions (5-7 bullet points)

Resume Text:
{resume_text}

Please respond in this exact JSON format:
{
  "atsScore": number,
  "suggestions": [
    "suggestion 1",
    "suggestion 2",
    ...
  ]
}

OUTPUT RULES:
- "atsScore" is a whole number between 0 and 100, not a string
- "suggestions" is an array of strings
- Do NOT add any other fields"#;

/// Interview transcript analysis. Replace `{transcript}`.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Analyze this mock interview transcript and provide detailed feedback:

Transcript:
{transcript}

Please respond in this exact JSON format:
{
  "summary": "Brief performance summary",
  "strengths": [
    "strength 1",
    "strength 2",
    ...
  ],
  "weaknesses": [
    "weakness 1",
    "weakness 2",
    ...
  ],
  "improvements": [
    "improvement 1",
    "improvement 2",
    ...
  ],
  "resources": [
    "resource 1",
    "resource 2",
    ...
  ]
}

OUTPUT RULES:
- "summary" is a string; every other field is an array of strings
- Do NOT add any other fields"#;

/// Renders the prompt for a validated request. Pure and deterministic.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    match request.kind() {
        AnalysisKind::QuestionGeneration => QUESTION_PROMPT_TEMPLATE
            .replace("{question_count}", &QUESTION_COUNT.to_string())
            .replace("{role}", request.input()),
        AnalysisKind::ResumeAnalysis => {
            RESUME_PROMPT_TEMPLATE.replace("{resume_text}", request.input())
        }
        AnalysisKind::InterviewAnalysis => {
            INTERVIEW_PROMPT_TEMPLATE.replace("{transcript}", request.input())
        }
    }
}
