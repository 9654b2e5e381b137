use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::analysis::extractor::StructuredPayload;
use crate::analysis::request::AnalysisKind;

/// Interview questions generated for a target role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub questions: Vec<String>,
}

/// ATS compatibility score plus improvement suggestions for a resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    #[serde(deserialize_with = "deserialize_ats_score")]
    pub ats_score: u8,
    pub suggestions: Vec<String>,
}

/// Holistic feedback on a completed mock interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAnalysis {
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
    pub resources: Vec<String>,
}

/// Any one of the validated payload shapes, tagged by what was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StructuredResult {
    QuestionSet(QuestionSet),
    ResumeAnalysis(ResumeAnalysis),
    InterviewAnalysis(InterviewAnalysis),
}

impl StructuredResult {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            StructuredResult::QuestionSet(_) => AnalysisKind::QuestionGeneration,
            StructuredResult::ResumeAnalysis(_) => AnalysisKind::ResumeAnalysis,
            StructuredResult::InterviewAnalysis(_) => AnalysisKind::InterviewAnalysis,
        }
    }
}

impl StructuredPayload for QuestionSet {
    const KIND: AnalysisKind = AnalysisKind::QuestionGeneration;
    const FIELDS: &'static [&'static str] = &["questions"];

    fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("`questions` must contain at least one question".to_string());
        }
        if let Some(i) = self.questions.iter().position(|q| q.trim().is_empty()) {
            return Err(format!("`questions[{i}]` is blank"));
        }
        Ok(())
    }
}

impl StructuredPayload for ResumeAnalysis {
    const KIND: AnalysisKind = AnalysisKind::ResumeAnalysis;
    const FIELDS: &'static [&'static str] = &["atsScore", "suggestions"];
}

impl StructuredPayload for InterviewAnalysis {
    const KIND: AnalysisKind = AnalysisKind::InterviewAnalysis;
    const FIELDS: &'static [&'static str] = &[
        "summary",
        "strengths",
        "weaknesses",
        "improvements",
        "resources",
    ];
}

/// Accepts a JSON number that is exactly an integer in 0..=100.
/// `85` and `85.0` pass; `"85"`, `85.5`, `-1` and `101` do not.
fn deserialize_ats_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let score = number.as_f64().unwrap_or(f64::NAN);
    if score.fract() != 0.0 || !(0.0..=100.0).contains(&score) {
        return Err(D::Error::custom(format!(
            "atsScore must be an integer between 0 and 100, got {number}"
        )));
    }
    Ok(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_analysis_serializes_camel_case() {
        let analysis = ResumeAnalysis {
            ats_score: 72,
            suggestions: vec!["Quantify impact".to_string()],
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["atsScore"], 72);
        assert_eq!(json["suggestions"][0], "Quantify impact");
    }

    #[test]
    fn test_ats_score_accepts_integral_float() {
        let parsed: ResumeAnalysis =
            serde_json::from_str(r#"{"atsScore": 85.0, "suggestions": []}"#).unwrap();
        assert_eq!(parsed.ats_score, 85);
    }

    #[test]
    fn test_ats_score_bounds() {
        for ok in ["0", "100"] {
            let json = format!(r#"{{"atsScore": {ok}, "suggestions": []}}"#);
            assert!(serde_json::from_str::<ResumeAnalysis>(&json).is_ok(), "{ok}");
        }
        for bad in ["-1", "101", "72.5", "\"72\"", "null"] {
            let json = format!(r#"{{"atsScore": {bad}, "suggestions": []}}"#);
            assert!(serde_json::from_str::<ResumeAnalysis>(&json).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_question_set_validation() {
        let empty = QuestionSet { questions: vec![] };
        assert!(empty.validate().is_err());

        let blank = QuestionSet {
            questions: vec!["Why us?".to_string(), "  ".to_string()],
        };
        assert_eq!(blank.validate().unwrap_err(), "`questions[1]` is blank");

        let good = QuestionSet {
            questions: vec!["Why us?".to_string()],
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_structured_result_serializes_without_tag() {
        let result = StructuredResult::QuestionSet(QuestionSet {
            questions: vec!["Q".to_string()],
        });
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"questions":["Q"]}"#
        );
        assert_eq!(result.kind(), AnalysisKind::QuestionGeneration);
    }
}
