//! Turns a free-text model completion into a validated payload.
//!
//! Steps, in order:
//! 1. Locate the first `{` and scan forward counting brace depth until it
//!    returns to zero. Quotes and escapes are tracked so braces inside JSON
//!    strings do not count.
//! 2. Refuse the text if another `{` follows the payload. Guessing which of
//!    two payloads the model meant is not our job.
//! 3. Parse the span as JSON.
//! 4. Check the field set is exactly what the payload type declares, then
//!    deserialize (type checks) and run the type's own semantic checks.
//!
//! Every failure is either `NoStructuredPayload` or `MalformedPayload`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::{InterviewAnalysis, QuestionSet, ResumeAnalysis, StructuredResult};
use crate::analysis::request::AnalysisKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("model response contained no structured payload")]
    NoStructuredPayload,

    #[error("malformed structured payload: {0}")]
    MalformedPayload(String),
}

impl ExtractError {
    fn malformed(reason: impl Into<String>) -> Self {
        ExtractError::MalformedPayload(reason.into())
    }
}

/// A payload shape the extractor can validate.
pub trait StructuredPayload: DeserializeOwned {
    const KIND: AnalysisKind;
    /// Every top-level field, all required. Anything else is rejected.
    const FIELDS: &'static [&'static str];

    /// Semantic checks that the type system cannot express.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Extracts and validates a payload of type `T` from raw completion text.
pub fn extract<T: StructuredPayload>(raw: &str) -> Result<T, ExtractError> {
    let span = locate_payload(raw)?;

    let value: Value = serde_json::from_str(span)
        .map_err(|e| ExtractError::malformed(format!("invalid JSON: {e}")))?;

    let object = match &value {
        Value::Object(object) => object,
        other => {
            return Err(ExtractError::malformed(format!(
                "expected a JSON object, found {}",
                json_type_name(other)
            )))
        }
    };
    check_fields(object, T::FIELDS)?;

    let payload: T =
        serde_json::from_value(value).map_err(|e| ExtractError::malformed(e.to_string()))?;
    payload.validate().map_err(ExtractError::MalformedPayload)?;

    Ok(payload)
}

/// Kind-tagged variant of [`extract`], for callers that dispatch at runtime.
pub fn extract_result(raw: &str, kind: AnalysisKind) -> Result<StructuredResult, ExtractError> {
    Ok(match kind {
        AnalysisKind::QuestionGeneration => StructuredResult::QuestionSet(extract::<QuestionSet>(raw)?),
        AnalysisKind::ResumeAnalysis => {
            StructuredResult::ResumeAnalysis(extract::<ResumeAnalysis>(raw)?)
        }
        AnalysisKind::InterviewAnalysis => {
            StructuredResult::InterviewAnalysis(extract::<InterviewAnalysis>(raw)?)
        }
    })
}

/// Returns the first balanced `{...}` span of `text`.
pub fn locate_payload(text: &str) -> Result<&str, ExtractError> {
    let start = text.find('{').ok_or(ExtractError::NoStructuredPayload)?;
    let len = balanced_len(&text[start..])
        .ok_or_else(|| ExtractError::malformed("structured payload is never closed"))?;

    let end = start + len;
    if text[end..].contains('{') {
        return Err(ExtractError::malformed(
            "response contains more than one structured payload",
        ));
    }

    Ok(&text[start..end])
}

/// Byte length of the balanced object at the start of `s` (which begins with `{`).
fn balanced_len(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn check_fields(object: &Map<String, Value>, required: &[&str]) -> Result<(), ExtractError> {
    if let Some(missing) = required.iter().find(|f| !object.contains_key(**f)) {
        return Err(ExtractError::malformed(format!("missing field `{missing}`")));
    }
    if let Some(extra) = object.keys().find(|k| !required.contains(&k.as_str())) {
        return Err(ExtractError::malformed(format!("unexpected field `{extra}`")));
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
