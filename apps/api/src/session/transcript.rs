use std::collections::BTreeMap;

/// Stands in for an answer that was never recorded.
pub const MISSING_ANSWER: &str = "No response";

/// Renders the question/answer exchange in question order:
///
/// ```text
/// Q1: <question>
/// A1: <answer>
///
/// Q2: <question>
/// A2: <answer>
/// ```
pub fn assemble_transcript(questions: &[String], answers: &BTreeMap<usize, String>) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let number = index + 1;
            let answer = answers
                .get(&index)
                .map(String::as_str)
                .unwrap_or(MISSING_ANSWER);
            format!("Q{number}: {question}\nA{number}: {answer}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
