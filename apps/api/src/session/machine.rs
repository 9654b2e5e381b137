//! Interview session state machine.
//!
//! ```text
//! CollectingDetails --begin--> InProgress --advance (last answered)--> Completed
//!                                 |  ^
//!                                 +--+ capture_answer / advance (not last)
//! ```
//!
//! A session is owned by exactly one flow and mutated through `&mut self`.
//! `Completed` is terminal; start a new session for another attempt.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::analysis::QuestionSet;
use crate::session::transcript::assemble_transcript;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CollectingDetails,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter your target role")]
    MissingRole,

    #[error("cannot {action} while the session is {step:?}")]
    WrongStep { action: &'static str, step: Step },

    #[error("no questions to ask")]
    NoQuestions,

    #[error("answer is empty")]
    EmptyAnswer,

    #[error("question {number} has no recorded answer yet")]
    MissingAnswer { number: usize },
}

/// Who is being interviewed and for what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetails {
    pub name: Option<String>,
    pub role: String,
}

impl CandidateDetails {
    /// Trims both fields; a blank name becomes `None`, a blank role is rejected.
    pub fn new(name: Option<&str>, role: &str) -> Result<Self, SessionError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(SessionError::MissingRole);
        }
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(Self {
            name,
            role: role.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: Uuid,
    step: Step,
    details: Option<CandidateDetails>,
    questions: Vec<String>,
    current_index: usize,
    answers: BTreeMap<usize, String>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            step: Step::CollectingDetails,
            details: None,
            questions: Vec::new(),
            current_index: 0,
            answers: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn details(&self) -> Option<&CandidateDetails> {
        self.details.as_ref()
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question being asked, while the interview is running.
    pub fn current_question(&self) -> Option<&str> {
        match self.step {
            Step::InProgress => self.questions.get(self.current_index).map(String::as_str),
            _ => None,
        }
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.answers.get(&self.current_index).map(String::as_str)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// `(1-based position, total)` of the current question.
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index + 1, self.questions.len())
    }

    pub(crate) fn ensure_step(&self, expected: Step, action: &'static str) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStep {
                action,
                step: self.step,
            })
        }
    }

    /// CollectingDetails → InProgress. On error nothing changes.
    pub fn begin(
        &mut self,
        details: CandidateDetails,
        question_set: QuestionSet,
    ) -> Result<(), SessionError> {
        self.ensure_step(Step::CollectingDetails, "begin the interview")?;
        if question_set.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        self.details = Some(details);
        self.questions = question_set.questions;
        self.current_index = 0;
        self.answers.clear();
        self.step = Step::InProgress;
        Ok(())
    }

    /// Records the answer for the current question. Later captures overwrite
    /// earlier ones; nothing advances.
    pub fn capture_answer(&mut self, text: &str) -> Result<(), SessionError> {
        self.ensure_step(Step::InProgress, "capture an answer")?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.answers.insert(self.current_index, text.to_string());
        Ok(())
    }

    /// Moves past the current question, completing the session after the last one.
    /// Refused, with the index untouched, until the current question has an answer.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        self.ensure_step(Step::InProgress, "advance")?;
        if !self.answers.contains_key(&self.current_index) {
            return Err(SessionError::MissingAnswer {
                number: self.current_index + 1,
            });
        }

        if self.is_last_question() {
            self.step = Step::Completed;
        } else {
            self.current_index += 1;
        }
        Ok(self.step)
    }

    /// The assembled Q/A transcript of a completed session.
    pub fn transcript(&self) -> Result<String, SessionError> {
        self.ensure_step(Step::Completed, "build the transcript")?;
        Ok(assemble_transcript(&self.questions, &self.answers))
    }
}
