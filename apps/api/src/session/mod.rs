// One interview attempt: details → questions → answers → analysis.

pub mod capture;
pub mod flow;
pub mod machine;
pub mod transcript;

pub use capture::{record_answer, CaptureError, CaptureEvent, LineCapture, RecordError, SpeechCapture};
pub use flow::{FlowError, InterviewFlow};
pub use machine::{CandidateDetails, InterviewSession, SessionError, Step};
pub use transcript::{assemble_transcript, MISSING_ANSWER};
