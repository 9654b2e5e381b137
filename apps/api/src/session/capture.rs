//! Answer capture.
//!
//! Where answers come from is abstracted behind `SpeechCapture`: a device that,
//! once started, emits a stream of partial and final transcription events until
//! it is stopped or runs dry. The session only ever sees final text.

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::session::machine::{InterviewSession, SessionError};

const EVENT_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Interim hypothesis; may still change.
    Partial(String),
    /// Settled text for a stretch of speech.
    Final(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture is already running")]
    AlreadyStarted,

    #[error("capture device failed: {0}")]
    Device(String),
}

#[async_trait]
pub trait SpeechCapture: Send {
    /// Begins capturing. The receiver closes when the device has nothing more to say.
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError>;

    async fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Runs one capture and records the result against the current question.
///
/// Final fragments accumulate, space-separated, and every accumulation
/// overwrites the current answer, so the stored answer is always the full
/// text heard so far. Returns that text, or `None` if nothing final arrived.
///
/// The device is stopped before returning, on success and on error alike.
pub async fn record_answer(
    session: &mut InterviewSession,
    capture: &mut dyn SpeechCapture,
) -> Result<Option<String>, RecordError> {
    let mut events = capture.start().await?;
    let outcome = collect_answer(session, &mut events).await;

    // closing the receiver lets a device that is still producing wind down
    drop(events);
    let stopped = capture.stop().await;

    let heard = outcome?;
    stopped?;
    Ok(heard)
}

async fn collect_answer(
    session: &mut InterviewSession,
    events: &mut mpsc::Receiver<CaptureEvent>,
) -> Result<Option<String>, SessionError> {
    let mut heard = String::new();

    while let Some(event) = events.recv().await {
        match event {
            CaptureEvent::Partial(text) => debug!(len = text.len(), "partial transcript"),
            CaptureEvent::Final(text) => {
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }
                if !heard.is_empty() {
                    heard.push(' ');
                }
                heard.push_str(text);
                session.capture_answer(&heard)?;
            }
        }
    }

    Ok((!heard.is_empty()).then_some(heard))
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Treats each line of a text stream as one final transcription event.
/// A blank line (or end of input) ends the capture.
///
/// The reader moves into a background task while capturing and comes back on
/// `stop()`, so the same stream can serve several answers in a row.
pub struct LineCapture<R> {
    lines: Option<Lines<R>>,
    task: Option<JoinHandle<(Lines<R>, bool)>>,
    exhausted: bool,
}

impl<R> LineCapture<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(lines: Lines<R>) -> Self {
        Self {
            lines: Some(lines),
            task: None,
            exhausted: false,
        }
    }

    /// True once the underlying stream has hit end of input (or a read error).
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Hands the reader back, e.g. to read something other than an answer.
    /// `None` while a capture is running.
    pub fn lines_mut(&mut self) -> Option<&mut Lines<R>> {
        self.lines.as_mut()
    }
}

#[async_trait]
impl<R> SpeechCapture for LineCapture<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn start(&mut self) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError> {
        let mut lines = self.lines.take().ok_or(CaptureError::AlreadyStarted)?;
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        self.task = Some(tokio::spawn(async move {
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => return (lines, true),
                    Err(e) => {
                        warn!(error = %e, "reading answer input failed; treating it as end of input");
                        return (lines, true);
                    }
                };
                let line = line.trim();
                if line.is_empty() {
                    return (lines, false);
                }
                if tx.send(CaptureEvent::Final(line.to_string())).await.is_err() {
                    return (lines, false);
                }
            }
        }));

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(task) = self.task.take() {
            let (lines, exhausted) = task
                .await
                .map_err(|e| CaptureError::Device(e.to_string()))?;
            self.lines = Some(lines);
            self.exhausted = exhausted;
        }
        Ok(())
    }
}
