//! Question/answer turns, gated on an ingested document.

use std::sync::Arc;

use shared::domain::{Author, EntryKind};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    session::Session, transcript::TranscriptSink, transport::DocumentBackend, types::TurnOutcome,
};

pub const UPLOAD_FIRST_WARNING: &str =
    "⚠️ Please upload and process a PDF first before asking questions.";
pub const PENDING_MARKER_TEXT: &str = "PreciseBot is thinking...";
pub const CHAT_FAILURE: &str = "Sorry, I couldn't get a response. There might be an issue with the server or the PDF was not processed correctly.";
pub const EMPTY_ANSWER: &str = "The server returned no answer. Please try asking again.";

/// Text typed but not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageInput {
    buffer: String,
}

impl MessageInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Returns the trimmed text and clears the buffer. Blank input leaves
    /// the buffer untouched.
    pub fn take(&mut self) -> Option<String> {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.buffer.clear();
        Some(text)
    }
}

pub struct ConversationController {
    backend: Arc<dyn DocumentBackend>,
    transcript: Arc<dyn TranscriptSink>,
    session: Arc<Mutex<Session>>,
    // Single-slot queue: one exchange on the wire at a time.
    exchange: Mutex<()>,
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        transcript: Arc<dyn TranscriptSink>,
        session: Arc<Mutex<Session>>,
    ) -> Self {
        Self {
            backend,
            transcript,
            session,
            exchange: Mutex::new(()),
        }
    }

    pub async fn submit_input(&self, input: &mut MessageInput) -> TurnOutcome {
        match input.take() {
            Some(text) => self.submit(&text).await,
            None => TurnOutcome::Ignored,
        }
    }

    /// Echoes the question, then either warns (no document yet) or waits for
    /// any earlier exchange to finish and asks the backend.
    pub async fn submit(&self, text: &str) -> TurnOutcome {
        let text = text.trim();
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        self.transcript
            .append(Author::User, EntryKind::Message, text)
            .await;

        let turn_id = {
            let mut session = self.session.lock().await;
            if !session.document_ready {
                None
            } else {
                Some(session.next_turn())
            }
        };
        let Some(turn_id) = turn_id else {
            debug!("question submitted before any document was ingested");
            self.transcript
                .append(Author::Bot, EntryKind::Message, UPLOAD_FIRST_WARNING)
                .await;
            return TurnOutcome::Gated;
        };

        let _exchange = self.exchange.lock().await;
        self.session.lock().await.pending_exchange = true;
        let marker = self
            .transcript
            .append(Author::Bot, EntryKind::PendingMarker, PENDING_MARKER_TEXT)
            .await;
        info!(%turn_id, "sending question");

        let result = self.backend.chat(text).await;

        self.transcript.remove(marker).await;
        self.session.lock().await.pending_exchange = false;

        match result.map(|response| response.into_answer()) {
            Ok(Ok(answer)) => {
                info!(%turn_id, "answer received");
                self.transcript
                    .append(Author::Bot, EntryKind::Message, &answer)
                    .await;
                TurnOutcome::Answered { turn_id, answer }
            }
            Ok(Err(rejection)) => {
                warn!(%turn_id, "unusable chat response: {rejection}");
                self.transcript
                    .append(Author::Bot, EntryKind::Message, EMPTY_ANSWER)
                    .await;
                TurnOutcome::EmptyAnswer { turn_id }
            }
            Err(err) => {
                warn!(%turn_id, timeout = err.is_timeout(), "error sending message: {err}");
                self.transcript
                    .append(Author::Bot, EntryKind::Message, CHAT_FAILURE)
                    .await;
                TurnOutcome::Failed { turn_id }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/conversation_tests.rs"]
mod tests;
