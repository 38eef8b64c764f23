use std::{sync::Arc, time::Duration};

use shared::domain::SelectionSource;
use tokio::sync::{broadcast, Mutex};

pub mod conversation;
pub mod error;
pub mod ingestion;
pub mod session;
pub mod transcript;
pub mod transport;
pub mod types;

pub use conversation::{ConversationController, MessageInput};
pub use error::{TransportError, ValidationError};
pub use ingestion::IngestionController;
pub use session::Session;
pub use transcript::{Transcript, TranscriptEntry, TranscriptEvent, TranscriptSink};
pub use transport::{DocumentBackend, HttpBackend, MissingDocumentBackend};
pub use types::{CandidateFile, TurnOutcome, UploadOutcome, UploadStatus};

/// Owns one session and wires both controllers to the same backend and
/// transcript.
pub struct PdfChatClient {
    session: Arc<Mutex<Session>>,
    transcript: Arc<Transcript>,
    ingestion: IngestionController,
    conversation: ConversationController,
}

impl PdfChatClient {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Arc<Self> {
        Self::new_with_transcript(backend, Arc::new(Transcript::new()))
    }

    pub fn new_with_transcript(
        backend: Arc<dyn DocumentBackend>,
        transcript: Arc<Transcript>,
    ) -> Arc<Self> {
        let session = Arc::new(Mutex::new(Session::new()));
        let sink: Arc<dyn TranscriptSink> = transcript.clone();
        Arc::new(Self {
            ingestion: IngestionController::new(backend.clone(), sink.clone(), session.clone()),
            conversation: ConversationController::new(backend, sink, session.clone()),
            session,
            transcript,
        })
    }

    pub fn connect(server_url: &str, timeout: Duration) -> Result<Arc<Self>, TransportError> {
        let backend = HttpBackend::new(server_url, timeout)?;
        tracing::info!(server_url = %backend.base_url(), "document backend configured");
        Ok(Self::new(Arc::new(backend)))
    }

    pub async fn select_files(
        &self,
        source: SelectionSource,
        files: Vec<CandidateFile>,
    ) -> UploadOutcome {
        self.ingestion.handle_selection(source, files).await
    }

    pub async fn ask(&self, text: &str) -> TurnOutcome {
        self.conversation.submit(text).await
    }

    pub async fn submit_input(&self, input: &mut MessageInput) -> TurnOutcome {
        self.conversation.submit_input(input).await
    }

    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn document_ready(&self) -> bool {
        self.session.lock().await.document_ready
    }

    pub fn transcript(&self) -> &Arc<Transcript> {
        &self.transcript
    }

    pub fn subscribe_transcript(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.transcript.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
