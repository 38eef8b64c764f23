//! In-memory backend with scripted replies for controller tests.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use shared::protocol::{ChatResponse, UploadResponse};
use tokio::sync::{oneshot, Mutex};

use crate::{
    error::TransportError, session::Session, transcript::Transcript, transport::DocumentBackend,
    types::CandidateFile,
};

pub(crate) enum Scripted<T> {
    Reply(T),
    Fail,
    /// Resolves once the test sends a reply; a dropped sender is a transport
    /// failure.
    Wait(oneshot::Receiver<T>),
}

#[derive(Default)]
struct ScriptState {
    uploads: VecDeque<Scripted<UploadResponse>>,
    chats: VecDeque<Scripted<ChatResponse>>,
    uploaded_names: Vec<String>,
    questions: Vec<String>,
}

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    state: Mutex<ScriptState>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn push_upload(&self, reply: Scripted<UploadResponse>) {
        self.state.lock().await.uploads.push_back(reply);
    }

    pub(crate) async fn push_chat(&self, reply: Scripted<ChatResponse>) {
        self.state.lock().await.chats.push_back(reply);
    }

    pub(crate) async fn uploaded_names(&self) -> Vec<String> {
        self.state.lock().await.uploaded_names.clone()
    }

    pub(crate) async fn questions(&self) -> Vec<String> {
        self.state.lock().await.questions.clone()
    }
}

async fn resolve<T>(reply: Option<Scripted<T>>) -> Result<T, TransportError> {
    match reply {
        Some(Scripted::Reply(value)) => Ok(value),
        Some(Scripted::Wait(rx)) => rx
            .await
            .map_err(|_| TransportError::Unavailable("scripted connection dropped".to_string())),
        Some(Scripted::Fail) => Err(TransportError::Unavailable(
            "scripted transport failure".to_string(),
        )),
        None => Err(TransportError::Unavailable(
            "no scripted reply left".to_string(),
        )),
    }
}

#[async_trait]
impl DocumentBackend for ScriptedBackend {
    async fn upload_pdf(&self, file: &CandidateFile) -> Result<UploadResponse, TransportError> {
        let reply = {
            let mut state = self.state.lock().await;
            state.uploaded_names.push(file.name.clone());
            state.uploads.pop_front()
        };
        resolve(reply).await
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse, TransportError> {
        let reply = {
            let mut state = self.state.lock().await;
            state.questions.push(message.to_string());
            state.chats.pop_front()
        };
        resolve(reply).await
    }
}

pub(crate) struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub transcript: Arc<Transcript>,
    pub session: Arc<Mutex<Session>>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            backend: ScriptedBackend::new(),
            transcript: Arc::new(Transcript::new()),
            session: Arc::new(Mutex::new(Session::new())),
        }
    }

    pub(crate) async fn mark_ready(&self) {
        self.session.lock().await.document_ready = true;
    }

    pub(crate) async fn texts(&self) -> Vec<String> {
        self.transcript
            .entries()
            .await
            .into_iter()
            .map(|entry| entry.text)
            .collect()
    }
}

pub(crate) fn pdf(name: &str, size_bytes: u64) -> CandidateFile {
    CandidateFile::new(name, "application/pdf", b"%PDF-1.7 test".to_vec())
        .with_reported_size(size_bytes)
}

const WAIT_ROUNDS: usize = 1000;

impl ScriptedBackend {
    pub(crate) async fn wait_for_uploads(&self, count: usize) {
        for _ in 0..WAIT_ROUNDS {
            if self.state.lock().await.uploaded_names.len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {count} uploads");
    }

    pub(crate) async fn wait_for_questions(&self, count: usize) {
        for _ in 0..WAIT_ROUNDS {
            if self.state.lock().await.questions.len() >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {count} questions");
    }
}

impl Harness {
    pub(crate) async fn wait_for_entries(&self, count: usize) {
        for _ in 0..WAIT_ROUNDS {
            if self.transcript.len().await >= count {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("timed out waiting for {count} transcript entries");
    }
}
