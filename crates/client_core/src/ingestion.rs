//! File selection, validation and the upload exchange.

use std::sync::Arc;

use shared::domain::{Author, EntryKind, SelectionSource, MAX_UPLOAD_BYTES};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::ValidationError,
    session::Session,
    transcript::TranscriptSink,
    transport::DocumentBackend,
    types::{CandidateFile, UploadOutcome, UploadStatus},
};

pub const PROCESSING_NOTICE: &str =
    "Please wait while I process your PDF. This might take a moment.";
pub const UPLOAD_NETWORK_ERROR: &str =
    "There was a network error uploading the PDF. Please check your connection and try again.";
/// Shown when the backend accepts a file without a confirmation message.
pub const DEFAULT_UPLOAD_CONFIRMATION: &str = "PDF processed. You can now ask questions about it.";

pub struct IngestionController {
    backend: Arc<dyn DocumentBackend>,
    transcript: Arc<dyn TranscriptSink>,
    session: Arc<Mutex<Session>>,
}

impl IngestionController {
    pub fn new(
        backend: Arc<dyn DocumentBackend>,
        transcript: Arc<dyn TranscriptSink>,
        session: Arc<Mutex<Session>>,
    ) -> Self {
        Self {
            backend,
            transcript,
            session,
        }
    }

    /// Picks the first file of a selection event. Extra files are ignored.
    pub fn select_file(
        source: SelectionSource,
        files: Vec<CandidateFile>,
    ) -> Option<CandidateFile> {
        let total = files.len();
        let file = files.into_iter().next()?;
        if total > 1 {
            debug!(
                ?source,
                ignored = total - 1,
                file_name = %file.name,
                "selection carried several files; using the first"
            );
        }
        Some(file)
    }

    pub fn validate(file: &CandidateFile) -> Result<(), ValidationError> {
        if !file.is_pdf() {
            return Err(ValidationError::NotAPdf {
                file_name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
        if file.size_bytes > MAX_UPLOAD_BYTES {
            return Err(ValidationError::too_large(&file.name, file.size_bytes));
        }
        Ok(())
    }

    /// Runs a whole selection event: select, validate, then upload.
    pub async fn handle_selection(
        &self,
        source: SelectionSource,
        files: Vec<CandidateFile>,
    ) -> UploadOutcome {
        let Some(file) = Self::select_file(source, files) else {
            return UploadOutcome::NoFile;
        };
        if let Err(err) = Self::validate(&file) {
            return self.reject_invalid(err).await;
        }
        self.upload(file).await
    }

    /// Surfaces a local validation failure in the status slot. Only a new
    /// upload attempt supersedes one in flight, so an earlier upload still
    /// settles readiness when it resolves.
    pub async fn reject_invalid(&self, err: ValidationError) -> UploadOutcome {
        self.session.lock().await.upload_status = UploadStatus::Invalid(err.clone());
        info!(reason = err.reason(), "rejected candidate file: {err}");
        self.transcript
            .append(Author::Bot, EntryKind::Status, err.user_message())
            .await;
        UploadOutcome::Invalid(err)
    }

    pub async fn upload(&self, file: CandidateFile) -> UploadOutcome {
        let upload_id = {
            let mut session = self.session.lock().await;
            let upload_id = session.begin_upload();
            session.upload_status = UploadStatus::Uploading {
                file_name: file.name.clone(),
            };
            upload_id
        };
        info!(
            %upload_id,
            file_name = %file.name,
            size_bytes = file.size_bytes,
            "uploading pdf"
        );
        self.transcript
            .append(Author::Bot, EntryKind::Status, PROCESSING_NOTICE)
            .await;

        let result = self.backend.upload_pdf(&file).await;

        let mut session = self.session.lock().await;
        if !session.is_latest_upload(upload_id) {
            info!(%upload_id, file_name = %file.name, "discarding superseded upload result");
            return UploadOutcome::Superseded { upload_id };
        }

        match result.map(|response| response.into_outcome()) {
            Ok(Ok(message)) => {
                session.document_ready = true;
                session.document_name = Some(file.name.clone());
                session.upload_status = UploadStatus::Succeeded {
                    file_name: file.name.clone(),
                };
                drop(session);

                let message = message.unwrap_or_else(|| DEFAULT_UPLOAD_CONFIRMATION.to_string());
                info!(%upload_id, file_name = %file.name, "pdf ingested");
                self.transcript
                    .append(Author::Bot, EntryKind::Message, &message)
                    .await;
                UploadOutcome::Uploaded { upload_id, message }
            }
            Ok(Err(rejection)) => {
                session.document_ready = false;
                session.document_name = None;
                session.upload_status = UploadStatus::Rejected {
                    message: rejection.message.clone(),
                };
                drop(session);

                warn!(%upload_id, file_name = %file.name, "backend rejected pdf: {rejection}");
                self.transcript
                    .append(
                        Author::Bot,
                        EntryKind::Message,
                        &format!("Error processing PDF: {}", rejection.message),
                    )
                    .await;
                UploadOutcome::Rejected {
                    upload_id,
                    message: rejection.message,
                }
            }
            Err(err) => {
                session.document_ready = false;
                session.document_name = None;
                session.upload_status = UploadStatus::NetworkError;
                drop(session);

                warn!(
                    %upload_id,
                    file_name = %file.name,
                    timeout = err.is_timeout(),
                    "error uploading file: {err}"
                );
                self.transcript
                    .append(Author::Bot, EntryKind::Message, UPLOAD_NETWORK_ERROR)
                    .await;
                UploadOutcome::NetworkError { upload_id }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/ingestion_tests.rs"]
mod tests;
