use shared::domain::{TurnId, UploadId};

use crate::types::UploadStatus;

/// Per-client session state. Ingestion writes the document fields and the
/// status slot; conversation writes the exchange fields.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub document_ready: bool,
    pub document_name: Option<String>,
    pub upload_status: UploadStatus,
    pub latest_upload: Option<UploadId>,
    pub pending_exchange: bool,
    next_upload: u64,
    next_turn: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn begin_upload(&mut self) -> UploadId {
        self.next_upload += 1;
        let upload_id = UploadId(self.next_upload);
        self.latest_upload = Some(upload_id);
        upload_id
    }

    pub(crate) fn is_latest_upload(&self, upload_id: UploadId) -> bool {
        self.latest_upload == Some(upload_id)
    }

    pub(crate) fn next_turn(&mut self) -> TurnId {
        self.next_turn += 1;
        TurnId(self.next_turn)
    }
}
