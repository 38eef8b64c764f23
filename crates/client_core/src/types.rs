use std::{fmt, path::Path};

use shared::domain::{TurnId, UploadId, MAX_UPLOAD_BYTES, PDF_MIME_TYPE};

use crate::error::ValidationError;

/// A file picked or dropped by the user, held until its upload resolves.
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub contents: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes: contents.len() as u64,
            contents,
        }
    }

    /// Overrides the size reported by the selection source.
    pub fn with_reported_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }

    /// Reads a local file, guessing its MIME type from the extension the way
    /// a browser file picker would. Files over the upload limit are never
    /// read; only their size is kept so validation can reject them.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let size_bytes = tokio::fs::metadata(path).await?.len();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        if size_bytes > MAX_UPLOAD_BYTES {
            return Ok(Self::new(name, mime_type, Vec::new()).with_reported_size(size_bytes));
        }
        let contents = tokio::fs::read(path).await?;
        Ok(Self::new(name, mime_type, contents))
    }
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

/// The single upload status slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading {
        file_name: String,
    },
    Succeeded {
        file_name: String,
    },
    Invalid(ValidationError),
    Rejected {
        message: String,
    },
    NetworkError,
}

impl UploadStatus {
    pub fn display_text(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Uploading { file_name } => format!("Uploading \"{file_name}\"..."),
            Self::Succeeded { file_name } => format!("✅ {file_name} processed."),
            Self::Invalid(reason) => reason.user_message().to_string(),
            Self::Rejected { message } => format!("❌ {message}"),
            Self::NetworkError => "⚠️ Network error during upload.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded {
        upload_id: UploadId,
        message: String,
    },
    Rejected {
        upload_id: UploadId,
        message: String,
    },
    NetworkError {
        upload_id: UploadId,
    },
    /// A newer selection started before this upload resolved; its result was
    /// discarded.
    Superseded {
        upload_id: UploadId,
    },
    Invalid(ValidationError),
    /// The selection event carried no file.
    NoFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input, nothing happened.
    Ignored,
    /// No document ingested yet; the backend was not contacted.
    Gated,
    Answered { turn_id: TurnId, answer: String },
    /// The backend replied without a usable answer.
    EmptyAnswer { turn_id: TurnId },
    Failed { turn_id: TurnId },
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
