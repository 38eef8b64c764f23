use shared::domain::MAX_UPLOAD_BYTES;
use thiserror::Error;

/// Local checks that reject a candidate file before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("not a PDF: '{file_name}' has type '{mime_type}'")]
    NotAPdf {
        file_name: String,
        mime_type: String,
    },
    #[error("'{file_name}' is {size_bytes} bytes, above the {limit} byte limit")]
    TooLarge {
        file_name: String,
        size_bytes: u64,
        limit: u64,
    },
}

impl ValidationError {
    pub fn too_large(file_name: impl Into<String>, size_bytes: u64) -> Self {
        Self::TooLarge {
            file_name: file_name.into(),
            size_bytes,
            limit: MAX_UPLOAD_BYTES,
        }
    }

    /// Short machine-friendly reason, as shown in logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAPdf { .. } => "not-a-pdf",
            Self::TooLarge { .. } => "too-large",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotAPdf { .. } => "❌ Please upload a PDF file.",
            Self::TooLarge { .. } => {
                "❌ File size exceeds 10MB limit. Please upload a smaller PDF."
            }
        }
    }
}

/// Failures below the JSON contract: the request never produced a decodable
/// reply.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend replied with HTTP {status} and a non-JSON body: {source}")]
    Decode {
        status: u16,
        source: serde_json::Error,
    },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(err) if err.is_timeout())
    }
}
