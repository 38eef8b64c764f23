//! JSON contract of the document-processing backend.

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::error::{ApiException, ErrorCode};

pub const UPLOAD_PDF_PATH: &str = "api/upload_pdf";
pub const CHAT_PATH: &str = "api/chat";
/// Multipart field carrying the PDF bytes.
pub const UPLOAD_FIELD_NAME: &str = "file";
pub const UPLOAD_STATUS_SUCCESS: &str = "success";

/// Reads a string field, mapping a missing, null or non-string value to
/// `None` so an oddly shaped reply stays a backend answer.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(text)) => Some(text),
        Some(Loose::Other(_)) | None => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Some(UPLOAD_STATUS_SUCCESS.to_string()),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(UPLOAD_STATUS_SUCCESS)
    }

    /// Splits the response into the accepted confirmation text (which the
    /// backend may omit) or a rejection carrying the backend's reason.
    pub fn into_outcome(self) -> Result<Option<String>, ApiException> {
        if self.is_success() {
            return Ok(self.message);
        }
        let message = self.message.unwrap_or_else(|| match self.status {
            Some(status) => format!("upload rejected with status '{status}'"),
            None => "upload rejected without a status".to_string(),
        });
        Err(ApiException::new(ErrorCode::Rejected, message))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChatResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub response: Option<String>,
}

impl ChatResponse {
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
        }
    }

    pub fn into_answer(self) -> Result<String, ApiException> {
        match self.response {
            Some(text) => Ok(text),
            None => Err(ApiException::new(
                ErrorCode::EmptyAnswer,
                "chat response carried no answer",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_success_without_message_is_accepted() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"status":"success","chunks":["a","b"]}"#).expect("parse");
        assert_eq!(parsed.into_outcome().expect("accepted"), None);
    }

    #[test]
    fn upload_rejection_keeps_backend_message() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"status":"error","message":"Only PDF files are supported."}"#)
                .expect("parse");
        let err = parsed.into_outcome().expect_err("rejected");
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Only PDF files are supported.");
    }

    #[test]
    fn upload_rejection_without_message_names_the_status() {
        let err = UploadResponse {
            status: Some("pending".to_string()),
            message: None,
        }
        .into_outcome()
        .expect_err("rejected");
        assert!(err.message.contains("pending"));
    }

    #[test]
    fn chat_response_without_answer_is_rejected() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"detail":"oops"}"#).expect("parse");
        let err = parsed.into_answer().expect_err("no answer");
        assert_eq!(err.code, ErrorCode::EmptyAnswer);
    }

    #[test]
    fn chat_request_serializes_message_field() {
        let body = serde_json::to_value(ChatRequest {
            message: "What is this about?".to_string(),
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({ "message": "What is this about?" }));
    }

    #[test]
    fn upload_reply_without_status_is_a_rejection() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"message":"Only PDF files are supported."}"#)
                .expect("parse");
        let err = parsed.into_outcome().expect_err("rejected");
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Only PDF files are supported.");
    }

    #[test]
    fn non_string_status_is_a_rejection() {
        let parsed: UploadResponse =
            serde_json::from_str(r#"{"status":true,"message":null}"#).expect("parse");
        assert_eq!(parsed.status, None);
        let err = parsed.into_outcome().expect_err("rejected");
        assert_eq!(err.message, "upload rejected without a status");
    }

    #[test]
    fn non_string_answer_counts_as_no_answer() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"response":42}"#).expect("parse");
        assert_eq!(parsed.response, None);
        let err = parsed.into_answer().expect_err("no answer");
        assert_eq!(err.code, ErrorCode::EmptyAnswer);
    }
}
