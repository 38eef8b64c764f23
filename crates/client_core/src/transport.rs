//! HTTP exchange with the document-processing backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::protocol::{
    ChatRequest, ChatResponse, UploadResponse, CHAT_PATH, UPLOAD_FIELD_NAME, UPLOAD_PDF_PATH,
};
use url::Url;

use crate::{error::TransportError, types::CandidateFile};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[async_trait]
pub trait DocumentBackend: Send + Sync {
    async fn upload_pdf(&self, file: &CandidateFile) -> Result<UploadResponse, TransportError>;
    async fn chat(&self, message: &str) -> Result<ChatResponse, TransportError>;
}

pub struct MissingDocumentBackend;

#[async_trait]
impl DocumentBackend for MissingDocumentBackend {
    async fn upload_pdf(&self, _file: &CandidateFile) -> Result<UploadResponse, TransportError> {
        Err(TransportError::Unavailable(
            "no document backend configured".to_string(),
        ))
    }

    async fn chat(&self, _message: &str) -> Result<ChatResponse, TransportError> {
        Err(TransportError::Unavailable(
            "no document backend configured".to_string(),
        ))
    }
}

pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(path)?)
    }
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn upload_pdf(&self, file: &CandidateFile) -> Result<UploadResponse, TransportError> {
        let part = Part::bytes(file.contents.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);
        let res = self
            .http
            .post(self.endpoint(UPLOAD_PDF_PATH)?)
            .multipart(form)
            .send()
            .await?;
        decode_json(res).await
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse, TransportError> {
        let res = self
            .http
            .post(self.endpoint(CHAT_PATH)?)
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await?;
        decode_json(res).await
    }
}

/// Decodes the body whatever the HTTP status: the backend reports rejections
/// as 4xx/5xx with a JSON payload.
async fn decode_json<T: DeserializeOwned>(res: Response) -> Result<T, TransportError> {
    let status = res.status();
    let body = res.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
        status: status.as_u16(),
        source,
    })
}

fn normalize_base_url(server_url: &str) -> Result<Url, TransportError> {
    let trimmed = server_url.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_against_server_root() {
        let backend =
            HttpBackend::new("http://127.0.0.1:5000", DEFAULT_REQUEST_TIMEOUT).expect("backend");
        assert_eq!(
            backend.endpoint(UPLOAD_PDF_PATH).expect("url").as_str(),
            "http://127.0.0.1:5000/api/upload_pdf"
        );
        assert_eq!(
            backend.endpoint(CHAT_PATH).expect("url").as_str(),
            "http://127.0.0.1:5000/api/chat"
        );
    }

    #[test]
    fn endpoints_keep_a_path_prefix() {
        let backend = HttpBackend::new("https://docs.example.com/pdfbot/", DEFAULT_REQUEST_TIMEOUT)
            .expect("backend");
        assert_eq!(
            backend.endpoint(CHAT_PATH).expect("url").as_str(),
            "https://docs.example.com/pdfbot/api/chat"
        );
    }

    #[test]
    fn rejects_unparseable_server_url() {
        let err = HttpBackend::new("not a url", DEFAULT_REQUEST_TIMEOUT)
            .err()
            .expect("must fail");
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
