use std::time::Duration;

use futures_util::StreamExt;
use image2text_core::{
    OperationKind, OperationRequest, PoetryBody, TransportFailure, UploadCandidate,
};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{RawResponse, TransportError};

/// Whether requests carry cookies and the configured token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CredentialsMode {
    #[default]
    Omit,
    Include,
}

#[derive(Debug, Clone)]
pub struct TransportSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub credentials: CredentialsMode,
    pub auth_token: Option<String>,
    pub max_response_bytes: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            credentials: CredentialsMode::Omit,
            auth_token: None,
            max_response_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Sends one attempt of a request. Retrying is the caller's business.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &OperationRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    settings: TransportSettings,
}

impl ReqwestTransport {
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let base_url = parse_base_url(&settings.base_url)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .cookie_store(settings.credentials == CredentialsMode::Include)
            .build()
            .map_err(|err| TransportError::new(TransportFailure::InvalidRequest, err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    pub fn endpoint(&self, kind: OperationKind) -> Result<Url, TransportError> {
        self.base_url
            .join(kind.endpoint())
            .map_err(|err| TransportError::new(TransportFailure::InvalidRequest, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &OperationRequest,
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let url = self.endpoint(request.kind())?;
        let mut builder = self.client.post(url).timeout(timeout);
        if self.settings.credentials == CredentialsMode::Include {
            if let Some(token) = &self.settings.auth_token {
                builder = builder.bearer_auth(token);
            }
        }

        builder = match request {
            OperationRequest::ImageGenerate {
                file,
                workflow_type,
                model,
            } => builder.multipart(
                Form::new()
                    .part("file", file_part(file)?)
                    .text("workflow_type", workflow_type.as_str())
                    .text("model", model.as_str().to_string()),
            ),
            OperationRequest::ImageResize {
                file,
                width,
                height,
            } => builder.multipart(
                Form::new()
                    .part("file", file_part(file)?)
                    .text("width", width.to_string())
                    .text("height", height.to_string()),
            ),
            OperationRequest::PoetryGenerate { text, model } => builder.json(&PoetryBody {
                text,
                model: model.as_str(),
            }),
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = self.read_body(response).await?;
        Ok(RawResponse { status, body })
    }
}

/// Each attempt gets its own part over the shared, reference-counted bytes.
fn file_part(file: &UploadCandidate) -> Result<Part, TransportError> {
    Part::stream_with_length(file.bytes.clone(), file.bytes.len() as u64)
        .file_name(file.file_name.clone())
        .mime_str(&file.declared_type)
        .map_err(|err| TransportError::new(TransportFailure::InvalidRequest, err.to_string()))
}

/// `join` drops the last path segment unless the base ends with a slash.
fn parse_base_url(raw: &str) -> Result<Url, TransportError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|err| {
        TransportError::new(
            TransportFailure::InvalidRequest,
            format!("invalid base url {raw:?}: {err}"),
        )
    })
}

fn too_large(max_bytes: u64, actual: u64) -> TransportError {
    TransportError::new(
        TransportFailure::BodyTooLarge,
        format!("response too large (max {max_bytes}, actual {actual})"),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportFailure::Timeout, err.to_string());
    }
    if err.is_connect() {
        return TransportError::new(TransportFailure::Connect, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(TransportFailure::InvalidRequest, err.to_string());
    }
    TransportError::new(TransportFailure::Network, err.to_string())
}
