//! Sanctum client implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use sanctum_core::{
    ImageUpload, Interpretation, OcrKind, OcrReading, Result, SanctumError, SubmissionResult,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::transport::{AnalysisTransport, InterpretRequest};

/// Multipart field name carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Client for the remote analysis service.
#[derive(Clone)]
pub struct SanctumClient {
    /// Base URL of the service.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Response of the health probe.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl SanctumClient {
    /// Build a client. Does not contact the service.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SanctumError::Config(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| SanctumError::TransportFailure(e.to_string()))?;

        read_json(response).await
    }

    /// Upload an image to an OCR endpoint.
    pub async fn upload_image(&self, kind: OcrKind, image: ImageUpload) -> Result<OcrReading> {
        let url = format!("{}{}", self.base_url, kind.path());
        debug!(slot = %kind, file = %image.file_name, bytes = image.bytes.len(), "Uploading image");

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(image.media_type.mime())
            .map_err(|e| SanctumError::TransportFailure(e.to_string()))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SanctumError::TransportFailure(e.to_string()))?;

        read_json(response).await
    }

    /// Request a card interpretation.
    pub async fn request_interpretation(&self, request: &InterpretRequest) -> Result<Interpretation> {
        let url = format!("{}/tarot/interpret", self.base_url);
        debug!(card = %request.card_name, language = %request.language, "Requesting interpretation");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SanctumError::TransportFailure(e.to_string()))?;

        read_json(response).await
    }
}

#[async_trait]
impl AnalysisTransport for SanctumClient {
    async fn recognize(&self, kind: OcrKind, image: ImageUpload) -> SubmissionResult<OcrReading> {
        let result = self.upload_image(kind, image).await;
        if let Err(e) = &result {
            warn!(slot = %kind, error = %e, "OCR request failed");
        }
        result.into()
    }

    async fn interpret(&self, request: InterpretRequest) -> SubmissionResult<Interpretation> {
        let result = self.request_interpretation(&request).await;
        if let Err(e) = &result {
            warn!(card = %request.card_name, error = %e, "Interpretation request failed");
        }
        result.into()
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SanctumError::TransportFailure(e.to_string()))?;

    if !status.is_success() {
        return Err(SanctumError::TransportFailure(failure_reason(status, &body)));
    }

    serde_json::from_str(&body).map_err(|e| SanctumError::UnparseablePayload(e.to_string()))
}

/// `detail` from the error body when present, otherwise the status reason phrase.
fn failure_reason(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    match detail {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {
            status_text(status)
        }
        Some(other) => other.to_string(),
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}
