//! Clients for the external text generation service.

use std::fmt::{self, Debug};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The model used when none is configured.
pub const DEFAULT_REPORT_MODEL: &str = "gemini-2.5-flash";

/// The public Gemini API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// The ways a call to the text generation service can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// No API key was given when the server was started.
    #[error("report generation is not configured, set GEMINI_API_KEY and restart the server")]
    NotConfigured,

    /// The request could not be sent or the response could not be read.
    #[error("could not reach the text generation service: {0}")]
    Request(String),

    /// The service answered with a non-success status code.
    #[error("the text generation service responded with status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, for the logs.
        body: String,
    },

    /// The response did not have the expected shape.
    #[error("the text generation service sent an unexpected response: {0}")]
    InvalidResponse(String),

    /// The response did not contain any text.
    #[error("the text generation service returned an empty report")]
    EmptyResponse,
}

/// Something that can turn a prompt into text.
#[async_trait]
pub trait ReportGenerator: Debug + Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ReportError>;
}

/// Fails every request, used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl ReportGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ReportError> {
        Err(ReportError::NotConfigured)
    }
}

/// Generates reports with the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for `model` on the public Gemini API.
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: GEMINI_BASE_URL.to_owned(),
        }
    }

    /// Send requests to `base_url` instead of the public API.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &"********")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The text of the first candidate, with all of its parts joined.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        (!text.trim().is_empty()).then_some(text)
    }
}

#[async_trait]
impl ReportGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ReportError> {
        let body = GenerateContentRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        tracing::info!("requesting report from {}", self.model);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| ReportError::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("report request failed with status {status}: {body}");
            return Err(ReportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| ReportError::InvalidResponse(error.to_string()))?;

        payload.into_text().ok_or(ReportError::EmptyResponse)
    }
}
