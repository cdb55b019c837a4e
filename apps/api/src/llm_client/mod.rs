/// LLM Client: the single point of entry for all text-generation calls in WhyNot.
///
/// ARCHITECTURAL RULE: No other module may call the model endpoint directly.
/// All LLM interactions MUST go through this module.
///
/// One request per call. There is no retry and no backoff: a failed call is
/// surfaced to the caller, which decides whether to fall back.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod extract;
pub mod prompts;

/// Hosted instruction-tuned model used when `LLM_API_URL` is not set.
pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid or missing API credentials")]
    Auth,

    #[error("API quota exceeded")]
    Quota,

    #[error("Model is loading, retry later")]
    ModelLoading,

    #[error("API error (status {status}): {body}")]
    Unknown { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unrecognized response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Maps a non-success status to the error taxonomy.
    fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => LlmError::Auth,
            429 => LlmError::Quota,
            503 => LlmError::ModelLoading,
            code => LlmError::Unknown { status: code, body },
        }
    }
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_new_tokens: u32,
    pub top_p: f32,
    pub return_full_text: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_new_tokens: 800,
            top_p: 0.9,
            return_full_text: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParams,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The endpoint answers with either a batch array or a bare object.
/// Anything else fails to decode.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
}

impl GenerationResponse {
    fn into_text(self) -> Option<String> {
        match self {
            GenerationResponse::Batch(items) => {
                items.into_iter().next().map(|item| item.generated_text)
            }
            GenerationResponse::Single(item) => Some(item.generated_text),
        }
    }
}

/// Anything that can turn a prompt into generated text.
///
/// Carried in the coach as `Arc<dyn TextGenerator>` so the hosted model can
/// be swapped without touching pipeline or handler code.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError>;
}

/// HTTP client for the hosted text-generation endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl LlmClient {
    pub fn new(api_url: String, api_token: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_url,
            api_token,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issues one generation request and returns the generated text.
    pub async fn call(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        let request_body = GenerationRequest {
            inputs: prompt,
            parameters: *params,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(LlmError::from_status(status, body));
        }

        let body = response.text().await?;
        let text = serde_json::from_str::<GenerationResponse>(&body)?
            .into_text()
            .ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: {} chars generated", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        self.call(prompt, params).await
    }
}
