//! Client for OpenAI-compatible chat-completion APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::PerceptionProvider;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the OpenAI chat-completions endpoint.
///
/// The request asks for JSON mode (`response_format: json_object`), so the
/// reply content is required to be a complete JSON document — an unparseable
/// body is a [`ProviderError::Parse`], never a partial success.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl OpenAiClient {
    /// Creates a new client pointed at the public OpenAI API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock
    /// or pointing at an OpenAI-compatible gateway).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vibesradar/0.1 (brand-perception)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Extracts a human-readable message from an error reply body.
    ///
    /// Falls back to the raw HTTP status when the body is not the documented
    /// `{"error":{"message":…}}` envelope.
    fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .map_or_else(|_| format!("HTTP status {status}"), |e| e.error.message)
    }
}

#[async_trait]
impl PerceptionProvider for OpenAiClient {
    fn label(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn judge(&self, prompt: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": 0.3,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(Self::api_error_message(status, &body)));
        }

        let envelope: ChatCompletionResponse =
            response.json().await.map_err(|_| ProviderError::Parse)?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ProviderError::Parse)?;

        // JSON mode contract: the whole content string must be one document.
        serde_json::from_str(&content).map_err(|_| ProviderError::Parse)
    }
}
