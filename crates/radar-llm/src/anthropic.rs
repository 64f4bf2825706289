//! Client for the Anthropic Messages API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::provider::PerceptionProvider;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

/// Client for the Anthropic Messages API.
///
/// Messages replies are prose-capable: the judgement JSON may be wrapped in
/// explanatory text, so the first-`{`-to-last-`}` substring is what gets
/// parsed. A reply with no JSON block at all is still a success carrying the
/// text under `raw_response`; a block that exists but will not parse is a
/// failure. Both halves of that contract are load-bearing.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl AnthropicClient {
    /// Creates a new client pointed at the public Anthropic API.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
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

    fn api_error_message(status: reqwest::StatusCode, body: &str) -> String {
        serde_json::from_str::<ApiErrorEnvelope>(body)
            .map_or_else(|_| format!("HTTP status {status}"), |e| e.error.message)
    }
}

/// Returns the substring spanning the first `{` to the last `}`, if any.
fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Parse a prose-capable reply into a judgement payload.
///
/// # Errors
///
/// Returns [`ProviderError::Parse`] only when a JSON block exists but is not
/// valid JSON. No block at all falls open to `{"raw_response": <text>}`.
fn parse_prose_reply(text: &str) -> Result<Value, ProviderError> {
    match extract_json_block(text) {
        Some(block) => serde_json::from_str(block).map_err(|_| ProviderError::Parse),
        None => Ok(json!({ "raw_response": text })),
    }
}

#[async_trait]
impl PerceptionProvider for AnthropicClient {
    fn label(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn judge(&self, prompt: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(Self::api_error_message(status, &body)));
        }

        let envelope: MessagesResponse =
            response.json().await.map_err(|_| ProviderError::Parse)?;
        let text = envelope
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(ProviderError::Parse)?;

        parse_prose_reply(&text)
    }
}
