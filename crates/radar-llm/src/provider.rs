use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use radar_core::AppConfig;

use crate::error::ProviderError;
use crate::{AnthropicClient, OpenAiClient};

/// A language-model service that can be asked for a structured brand
/// judgement.
///
/// Implementations own their reply contract: a strict JSON-mode provider
/// fails closed on an unparseable body, a prose-capable one extracts the JSON
/// block and falls back to `{"raw_response": …}` when none exists. The
/// requester treats every implementation identically, which is what makes
/// fakes trivial in tests.
#[async_trait]
pub trait PerceptionProvider: Send + Sync {
    /// Stable label used as the key in outcome maps (e.g. `"openai"`).
    fn label(&self) -> &'static str;

    /// Model identifier reported on successful outcomes.
    fn model(&self) -> &str;

    /// Request a judgement for the prompt and return the parsed payload.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Http`] or [`ProviderError::Api`] when the call itself
    /// fails; [`ProviderError::Parse`] when the reply cannot be decoded.
    async fn judge(&self, prompt: &str) -> Result<Value, ProviderError>;
}

/// Build the provider set from configuration.
///
/// A provider without an API key is simply not configured: it is absent from
/// the returned set and does not count toward the consensus confidence
/// denominator. An empty set is allowed (analyses then settle at confidence
/// zero) but is worth a loud warning at startup.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if an underlying `reqwest::Client` cannot
/// be constructed.
pub fn providers_from_config(
    config: &AppConfig,
) -> Result<Vec<Arc<dyn PerceptionProvider>>, ProviderError> {
    let mut providers: Vec<Arc<dyn PerceptionProvider>> = Vec::new();

    match &config.openai_api_key {
        Some(key) => providers.push(Arc::new(OpenAiClient::with_base_url(
            key,
            &config.openai_model,
            config.llm_request_timeout_secs,
            &config.openai_base_url,
        )?)),
        None => tracing::warn!("OPENAI_API_KEY not set; openai provider disabled"),
    }

    match &config.anthropic_api_key {
        Some(key) => providers.push(Arc::new(AnthropicClient::with_base_url(
            key,
            &config.anthropic_model,
            config.llm_request_timeout_secs,
            &config.anthropic_base_url,
        )?)),
        None => tracing::warn!("ANTHROPIC_API_KEY not set; anthropic provider disabled"),
    }

    if providers.is_empty() {
        tracing::warn!("no LLM providers configured; analyses will score zero with confidence 0");
    }

    Ok(providers)
}
