//! Concurrent provider fan-out.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;

use radar_core::{AnalysisRequest, ProviderOutcome};
use radar_llm::{build_perception_prompt, PerceptionProvider};

/// Ask every configured provider for a judgement, concurrently.
///
/// Failure isolation is the contract here: one provider failing (or hanging
/// until its client times out) never aborts its siblings, and the map only
/// settles once the slowest provider has. Call errors and parse errors both
/// land as `status: error` outcomes keyed by the provider's label; nothing
/// escapes as a hard error.
pub async fn query_providers(
    providers: &[Arc<dyn PerceptionProvider>],
    request: &AnalysisRequest,
) -> BTreeMap<String, ProviderOutcome> {
    let prompt = build_perception_prompt(&request.brand_name, &request.competitors);

    let calls = providers.iter().map(|provider| {
        let prompt = prompt.clone();
        async move {
            let outcome = match provider.judge(&prompt).await {
                Ok(data) => ProviderOutcome::success(data, provider.model().to_string()),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.label(),
                        error = %e,
                        "provider call failed"
                    );
                    ProviderOutcome::failure(e.to_string())
                }
            };
            (provider.label().to_string(), outcome)
        }
    });

    join_all(calls).await.into_iter().collect()
}
