use thiserror::Error;

/// Errors returned by the provider clients.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned an error envelope (bad key, quota, bad request).
    #[error("API call failed: {0}")]
    Api(String),

    /// The reply arrived but could not be decoded into a judgement payload.
    ///
    /// The display string is the exact reason recorded on the outcome, so it
    /// must stay stable across releases.
    #[error("Failed to parse response")]
    Parse,
}
