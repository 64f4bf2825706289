//! Provider clients for structured brand-perception judgements.
//!
//! Each configured provider is asked the same prompt and replies with a JSON
//! judgement. The two clients differ in their reply contract:
//!
//! - [`OpenAiClient`] requests JSON mode, so the whole reply body must parse —
//!   anything else is a parse failure.
//! - [`AnthropicClient`] may wrap the JSON in prose; the first-`{`-to-last-`}`
//!   substring is parsed, and a reply with no JSON block at all is still a
//!   success carrying `{"raw_response": <text>}`.
//!
//! That asymmetry is contractual: downstream scoring treats both the same,
//! but a strict provider fails closed while a prose-capable one fails open.

mod anthropic;
mod error;
mod openai;
mod prompt;
mod provider;

pub use anthropic::AnthropicClient;
pub use error::ProviderError;
pub use openai::OpenAiClient;
pub use prompt::build_perception_prompt;
pub use provider::{providers_from_config, PerceptionProvider};
