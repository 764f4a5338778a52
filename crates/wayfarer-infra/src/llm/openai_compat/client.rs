//! OpenAiCompatProvider -- concrete [`LlmProvider`] for OpenAI-compatible
//! chat-completions endpoints.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when constructing the Authorization header. It never appears in Debug
//! output or tracing logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use wayfarer_core::llm::LlmProvider;
use wayfarer_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::types::{WireResponse, from_wire_response, to_wire_request};

/// LLM provider speaking the OpenAI chat-completions protocol.
///
/// Together AI serves this protocol, as do OpenAI itself and most local
/// inference servers; the base URL decides which one is hit.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl OpenAiCompatProvider {
    /// Create a new provider against the given base URL
    /// (e.g. `https://api.together.xyz/v1`).
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

// OpenAiCompatProvider intentionally does not derive Debug; the
// SecretString field already refuses to print, but omitting Debug keeps
// the whole struct out of logs.

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = to_wire_request(request);
        debug!(model = %request.model, tools = request.tools.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {err}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                code => LlmError::Provider {
                    message: format!("status {code}: {detail}"),
                },
            });
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|err| LlmError::Deserialization(err.to_string()))?;

        from_wire_response(wire)
    }
}
