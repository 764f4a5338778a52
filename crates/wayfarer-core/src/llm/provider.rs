//! LlmProvider trait definition.
//!
//! This is the abstraction the orchestrator calls through; implementations
//! live in wayfarer-infra (e.g. the OpenAI-compatible client).

use wayfarer_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The
/// orchestrator is generic over this trait, so no object safety is needed.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai_compat").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response, including
    /// any tool calls the model requested.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
