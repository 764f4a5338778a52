//! Application state wiring the registry and the agent together.
//!
//! The orchestrator is generic over the LLM and travel provider traits;
//! AppState pins those generics to the concrete infra implementations so
//! handlers can share one `Arc` of each.

use std::sync::Arc;

use wayfarer_core::agent::AgentOrchestrator;
use wayfarer_core::session::ConversationRegistry;
use wayfarer_infra::llm::OpenAiCompatProvider;
use wayfarer_infra::travel::AmadeusClient;
use wayfarer_types::config::{AppConfig, Secrets};

/// Orchestrator pinned to the Together-compatible LLM and Amadeus travel
/// providers.
pub type ConcreteOrchestrator = AgentOrchestrator<OpenAiCompatProvider, AmadeusClient>;

/// Shared application state available to every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConversationRegistry>,
    pub orchestrator: Arc<ConcreteOrchestrator>,
}

impl AppState {
    /// Wire the providers and agent from config and secrets.
    pub fn init(config: &AppConfig, secrets: Secrets) -> Self {
        let llm = Arc::new(OpenAiCompatProvider::new(
            secrets.llm_api_key,
            config.llm.base_url.clone(),
        ));
        let travel = Arc::new(AmadeusClient::new(
            config.travel.base_url.clone(),
            secrets.amadeus_api_key,
            secrets.amadeus_api_secret,
        ));

        Self {
            registry: Arc::new(ConversationRegistry::new()),
            orchestrator: Arc::new(AgentOrchestrator::new(llm, travel, config.llm.clone())),
        }
    }
}
