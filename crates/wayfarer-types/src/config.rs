//! Application configuration types.
//!
//! [`AppConfig`] is deserialized from a TOML config file; every field has
//! a serde default so a missing or partial file still yields a runnable
//! configuration. API keys are never read from the file -- they live in
//! [`Secrets`], populated from environment variables by the infra loader.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub travel: TravelConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// LLM provider settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Upper bound on tool-dispatch rounds within one turn.
    pub max_tool_rounds: u32,
    /// Whole-turn deadline in seconds; a turn exceeding it fails the session.
    pub turn_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.together.xyz/v1".to_string(),
            model: "meta-llama/Meta-Llama-3-70B-Instruct-Turbo".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            max_tool_rounds: 20,
            turn_timeout_secs: 120,
        }
    }
}

/// Travel data provider settings (Amadeus self-service APIs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelConfig {
    pub base_url: String,
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://test.api.amadeus.com".to_string(),
        }
    }
}

/// API credentials, sourced from the environment -- never from config.toml
/// and never logged.
pub struct Secrets {
    pub llm_api_key: SecretString,
    pub amadeus_api_key: SecretString,
    pub amadeus_api_secret: SecretString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.llm.max_tool_rounds, 20);
        assert_eq!(config.llm.turn_timeout_secs, 120);
        assert_eq!(config.travel.base_url, "https://test.api.amadeus.com");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[server]
bind = "0.0.0.0:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.llm.model, "meta-llama/Meta-Llama-3-70B-Instruct-Turbo");
    }
}
