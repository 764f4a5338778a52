//! Configuration loader for Wayfarer.
//!
//! Reads a TOML file (by default `wayfarer.toml`) and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed. API credentials come from the environment only, never from
//! the file.

use std::path::Path;

use secrecy::SecretString;

use wayfarer_types::config::{AppConfig, Secrets};

/// Environment variable holding the LLM provider API key.
pub const ENV_LLM_API_KEY: &str = "WAYFARER_LLM_API_KEY";
/// Environment variable holding the Amadeus API key.
pub const ENV_AMADEUS_API_KEY: &str = "WAYFARER_AMADEUS_API_KEY";
/// Environment variable holding the Amadeus API secret.
pub const ENV_AMADEUS_API_SECRET: &str = "WAYFARER_AMADEUS_API_SECRET";

/// Load application configuration from a TOML file.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the
///   default.
/// - Missing sections and fields fall back to their serde defaults.
pub async fn load_config(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Read API credentials from the environment.
///
/// Fails with the name of the first missing variable so startup errors are
/// actionable. The values are wrapped in [`SecretString`] immediately and
/// never logged.
pub fn secrets_from_env() -> anyhow::Result<Secrets> {
    let read = |name: &str| -> anyhow::Result<SecretString> {
        let value = std::env::var(name)
            .map_err(|_| anyhow::anyhow!("missing required environment variable {name}"))?;
        if value.is_empty() {
            anyhow::bail!("environment variable {name} is empty");
        }
        Ok(SecretString::from(value))
    };

    Ok(Secrets {
        llm_api_key: read(ENV_LLM_API_KEY)?,
        amadeus_api_key: read(ENV_AMADEUS_API_KEY)?,
        amadeus_api_secret: read(ENV_AMADEUS_API_SECRET)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.llm.max_tool_rounds, 20);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[server]
bind = "0.0.0.0:3000"

[llm]
model = "mistralai/Mixtral-8x7B-Instruct-v0.1"
turn_timeout_secs = 60
"#,
        )
        .await
        .unwrap();

        let config = load_config(&config_path).await;
        assert_eq!(config.server.bind, "0.0.0.0:3000");
        assert_eq!(config.llm.model, "mistralai/Mixtral-8x7B-Instruct-v0.1");
        assert_eq!(config.llm.turn_timeout_secs, 60);
        // Untouched sections keep their defaults.
        assert_eq!(config.travel.base_url, "https://test.api.amadeus.com");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&config_path).await;
        assert_eq!(config.server.bind, "127.0.0.1:8080");
    }
}
