//! Analysis provider configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the chat-completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Full chat-completions URL of an OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token; requests are sent unauthenticated when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "openai/gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AnalysisConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `OPENROUTER_API_KEY` or `ANALYSIS_API_KEY`: API key (the former wins)
    /// - `ANALYSIS_ENDPOINT`: chat-completions URL
    /// - `ANALYSIS_MODEL`: model name
    /// - `ANALYSIS_TIMEOUT_SECS`: request timeout
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) =
            non_empty_env("OPENROUTER_API_KEY").or_else(|| non_empty_env("ANALYSIS_API_KEY"))
        {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = non_empty_env("ANALYSIS_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(model) = non_empty_env("ANALYSIS_MODEL") {
            self.model = model;
        }
        if let Some(val) = non_empty_env("ANALYSIS_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.timeout_secs = secs;
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.endpoint,
            "https://openrouter.ai/api/v1/chat/completions"
        );
        assert_eq!(config.model, "openai/gpt-3.5-turbo");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: AnalysisConfig = toml::from_str(r#"model = "mistral/small""#).unwrap();
        assert_eq!(config.model, "mistral/small");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_builders() {
        let config = AnalysisConfig::default()
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions")
            .with_api_key("sk-test")
            .with_timeout_secs(2);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.timeout_secs, 2);
    }
}
