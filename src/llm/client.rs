//! Chat-completion client for document analysis.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::config::AnalysisConfig;
use super::presets::resolve_instruction;

/// Errors that can occur while calling the analysis provider.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Failed to reach the provider
    #[error("Connection error: {0}")]
    Connection(String),
    /// Provider answered with a non-success status
    #[error("API error: {0}")]
    Api(String),
    /// Response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
    /// Provider did not answer within the configured timeout
    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Build the system + user conversation for one analysis.
pub fn build_messages(prompt: &str, text: &str, analysis_type: Option<&str>) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: resolve_instruction(analysis_type).to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!("{}\n\n{}", prompt, text),
        },
    ]
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct AnalysisClient {
    config: AnalysisConfig,
    client: Client,
}

impl AnalysisClient {
    /// Create a client. Fails only if the HTTP client cannot be built.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Analyze `text` with the caller's `prompt`, returning the first
    /// completion's content. The call is attempted exactly once.
    pub async fn analyze(
        &self,
        prompt: &str,
        text: &str,
        analysis_type: Option<&str>,
    ) -> Result<String, AnalysisError> {
        let messages = build_messages(prompt, text, analysis_type);
        let request = ChatRequest {
            model: &self.config.model,
            messages: &messages,
        };

        debug!(
            "Requesting analysis from {} (model {}, {} chars)",
            self.config.endpoint,
            self.config.model,
            text.len()
        );

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await.map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalysisError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        let content = parse_completion(&body)?;

        info!("Analysis completed ({} chars)", content.len());
        Ok(content)
    }

    fn transport_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_timeout() {
            AnalysisError::Timeout(self.config.timeout_secs)
        } else {
            AnalysisError::Connection(e.to_string())
        }
    }
}

/// Extract the first choice's message content from a response body.
fn parse_completion(body: &str) -> Result<String, AnalysisError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| AnalysisError::Parse(e.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::Parse("response has no choices".to_string()))?
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| AnalysisError::Parse("first choice has no message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::presets::{find, GENERIC_INSTRUCTION};

    #[test]
    fn test_build_messages() {
        let messages = build_messages("Summarize", "Body text", Some("tender"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, find("tender").unwrap().prompt);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Summarize\n\nBody text");

        let generic = build_messages("", "x", Some("unknown"));
        assert_eq!(generic[0].content, GENERIC_INSTRUCTION);
        assert_eq!(generic[1].content, "\n\nx");
    }

    #[test]
    fn test_parse_completion() {
        let ok = r#"{"choices":[{"message":{"role":"assistant","content":"Looks good"}}]}"#;
        assert_eq!(parse_completion(ok).unwrap(), "Looks good");

        let empty = r#"{"choices":[{"message":{"content":""}}]}"#;
        assert_eq!(parse_completion(empty).unwrap(), "");
    }

    #[test]
    fn test_parse_completion_rejects_malformed() {
        for body in [
            "not json",
            "{}",
            r#"{"choices":[]}"#,
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
        ] {
            assert!(
                matches!(parse_completion(body), Err(AnalysisError::Parse(_))),
                "expected parse error for {body}"
            );
        }
    }
}
