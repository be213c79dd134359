//! AI module for answering questions about a date's results.
//!
//! Text generation is an external collaborator behind the [`AnswerGenerator`]
//! trait. [`AiClient`] implements it with the Anthropic Messages API.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lighthouse::ai::{AiClient, AnswerGenerator};
//!
//! let client = AiClient::from_env()?;
//! let answer = client.generate(&system_prompt(), "Which outlet had the best LCP?").await?;
//! ```

pub mod prompt;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use std::env;

use crate::api::logs::{log_info_indent, log_success};
use crate::error::{AiError, AiResult};

pub use prompt::{format_records_block, system_prompt, user_prompt};

/// Produces an answer from a system prompt and a user prompt.
pub trait AnswerGenerator: Send + Sync {
    fn generate<'a>(&'a self, system: &'a str, prompt: &'a str) -> BoxFuture<'a, AiResult<String>>;
}

/// Default model
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API client
#[derive(Clone)]
pub struct AiClient {
    api_key: String,
    model: String,
    max_tokens: u32,
    http: reqwest::Client,
}

/// Anthropic API response structure
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Anthropic API error response
#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl AiClient {
    /// Create a new client with explicit API key
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from environment variable ANTHROPIC_API_KEY
    ///
    /// `ANTHROPIC_MODEL` overrides the default model.
    pub fn from_env() -> AiResult<Self> {
        let _ = dotenvy::dotenv();

        let api_key = env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AiError::MissingApiKey("ANTHROPIC_API_KEY not set".to_string()))?;

        let client = Self::new(api_key);
        Ok(match env::var("ANTHROPIC_MODEL") {
            Ok(model) if !model.trim().is_empty() => client.with_model(model.trim()),
            _ => client,
        })
    }

    /// Set the model to use
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Call Anthropic API
    async fn call_api(&self, system: &str, prompt: &str) -> AiResult<String> {
        log_info_indent(format!("📡 Calling Anthropic API ({})", self.model), 1);

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": system,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let response = self
            .http
            .post(API_URL)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<AnthropicError>(&body) {
                return Err(AiError::ApiError(error.error.message));
            }
            return Err(AiError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let text = extract_text(&body)?;
        log_success(format!("Received {} bytes from model", text.len()));
        Ok(text)
    }
}

impl AnswerGenerator for AiClient {
    fn generate<'a>(&'a self, system: &'a str, prompt: &'a str) -> BoxFuture<'a, AiResult<String>> {
        self.call_api(system, prompt).boxed()
    }
}

/// Concatenate the text blocks of a Messages API response.
fn extract_text(body: &str) -> AiResult<String> {
    let response: AnthropicResponse =
        serde_json::from_str(body).map_err(|e| AiError::InvalidJson(e.to_string()))?;

    let text = response
        .content
        .iter()
        .filter(|c| c.content_type == "text")
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        return Err(AiError::InvalidJson("Empty response".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_blocks() {
        let body = r#"{"content":[{"type":"text","text":"Heraldo "},{"type":"tool_use"},{"type":"text","text":"leads."}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Heraldo leads.");
    }

    #[test]
    fn test_extract_text_empty() {
        let body = r#"{"content":[]}"#;
        assert!(matches!(extract_text(body), Err(AiError::InvalidJson(_))));
    }

    #[test]
    fn test_extract_text_invalid_json() {
        assert!(matches!(extract_text("<html>"), Err(AiError::InvalidJson(_))));
    }

    #[test]
    fn test_builder() {
        let client = AiClient::new("key".into()).with_model("other-model").with_max_tokens(10);
        assert_eq!(client.model(), "other-model");
        assert_eq!(client.max_tokens, 10);
    }
}
