//! Completion provider integration
//!
//! Talks to any OpenAI-compatible chat completions endpoint. The
//! [`CompletionProvider`] trait is the seam the feedback generator depends on,
//! so tests can substitute their own provider.

use crate::config::LlmConfig;
use crate::error::{CritiqueError, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// A source of chat completions
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Complete a single exchange: one system instruction, one user turn
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat completions request format
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI chat completions response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible provider
pub struct ChatCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionClient {
    /// Create a client from config. Fails when no credential is configured.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            CritiqueError::Config(config::ConfigError::Message(
                "LLM API key not set".to_string(),
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), COMPLETIONS_PATH),
            api_key: SecretString::new(api_key.into()),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        debug!("Calling completion provider at {}", self.endpoint);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(CritiqueError::LlmApi(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CritiqueError::LlmApi(format!("Failed to parse response: {}", e)))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CritiqueError::LlmApi("Empty response from API".to_string()))
    }
}
