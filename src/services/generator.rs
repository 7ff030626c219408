//! Feedback generation
//!
//! [`FeedbackGenerator::generate`] always yields usable text. When a
//! completion provider is configured it is tried first; if it is absent or
//! the call fails for any reason, a fallback template is returned instead.

use crate::config::LlmConfig;
use crate::error::Result;
use crate::services::fallback::FallbackFeedback;
use crate::services::llm::{ChatCompletionClient, CompletionProvider};
use crate::types::{FeedbackText, UserInput};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Instruction sent as the system turn of every live request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant giving constructive feedback. \
Analyze the user's text and respond with specific, actionable feedback that:
1. Highlights its strengths
2. Identifies areas for improvement
3. Offers concrete suggestions
4. Keeps an encouraging tone
Keep the response concise but thorough (200-400 words).";

/// Produces critique text for validated user input
pub struct FeedbackGenerator {
    provider: Option<Arc<dyn CompletionProvider>>,
    fallback: FallbackFeedback,
}

impl FeedbackGenerator {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, fallback: FallbackFeedback) -> Self {
        Self { provider, fallback }
    }

    /// Generator that never calls out; only fallback templates
    pub fn offline(fallback: FallbackFeedback) -> Self {
        Self::new(None, fallback)
    }

    /// Build from config: live when a credential is present, offline otherwise
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let provider: Option<Arc<dyn CompletionProvider>> = match config.api_key() {
            Some(_) => {
                let client = ChatCompletionClient::new(config)?;
                info!(
                    "Completion provider configured ({} via {})",
                    client.model(),
                    client.endpoint()
                );
                Some(Arc::new(client))
            }
            None => {
                info!("No LLM API key configured; feedback will use fallback templates");
                None
            }
        };

        Ok(Self::new(provider, FallbackFeedback::random()))
    }

    /// Whether a live provider is configured
    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate feedback. Never fails.
    pub async fn generate(&self, input: &UserInput) -> FeedbackText {
        let Some(provider) = &self.provider else {
            debug!("No completion provider, using fallback");
            return self.fallback.pick();
        };

        match provider.complete(SYSTEM_PROMPT, input.as_str()).await {
            Ok(text) => match FeedbackText::new(&text) {
                Some(feedback) => feedback,
                None => {
                    warn!("Completion provider returned blank feedback, using fallback");
                    self.fallback.pick()
                }
            },
            Err(e) => {
                warn!("Completion provider call failed, using fallback: {}", e);
                self.fallback.pick()
            }
        }
    }
}

impl std::fmt::Debug for FeedbackGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackGenerator")
            .field("live", &self.is_live())
            .field("fallback", &self.fallback)
            .finish()
    }
}
