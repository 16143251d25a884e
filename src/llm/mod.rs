mod context;
mod google;
mod prompts;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::Config;
use crate::error::ChatError;

pub use context::truncate_context;
pub use prompts::{NOT_FOUND_ANSWER, PromptRequest, build_prompt};

/// Trait for LLM providers
#[async_trait]
pub trait LlmProviderTrait: Send + Sync {
    /// Send one request and return the model's text verbatim
    async fn generate(&self, request: &PromptRequest) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Answers questions about a document through an injected provider.
///
/// There is no way to build one without a credential: a missing key is a
/// [`ChatError::Configuration`] from [`AnswerService::from_config`].
pub struct AnswerService {
    provider: Box<dyn LlmProviderTrait>,
    max_context_length: usize,
}

impl AnswerService {
    pub fn new(provider: Box<dyn LlmProviderTrait>, max_context_length: usize) -> Self {
        Self {
            provider,
            max_context_length: max_context_length.max(1),
        }
    }

    /// Create the service for the configured Gemini model
    pub fn from_config(config: &Config, model_override: Option<&str>) -> Result<Self, ChatError> {
        let api_key = config.api_key().ok_or_else(ChatError::missing_api_key)?;
        let model = model_override.unwrap_or(&config.model);

        let provider =
            google::GoogleProvider::new(api_key, model, config.gemini.base_url.as_deref())?;

        Ok(Self::new(Box::new(provider), config.max_context_length))
    }

    /// Answer `question` from `context`. Exactly one provider call is made;
    /// nothing is cached or retried.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String, ChatError> {
        let truncated = truncate_context(context, self.max_context_length);
        if truncated.len() < context.len() {
            tracing::debug!(
                kept = self.max_context_length,
                original = context.chars().count(),
                "truncated document context"
            );
        }

        let request = build_prompt(question, truncated);

        self.provider.generate(&request).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "answer request failed");
            ChatError::Answer(format!("{:#}", e))
        })
    }

    /// Get the provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}
