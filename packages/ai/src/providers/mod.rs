//! LLM provider abstraction and implementations.
//!
//! Supports Google Gemini, `OpenAI`, and Anthropic via a common trait.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use crate::AiError;
use crate::config::{ModelConfig, ProviderKind};

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends `prompt` as a single user turn and returns the model's reply
    /// text, unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails or the provider rejects it.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Creates the provider described by `config`.
///
/// # Errors
///
/// Returns [`AiError::Http`] if the HTTP client cannot be built.
pub fn create_provider(config: &ModelConfig) -> Result<Box<dyn LlmProvider>, AiError> {
    Ok(match config.provider {
        ProviderKind::Gemini => Box::new(gemini::GeminiProvider::from_config(config)?),
        ProviderKind::OpenAi => Box::new(openai::OpenAiProvider::from_config(config)?),
        ProviderKind::Anthropic => Box::new(anthropic::AnthropicProvider::from_config(config)?),
    })
}

/// Builds the shared [`reqwest::Client`] for a provider, applying the
/// configured timeout.
pub(crate) fn build_client(config: &ModelConfig) -> Result<reqwest::Client, AiError> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Trims a trailing `/` so endpoint paths can be appended.
pub(crate) fn base_url<'a>(config: &'a ModelConfig, default: &'a str) -> &'a str {
    config
        .base_url
        .as_deref()
        .unwrap_or(default)
        .trim_end_matches('/')
}

/// Reads a response body and maps non-success statuses to
/// [`AiError::Provider`], using `error_message` to pull the API's message
/// out of the error body when it has one.
pub(crate) async fn read_body(
    resp: reqwest::Response,
    error_message: fn(&str) -> Option<String>,
) -> Result<String, AiError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {status}: {body}"));
        return Err(AiError::Provider { message });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_every_provider_kind() {
        for kind in [ProviderKind::Gemini, ProviderKind::OpenAi, ProviderKind::Anthropic] {
            let config = ModelConfig::new(kind, "key");
            assert!(create_provider(&config).is_ok(), "{kind}");
        }
    }

    #[test]
    fn base_url_prefers_override_without_trailing_slash() {
        let mut config = ModelConfig::new(ProviderKind::OpenAi, "key");
        assert_eq!(base_url(&config, "https://api.example.com/v1"), "https://api.example.com/v1");
        config.base_url = Some("http://localhost:11434/v1/".to_string());
        assert_eq!(base_url(&config, "https://api.example.com/v1"), "http://localhost:11434/v1");
    }
}
