//! Anthropic Claude provider implementation.

use serde::{Deserialize, Serialize};

use super::{LlmProvider, base_url, build_client, read_body};
use crate::AiError;
use crate::config::ModelConfig;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// The messages API requires an explicit output budget.
const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    max_retries: u32,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ModelConfig) -> Result<Self, AiError> {
        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: format!("{}/messages", base_url(config, DEFAULT_BASE_URL)),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            max_retries: config.max_retries,
            client: build_client(config)?,
        })
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic API error response.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<AnthropicError>(body)
        .ok()
        .map(|e| e.error.message)
}

fn response_text(body: &str) -> Result<String, AiError> {
    let response: AnthropicResponse = serde_json::from_str(body)?;

    Ok(response
        .content
        .into_iter()
        .filter_map(|block| match block {
            AnthropicContentBlock::Text { text } => Some(text),
            AnthropicContentBlock::Other => None,
        })
        .collect())
}

#[async_trait::async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let resp = crate::retry::send(
            || {
                self.client
                    .post(&self.endpoint)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", "2023-06-01")
                    .header("content-type", "application/json")
                    .json(&request)
            },
            self.max_retries,
        )
        .await?;

        let body = read_body(resp, error_message).await?;
        response_text(&body)
    }
}
