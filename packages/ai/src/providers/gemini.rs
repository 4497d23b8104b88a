//! Google Gemini provider implementation.

use serde::{Deserialize, Serialize};

use super::{LlmProvider, base_url, build_client, read_body};
use crate::AiError;
use crate::config::ModelConfig;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini `generateContent` provider.
pub struct GeminiProvider {
    api_key: String,
    endpoint: String,
    max_tokens: Option<u32>,
    max_retries: u32,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ModelConfig) -> Result<Self, AiError> {
        let model = config.model.trim_start_matches("models/");
        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: format!(
                "{}/models/{model}:generateContent",
                base_url(config, DEFAULT_BASE_URL)
            ),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            client: build_client(config)?,
        })
    }
}

/// Gemini API request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Gemini API response body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Gemini API error response.
#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GeminiError>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Joins the text parts of the first candidate in a successful response.
fn response_text(body: &str) -> Result<String, AiError> {
    let response: GeminiResponse = serde_json::from_str(body)?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "unknown".to_string());
        return Err(AiError::Provider {
            message: format!("No candidates in Gemini response (block reason: {reason})"),
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(AiError::Provider {
            message: format!(
                "Gemini returned no text (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ),
        });
    }

    Ok(text)
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: self.max_tokens.map(|max_output_tokens| GenerationConfig {
                max_output_tokens,
            }),
        };

        let resp = crate::retry::send(
            || {
                self.client
                    .post(&self.endpoint)
                    .header("x-goog-api-key", &self.api_key)
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
