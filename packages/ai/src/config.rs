//! Model configuration.
//!
//! [`ModelSettings`] holds the non-secret knobs that may come from a config
//! file or CLI flags. [`ModelConfig::from_env`] fills the gaps from the
//! environment and pulls the API key, which is only ever read from the
//! environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `AI_PROVIDER` | `gemini` (default), `openai`, or `anthropic` |
//! | `GEMINI_API_KEY` / `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` | provider API key |
//! | `AI_MODEL` | model identifier |
//! | `AI_BASE_URL` | API base URL override |
//! | `AI_TIMEOUT_SECS` | per-request timeout |
//! | `AI_MAX_RETRIES` | retries for transient failures (default 0) |

use std::time::Duration;

use serde::Deserialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::AiError;

/// Which remote API to call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProviderKind {
    /// Google Gemini `generateContent`.
    #[default]
    #[strum(to_string = "gemini", serialize = "google")]
    Gemini,
    /// `OpenAI` chat completions (or a compatible server).
    #[strum(to_string = "openai", serialize = "gpt")]
    OpenAi,
    /// Anthropic messages API.
    #[strum(to_string = "anthropic", serialize = "claude")]
    Anthropic,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    #[must_use]
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-flash-latest",
            Self::OpenAi => "gpt-4o",
            Self::Anthropic => "claude-sonnet-4-20250514",
        }
    }
}

/// Non-secret model settings from a config file or the command line.
///
/// Every field is optional; unset fields fall back to the environment and
/// then to built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSettings {
    /// Provider to call.
    pub provider: Option<ProviderKind>,
    /// Model identifier.
    pub model: Option<String>,
    /// API base URL override.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Maximum output tokens requested from the model.
    pub max_tokens: Option<u32>,
    /// Retries for transient failures.
    pub max_retries: Option<u32>,
}

impl ModelSettings {
    /// Returns `self` with every unset field taken from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            provider: self.provider.or(fallback.provider),
            model: self.model.or(fallback.model),
            base_url: self.base_url.or(fallback.base_url),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
            max_tokens: self.max_tokens.or(fallback.max_tokens),
            max_retries: self.max_retries.or(fallback.max_retries),
        }
    }
}

/// Fully resolved configuration for one model client.
#[derive(Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Provider to call.
    pub provider: ProviderKind,
    /// API key for the provider.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// API base URL override; `None` uses the provider's public endpoint.
    pub base_url: Option<String>,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Maximum output tokens; `None` uses the provider default.
    pub max_tokens: Option<u32>,
    /// Retries for transient failures; `0` means a single attempt.
    pub max_retries: u32,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl ModelConfig {
    /// Creates a config for `provider` with its default model and no
    /// timeout or retries.
    #[must_use]
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            base_url: None,
            timeout: None,
            max_tokens: None,
            max_retries: 0,
        }
    }

    /// Resolves `settings` against the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Config`] if the provider's API key is not set or
    /// an environment variable holds an invalid value.
    pub fn from_env(settings: ModelSettings) -> Result<Self, AiError> {
        Self::resolve_with(settings, |name| std::env::var(name).ok())
    }

    /// Resolves `settings`, looking variables up with `env`.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Config`] if the provider's API key is not set or
    /// a variable holds an invalid value.
    pub fn resolve_with(
        settings: ModelSettings,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AiError> {
        let provider = match settings.provider {
            Some(p) => p,
            None => env("AI_PROVIDER")
                .map(|v| parse_var::<ProviderKind>("AI_PROVIDER", &v))
                .transpose()?
                .unwrap_or_default(),
        };

        let key_var = provider.api_key_var();
        let api_key = env(key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::Config {
                message: format!("{key_var} environment variable not set"),
            })?;

        let model = settings
            .model
            .or_else(|| env("AI_MODEL"))
            .unwrap_or_else(|| provider.default_model().to_string());
        let base_url = settings.base_url.or_else(|| env("AI_BASE_URL"));
        let timeout_secs = match settings.timeout_secs {
            Some(s) => Some(s),
            None => env("AI_TIMEOUT_SECS")
                .map(|v| parse_var::<u64>("AI_TIMEOUT_SECS", &v))
                .transpose()?,
        };
        let max_retries = match settings.max_retries {
            Some(r) => r,
            None => env("AI_MAX_RETRIES")
                .map(|v| parse_var::<u32>("AI_MAX_RETRIES", &v))
                .transpose()?
                .unwrap_or(0),
        };

        log::info!("Using AI provider {provider} with model {model}");

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            timeout: timeout_secs.map(Duration::from_secs),
            max_tokens: settings.max_tokens,
            max_retries,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, AiError> {
    value.trim().parse().map_err(|_| AiError::Config {
        message: format!("invalid value for {name}: {value:?}"),
    })
}
