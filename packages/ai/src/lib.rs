#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Prompt construction and LLM provider abstraction.
//!
//! Supports Google Gemini (the default), `OpenAI` (and any
//! `OpenAI`-compatible server via a custom base URL) and Anthropic Claude
//! behind the [`providers::LlmProvider`] trait. Providers are built from an
//! explicit [`config::ModelConfig`] rather than process-wide state, so tests
//! can substitute their own [`providers::LlmProvider`] implementation.
//!
//! Each call is a single request/response: the prompt goes out, the raw
//! reply text comes back. Retries are off unless
//! [`config::ModelConfig::max_retries`] is raised.

pub mod config;
pub mod prompt;
pub mod providers;
pub mod retry;

pub use config::{ModelConfig, ModelSettings, ProviderKind};
pub use prompt::{PromptStyle, build_prompt};
pub use providers::{LlmProvider, create_provider};

use thiserror::Error;

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
