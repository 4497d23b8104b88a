//! Optional TOML config file.
//!
//! ```toml
//! [pipeline]
//! chunk_limit = 4000
//! on_unparseable = "skip"
//! prompt_style = "concise"
//!
//! [model]
//! provider = "openai"
//! model = "gpt-4o-mini"
//! timeout_secs = 120
//! max_retries = 2
//! ```
//!
//! API keys are never read from this file.

use std::path::{Path, PathBuf};

use kvsheet_ai::ModelSettings;
use kvsheet_pipeline::PipelineSettings;
use serde::Deserialize;
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "kvsheet.toml";

/// Errors from loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid config TOML.
    #[error("Invalid config file {path}: {source}")]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Contents of a config file. Every table and key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// `[pipeline]` table.
    pub pipeline: PipelineSettings,
    /// `[model]` table.
    pub model: ModelSettings,
}

impl FileConfig {
    /// Parses config TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if `text` is malformed or has unknown keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else an empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        log::debug!("Loading config from {}", path.display());

        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        Self::parse(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use kvsheet_ai::{PromptStyle, ProviderKind};
    use kvsheet_pipeline::PipelineConfig;
    use kvsheet_record::UnparseablePolicy;

    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(FileConfig::parse("").unwrap(), FileConfig::default());
    }

    #[test]
    fn parses_both_tables() {
        let config = FileConfig::parse(
            r#"
            [pipeline]
            chunk_limit = 4000
            on_unparseable = "skip"
            prompt_style = "concise"

            [model]
            provider = "anthropic"
            timeout_secs = 90
            max_retries = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.chunk_limit, Some(4000));
        assert_eq!(config.pipeline.on_unparseable, Some(UnparseablePolicy::Skip));
        assert_eq!(config.pipeline.prompt_style, Some(PromptStyle::Concise));
        assert_eq!(config.model.provider, Some(ProviderKind::Anthropic));
        assert_eq!(config.model.timeout_secs, Some(90));
        assert_eq!(config.model.max_retries, Some(3));
        assert_eq!(config.model.model, None);
    }

    #[test]
    fn file_values_apply_over_presets() {
        let config = FileConfig::parse("[pipeline]\nchunk_limit = 1234\n").unwrap();
        let pipeline = config.pipeline.apply(PipelineConfig::batch());
        assert_eq!(pipeline.chunk_limit, 1234);
        assert_eq!(pipeline.on_unparseable, UnparseablePolicy::FallbackRecord);
    }

    #[test]
    fn rejects_api_key_in_file() {
        assert!(FileConfig::parse("[model]\napi_key = \"secret\"\n").is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(FileConfig::parse("[pipeline]\non_unparseable = \"retry\"\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("kvsheet_cli_missing_config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            FileConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn loads_explicit_file() {
        let path = std::env::temp_dir().join("kvsheet_cli_explicit_config.toml");
        std::fs::write(&path, "[model]\nmodel = \"gpt-4o-mini\"\n").unwrap();

        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model.model.as_deref(), Some("gpt-4o-mini"));

        let _ = std::fs::remove_file(&path);
    }
}
