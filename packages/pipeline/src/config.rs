//! Pipeline configuration.

use kvsheet_ai::PromptStyle;
use kvsheet_chunk::{DEFAULT_BATCH_CHUNK_LIMIT, DEFAULT_INTERACTIVE_CHUNK_LIMIT};
use kvsheet_record::UnparseablePolicy;
use serde::Deserialize;

/// How a run chunks text, prompts the model and treats bad replies.
///
/// Deserializes from a table where every key is optional; missing keys take
/// their [`PipelineConfig::batch`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum characters per chunk.
    pub chunk_limit: usize,
    /// What to do with replies that contain no parseable JSON array.
    pub on_unparseable: UnparseablePolicy,
    /// Instruction template wrapped around each chunk.
    pub prompt_style: PromptStyle,
}

impl PipelineConfig {
    /// Defaults for batch runs: 6000-character chunks, unparseable replies
    /// kept as `raw_text` rows, detailed prompt.
    #[must_use]
    pub const fn batch() -> Self {
        Self {
            chunk_limit: DEFAULT_BATCH_CHUNK_LIMIT,
            on_unparseable: UnparseablePolicy::FallbackRecord,
            prompt_style: PromptStyle::Detailed,
        }
    }

    /// Defaults for interactive runs: 5000-character chunks, unparseable
    /// replies dropped, concise prompt.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            chunk_limit: DEFAULT_INTERACTIVE_CHUNK_LIMIT,
            on_unparseable: UnparseablePolicy::Skip,
            prompt_style: PromptStyle::Concise,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::batch()
    }
}

/// Optional overrides for a [`PipelineConfig`], as read from a config file
/// `[pipeline]` table or command-line flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// Maximum characters per chunk.
    pub chunk_limit: Option<usize>,
    /// Unparseable reply policy.
    pub on_unparseable: Option<UnparseablePolicy>,
    /// Prompt template.
    pub prompt_style: Option<PromptStyle>,
}

impl PipelineSettings {
    /// Returns `self` with every unset field taken from `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            chunk_limit: self.chunk_limit.or(fallback.chunk_limit),
            on_unparseable: self.on_unparseable.or(fallback.on_unparseable),
            prompt_style: self.prompt_style.or(fallback.prompt_style),
        }
    }

    /// Applies the set fields on top of `base`.
    #[must_use]
    pub fn apply(self, base: PipelineConfig) -> PipelineConfig {
        PipelineConfig {
            chunk_limit: self.chunk_limit.unwrap_or(base.chunk_limit),
            on_unparseable: self.on_unparseable.unwrap_or(base.on_unparseable),
            prompt_style: self.prompt_style.unwrap_or(base.prompt_style),
        }
    }
}
