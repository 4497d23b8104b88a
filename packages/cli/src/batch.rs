//! Non-interactive extraction: one PDF in, one workbook out.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use kvsheet_ai::{ModelConfig, ModelSettings, PromptStyle, ProviderKind, create_provider};
use kvsheet_pipeline::{ExtractionPipeline, PipelineConfig, PipelineSettings, ProgressCallback};
use kvsheet_record::UnparseablePolicy;

use crate::config::FileConfig;

/// PDF read when `--input` is not given.
pub const DEFAULT_INPUT: &str = "data/Data Input.pdf";

/// Workbook written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "Output.xlsx";

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// PDF to read
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    /// Workbook to write
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
    /// Maximum characters per chunk sent to the model (default: 6000)
    #[arg(long)]
    pub chunk_limit: Option<usize>,
    /// What to do with a reply that has no JSON list: `fallback_record`
    /// (default) or `skip`
    #[arg(long)]
    pub on_unparseable: Option<UnparseablePolicy>,
    /// Prompt template: `detailed` (default) or `concise`
    #[arg(long)]
    pub prompt: Option<PromptStyle>,
    /// Model provider: `gemini`, `openai` or `anthropic` (overrides `AI_PROVIDER`)
    #[arg(long)]
    pub provider: Option<ProviderKind>,
    /// Model identifier (overrides `AI_MODEL`)
    #[arg(long)]
    pub model: Option<String>,
    /// Per-request timeout in seconds (overrides `AI_TIMEOUT_SECS`)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
    /// Retries for rate limits and server errors (overrides `AI_MAX_RETRIES`)
    #[arg(long)]
    pub max_retries: Option<u32>,
}

impl ExtractArgs {
    fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            chunk_limit: self.chunk_limit,
            on_unparseable: self.on_unparseable,
            prompt_style: self.prompt,
        }
    }

    fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            provider: self.provider,
            model: self.model.clone(),
            base_url: None,
            timeout_secs: self.timeout_secs,
            max_tokens: None,
            max_retries: self.max_retries,
        }
    }

    /// Flags first, then the config file, then the batch presets.
    #[must_use]
    pub fn pipeline_config(&self, file: &FileConfig) -> PipelineConfig {
        self.pipeline_settings()
            .or(file.pipeline)
            .apply(PipelineConfig::batch())
    }

    /// Flags first, then the config file. Gaps are filled from the
    /// environment by [`ModelConfig::from_env`].
    #[must_use]
    pub fn merged_model_settings(&self, file: &FileConfig) -> ModelSettings {
        self.model_settings().or(file.model.clone())
    }
}

/// Prints each progress message on its own line.
struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}

    fn set_message(&self, msg: String) {
        println!("{msg}");
    }

    fn finish(&self, msg: String) {
        log::info!("{msg}");
    }
}

/// Runs a batch extraction.
///
/// The model configuration is resolved before the PDF is opened, so a
/// missing API key fails fast.
///
/// # Errors
///
/// Returns an error if the model configuration is incomplete, the PDF cannot
/// be read, any model call fails, or the workbook cannot be written.
pub async fn run(
    args: &ExtractArgs,
    file: &FileConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = ModelConfig::from_env(args.merged_model_settings(file))?;
    let provider = create_provider(&model)?;
    let pipeline = ExtractionPipeline::new(provider, args.pipeline_config(file));

    println!("Reading PDF...");
    let document = kvsheet_pdf::extract_text_from_path(&args.input)?;
    log::debug!("{} page(s), {} blank", document.page_count, document.blank_pages);

    println!("Splitting text into chunks...");
    let progress: Arc<dyn ProgressCallback> = Arc::new(ConsoleProgress);
    let output = pipeline.run_text(&document.text, &progress).await?;

    println!("Saving to Excel...");
    kvsheet_sheet::write_xlsx(&output.records, &args.output)?;

    println!("Excel Generated: {}", args.output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ExtractArgs,
    }

    fn parse(flags: &[&str]) -> ExtractArgs {
        Harness::try_parse_from(std::iter::once("extract").chain(flags.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn defaults_match_batch_preset() {
        let args = parse(&[]);
        assert_eq!(args.input, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(args.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(args.pipeline_config(&FileConfig::default()), PipelineConfig::batch());
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig::parse(
            r#"
            [pipeline]
            chunk_limit = 800
            on_unparseable = "fallback_record"

            [model]
            model = "from-file"
            max_retries = 1
            "#,
        )
        .unwrap();
        let args = parse(&["--on-unparseable", "skip", "--model", "from-flag"]);

        let pipeline = args.pipeline_config(&file);
        assert_eq!(pipeline.chunk_limit, 800);
        assert_eq!(pipeline.on_unparseable, UnparseablePolicy::Skip);
        assert_eq!(pipeline.prompt_style, PromptStyle::Detailed);

        let model = args.merged_model_settings(&file);
        assert_eq!(model.model.as_deref(), Some("from-flag"));
        assert_eq!(model.max_retries, Some(1));
    }

    #[test]
    fn parses_enum_flags() {
        let args = parse(&["--provider", "Claude", "--prompt", "concise", "--chunk-limit", "11"]);
        assert_eq!(args.provider, Some(ProviderKind::Anthropic));
        assert_eq!(args.prompt, Some(PromptStyle::Concise));
        assert_eq!(args.chunk_limit, Some(11));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Harness::try_parse_from(["extract", "--on-unparseable", "retry"]).is_err());
    }
}
