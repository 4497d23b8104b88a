#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF-to-records extraction pipeline.
//!
//! Chains text extraction -> chunking -> one model call per chunk ->
//! lenient reply parsing -> two-stage deduplication. Chunks are processed
//! strictly one after another; records accumulate in chunk order and are
//! deduplicated once at the end.
//!
//! A failed model call aborts the whole run and nothing is returned for
//! chunks that already succeeded. A reply that cannot be parsed is not an
//! error: it is routed through the configured
//! [`kvsheet_record::UnparseablePolicy`].

pub mod config;
pub mod progress;

use std::path::Path;
use std::sync::Arc;

use kvsheet_ai::{AiError, LlmProvider, build_prompt};
use kvsheet_chunk::{ChunkError, split_chunks};
use kvsheet_pdf::{ExtractedText, PdfError};
use kvsheet_record::{Deduplicated, Record, deduplicate, records_from_response};

pub use config::{PipelineConfig, PipelineSettings};
pub use progress::{NullProgress, ProgressCallback, null_progress};

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The PDF could not be read.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// The text could not be chunked.
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// A model call failed.
    #[error(transparent)]
    Ai(#[from] AiError),
}

/// Counters from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Pages in the source PDF, when the run started from a PDF.
    pub pages: Option<usize>,
    /// Chunks sent to the model.
    pub chunks: usize,
    /// Replies that could not be parsed.
    pub unparseable_chunks: usize,
    /// Records collected before deduplication.
    pub raw_records: usize,
    /// Records left after the exact-triple pass.
    pub after_exact_dedup: usize,
    /// Records left after the context pass.
    pub final_records: usize,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Deduplicated records in first-seen order.
    pub records: Vec<Record>,
    /// Run counters.
    pub stats: PipelineStats,
}

/// Sequential extraction pipeline bound to one model provider.
pub struct ExtractionPipeline {
    provider: Box<dyn LlmProvider>,
    config: PipelineConfig,
}

impl ExtractionPipeline {
    /// Creates a pipeline that sends prompts to `provider`.
    #[must_use]
    pub fn new(provider: Box<dyn LlmProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    /// The configuration this pipeline runs with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Reads the PDF at `path` and runs the pipeline over its text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the PDF cannot be read or any model
    /// call fails.
    pub async fn run_pdf_path(
        &self,
        path: impl AsRef<Path> + Send,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<PipelineOutput, PipelineError> {
        let path = path.as_ref();
        log::info!("Reading PDF {}...", path.display());
        let document = kvsheet_pdf::extract_text_from_path(path)?;
        self.run_document(document, progress).await
    }

    /// Runs the pipeline over an in-memory PDF.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the PDF cannot be read or any model
    /// call fails.
    pub async fn run_pdf_bytes(
        &self,
        bytes: &[u8],
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<PipelineOutput, PipelineError> {
        let document = kvsheet_pdf::extract_text_from_mem(bytes)?;
        self.run_document(document, progress).await
    }

    async fn run_document(
        &self,
        document: ExtractedText,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<PipelineOutput, PipelineError> {
        log::info!(
            "Extracted {} characters from {} page(s)",
            document.text.chars().count(),
            document.page_count
        );
        if document.text.trim().is_empty() {
            log::warn!("PDF has no extractable text");
        }

        let mut output = self.run_text(&document.text, progress).await?;
        output.stats.pages = Some(document.page_count);
        Ok(output)
    }

    /// Runs the pipeline over already-extracted text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the chunk limit is invalid or any model
    /// call fails.
    pub async fn run_text(
        &self,
        text: &str,
        progress: &Arc<dyn ProgressCallback>,
    ) -> Result<PipelineOutput, PipelineError> {
        let chunks = split_chunks(text, self.config.chunk_limit)?;
        let total = chunks.len();

        log::info!(
            "Split text into {total} chunk(s) of at most {} characters",
            self.config.chunk_limit
        );
        progress.set_total(u64::try_from(total).unwrap_or(u64::MAX));

        let mut records = Vec::new();
        let mut unparseable_chunks = 0usize;

        for (i, chunk) in chunks.iter().enumerate() {
            let n = i + 1;
            log::debug!("Processing chunk {n}/{total} ({} chars)", chunk.chars().count());
            progress.set_message(format!("Processing chunk {n}/{total}..."));

            let prompt = build_prompt(self.config.prompt_style, chunk);
            let reply = self.provider.generate(&prompt).await?;

            let parsed = records_from_response(&reply, self.config.on_unparseable);
            if parsed.unparseable {
                unparseable_chunks += 1;
            }
            log::debug!("Chunk {n}/{total} yielded {} record(s)", parsed.records.len());

            records.extend(parsed.records);
            progress.inc(1);
        }

        let raw_records = records.len();
        let Deduplicated {
            records,
            after_exact: after_exact_dedup,
        } = deduplicate(records);

        let stats = PipelineStats {
            pages: None,
            chunks: total,
            unparseable_chunks,
            raw_records,
            after_exact_dedup,
            final_records: records.len(),
        };

        log::info!(
            "Collected {raw_records} record(s), {after_exact_dedup} after exact dedup, {} after context dedup",
            stats.final_records
        );
        if unparseable_chunks > 0 {
            log::warn!(
                "{unparseable_chunks} of {total} chunk(s) returned unparseable replies ({} policy)",
                self.config.on_unparseable
            );
        }
        progress.finish(format!("{} records from {total} chunk(s)", stats.final_records));

        Ok(PipelineOutput { records, stats })
    }
}
