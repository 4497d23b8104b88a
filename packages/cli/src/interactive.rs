//! Interactive extraction flow.
//!
//! Prompts for the PDF, chunk size and unparseable-reply policy with
//! `dialoguer`, runs the pipeline behind an `indicatif` progress bar, shows
//! a preview of the extracted rows and offers to save the workbook.

use std::path::{Path, PathBuf};

use dialoguer::{Confirm, Input, Select};
use kvsheet_ai::{ModelConfig, create_provider};
use kvsheet_cli_utils::{IndicatifProgress, MultiProgress};
use kvsheet_pipeline::{ExtractionPipeline, PipelineConfig, PipelineStats};
use kvsheet_record::{Record, UnparseablePolicy};

use crate::batch::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::config::FileConfig;

/// Rows shown in the preview before the rest are summarized.
const PREVIEW_ROWS: usize = 20;

/// Preview column widths for `#`, `Key` and `Value`, matching the workbook.
const PREVIEW_WIDTHS: [usize; 3] = [4, 25, 35];

const PREVIEW_COMMENTS_WIDTH: usize = 60;

/// Runs the interactive flow.
///
/// # Errors
///
/// Returns an error if a prompt fails, the model configuration is
/// incomplete, the pipeline fails, or the workbook cannot be written.
pub async fn run(
    multi: &MultiProgress,
    file: &FileConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("PDF to Excel Key-Value Extractor");
    println!();

    let base = file.pipeline.apply(PipelineConfig::interactive());

    let input = Input::<String>::new()
        .with_prompt("PDF file")
        .default(DEFAULT_INPUT.to_string())
        .interact_text()?;
    let input = PathBuf::from(input.trim());
    require_file(&input)?;

    let chunk_limit = Input::<usize>::new()
        .with_prompt("Chunk size (characters)")
        .default(base.chunk_limit)
        .validate_with(|limit: &usize| -> Result<(), &'static str> {
            if *limit == 0 {
                Err("chunk size must be at least 1")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let labels: Vec<&str> = UnparseablePolicy::ALL.iter().map(|p| p.label()).collect();
    let default_policy = UnparseablePolicy::ALL
        .iter()
        .position(|p| *p == base.on_unparseable)
        .unwrap_or(0);
    let idx = Select::new()
        .with_prompt("When a model reply is not a JSON list")
        .items(&labels)
        .default(default_policy)
        .interact()?;

    let config = PipelineConfig {
        chunk_limit,
        on_unparseable: UnparseablePolicy::ALL[idx],
        ..base
    };

    let model = ModelConfig::from_env(file.model.clone())?;
    let pipeline = ExtractionPipeline::new(create_provider(&model)?, config);

    println!("Processing...");
    let progress = IndicatifProgress::chunks_bar(multi, "Reading PDF...");
    let output = pipeline.run_pdf_path(&input, &progress).await?;

    println!();
    println!("{}", status_line(&output.stats));
    println!();
    for line in preview_lines(&output.records) {
        println!("{line}");
    }
    println!();

    let save = Confirm::new()
        .with_prompt("Save the workbook?")
        .default(true)
        .interact()?;
    if !save {
        return Ok(());
    }

    let path = Input::<String>::new()
        .with_prompt("Save as")
        .default(DEFAULT_OUTPUT.to_string())
        .interact_text()?;
    let bytes = kvsheet_sheet::to_xlsx_bytes(&output.records)?;
    std::fs::write(path.trim(), bytes)?;

    println!("Excel Generated: {}", path.trim());

    Ok(())
}

/// Fails with [`std::io::ErrorKind::NotFound`] unless `path` is a file.
fn require_file(path: &Path) -> std::io::Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        ))
    }
}

fn status_line(stats: &PipelineStats) -> String {
    let mut line = format!(
        "Extraction complete: {} row(s) from {} chunk(s)",
        stats.final_records, stats.chunks
    );
    if let Some(pages) = stats.pages {
        line.push_str(&format!(", {pages} page(s)"));
    }
    if stats.raw_records != stats.final_records {
        line.push_str(&format!(
            ", {} duplicate(s) removed",
            stats.raw_records - stats.final_records
        ));
    }
    if stats.unparseable_chunks > 0 {
        line.push_str(&format!(
            ", {} unparseable repl{}",
            stats.unparseable_chunks,
            if stats.unparseable_chunks == 1 { "y" } else { "ies" }
        ));
    }
    line
}

/// Fits `text` into `width` characters, marking cut text with `...`.
fn fit(text: &str, width: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let kept: String = single_line.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

fn preview_lines(records: &[Record]) -> Vec<String> {
    if records.is_empty() {
        return vec!["No records extracted.".to_string()];
    }

    let [w_index, w_key, w_value] = PREVIEW_WIDTHS;
    let mut lines = vec![
        format!("{:<w_index$} {:<w_key$} {:<w_value$} Comments", "#", "Key", "Value"),
        "-".repeat(w_index + w_key + w_value + PREVIEW_COMMENTS_WIDTH + 3),
    ];

    for (i, record) in records.iter().take(PREVIEW_ROWS).enumerate() {
        lines.push(
            format!(
                "{:<w_index$} {:<w_key$} {:<w_value$} {}",
                i + 1,
                fit(record.key.as_deref().unwrap_or(""), w_key),
                fit(record.value.as_deref().unwrap_or(""), w_value),
                fit(record.context_or_empty(), PREVIEW_COMMENTS_WIDTH),
            )
            .trim_end()
            .to_string(),
        );
    }

    if records.len() > PREVIEW_ROWS {
        lines.push(format!("... {} more row(s)", records.len() - PREVIEW_ROWS));
    }

    lines
}
