//! Dry run: extract and chunk a PDF without calling the model.

use std::path::Path;

use kvsheet_chunk::split_chunks;
use kvsheet_pdf::ExtractedText;

/// Counts reported by `kvsheet inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inspection {
    /// Pages in the PDF.
    pub pages: usize,
    /// Pages with no extractable text.
    pub blank_pages: usize,
    /// Characters of extracted text.
    pub characters: usize,
    /// Chunks the text would be split into.
    pub chunks: usize,
    /// Length of the longest chunk, in characters.
    pub longest_chunk: usize,
}

/// Chunks already-extracted text and tallies the result.
///
/// # Errors
///
/// Returns [`kvsheet_chunk::ChunkError`] if `chunk_limit` is zero.
pub fn inspect_text(
    document: &ExtractedText,
    chunk_limit: usize,
) -> Result<Inspection, kvsheet_chunk::ChunkError> {
    let chunks = split_chunks(&document.text, chunk_limit)?;

    Ok(Inspection {
        pages: document.page_count,
        blank_pages: document.blank_pages,
        characters: document.text.chars().count(),
        chunks: chunks.len(),
        longest_chunk: chunks.iter().map(|c| c.chars().count()).max().unwrap_or(0),
    })
}

/// Reads the PDF at `input` and prints what a run over it would look like.
///
/// # Errors
///
/// Returns an error if the PDF cannot be read or `chunk_limit` is zero.
pub fn run(input: &Path, chunk_limit: usize) -> Result<(), Box<dyn std::error::Error>> {
    let document = kvsheet_pdf::extract_text_from_path(input)?;
    let inspection = inspect_text(&document, chunk_limit)?;

    println!("{}", input.display());
    println!("{:<16} {}", "Pages", inspection.pages);
    println!("{:<16} {}", "Blank pages", inspection.blank_pages);
    println!("{:<16} {}", "Characters", inspection.characters);
    println!("{:<16} {}", "Chunk limit", chunk_limit);
    println!("{:<16} {}", "Chunks", inspection.chunks);
    println!("{:<16} {}", "Longest chunk", inspection.longest_chunk);

    if inspection.chunks == 0 {
        println!();
        println!("No extractable text; a run would make no model calls.");
    }

    Ok(())
}
