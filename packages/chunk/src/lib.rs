#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Splits document text into prompt-sized chunks.
//!
//! Text is first normalized (every whitespace run becomes one space, so
//! line and paragraph breaks are lost) and then greedily packed into
//! segments of at most `limit` characters, breaking only between words.
//! Lengths are counted in Unicode scalar values, not bytes.

use thiserror::Error;

/// Default chunk limit for batch extraction runs.
pub const DEFAULT_BATCH_CHUNK_LIMIT: usize = 6000;

/// Default chunk limit for interactive extraction runs.
pub const DEFAULT_INTERACTIVE_CHUNK_LIMIT: usize = 5000;

/// Errors from chunking.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// A chunk limit of zero can never hold any text.
    #[error("chunk limit must be at least 1 character")]
    ZeroLimit,
}

/// Collapses every run of whitespace into a single space and trims both
/// ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes `text` and wraps it into chunks of at most `limit`
/// characters.
///
/// Chunks break only at word boundaries. A single word longer than `limit`
/// is cut into `limit`-sized pieces, since no chunk may exceed the limit.
/// Whitespace-only input produces no chunks.
///
/// # Errors
///
/// Returns [`ChunkError::ZeroLimit`] if `limit` is zero.
pub fn split_chunks(text: &str, limit: usize) -> Result<Vec<String>, ChunkError> {
    if limit == 0 {
        return Err(ChunkError::ZeroLimit);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            log::debug!("Splitting {word_len}-character word across chunks of {limit}");

            let chars: Vec<char> = word.chars().collect();
            let mut pieces = chars.chunks(limit).map(|c| c.iter().collect::<String>());
            let mut last = pieces.next().unwrap_or_default();
            for piece in pieces {
                chunks.push(std::mem::replace(&mut last, piece));
            }
            current_len = last.chars().count();
            current = last;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}
