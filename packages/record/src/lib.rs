#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns raw model replies into [`Record`]s and deduplicates them.
//!
//! Model replies are free-form text that is *expected* to contain a JSON
//! array. [`response::parse_response`] locates and parses that array and
//! reports failure as a [`ResponseParseError`]; the caller's
//! [`UnparseablePolicy`] then decides whether a failed reply becomes a
//! single `raw_text` record or nothing at all.
//!
//! [`dedup::deduplicate`] runs the two-stage filter (exact triples, then
//! one record per context) over the accumulated records of a whole run.

pub mod dedup;
pub mod response;

pub use dedup::{Deduplicated, collapse_contexts, dedup_exact, deduplicate};
pub use kvsheet_record_models::{Record, UnparseablePolicy};
pub use response::{ResponseRecords, parse_response, records_from_response};

use thiserror::Error;

/// Why a model reply could not be turned into records.
#[derive(Debug, Error)]
pub enum ResponseParseError {
    /// The reply has no `[` ... `]` span to parse.
    #[error("reply contains no JSON array")]
    NoArray,

    /// The bracketed span is not a valid JSON array.
    #[error("invalid JSON array: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
