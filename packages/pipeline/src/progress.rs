//! Per-chunk progress for extraction runs.
//!
//! [`ExtractionPipeline`](crate::ExtractionPipeline) calls
//! [`ProgressCallback::set_total`] once the text is chunked, then sets a
//! "Processing chunk i/n..." message and increments by one for every model
//! call. The CLI renders this with `indicatif`; batch mode prints the
//! messages and tests use [`NullProgress`].

use std::sync::Arc;

/// Receives chunk counts and status messages from a run.
///
/// Shared as `Arc<dyn ProgressCallback>`, hence `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of chunks the run will send to the model.
    fn set_total(&self, total: u64);

    /// `delta` more chunks have been answered.
    fn inc(&self, delta: u64);

    /// Current step, e.g. "Processing chunk 2/5...".
    fn set_message(&self, msg: String);

    /// The run finished; `msg` summarizes the record count.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// [`NullProgress`] behind an `Arc`, ready to pass to a run.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
