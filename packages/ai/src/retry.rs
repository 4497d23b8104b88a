//! HTTP retry helper for model calls.
//!
//! Providers send every request through [`send`]. With `max_retries == 0`
//! (the default) this is exactly one attempt; raising it retries connection
//! failures, timeouts, HTTP 429 and HTTP 5xx with exponential backoff
//! (2s, 4s, 8s, ...). Other statuses are handed back untouched so the
//! provider can report the API's own error message.

use std::time::Duration;

use crate::AiError;

/// Sends the request built by `build_request`, retrying transient failures
/// up to `max_retries` times.
///
/// The closure is called once per attempt because a
/// [`reqwest::RequestBuilder`] is consumed by `send()`.
///
/// Once retries are exhausted on a 429 or 5xx, that last response is
/// returned as-is.
///
/// # Errors
///
/// Returns [`AiError::Http`] if the request cannot be sent and the error is
/// not transient, or retries are exhausted.
pub async fn send<F>(build_request: F, max_retries: u32) -> Result<reqwest::Response, AiError>
where
    F: Fn() -> reqwest::RequestBuilder + Send + Sync,
{
    let mut attempt = 0u32;

    loop {
        if attempt > 0 {
            let delay = backoff_delay(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let can_retry = attempt < max_retries;
        attempt += 1;

        match build_request().send().await {
            Err(e) => {
                if can_retry && is_transient(&e) {
                    log::warn!("  transient error: {e}");
                    continue;
                }
                return Err(AiError::Http(e));
            }
            Ok(response) => {
                let status = response.status();
                if can_retry && is_retryable_status(status) {
                    log::warn!("  HTTP {status}");
                    continue;
                }
                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based).
#[must_use]
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(6))
}

/// Returns `true` for statuses worth retrying: 429 and any 5xx.
#[must_use]
pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
