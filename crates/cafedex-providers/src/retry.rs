//! Bounded exponential backoff for transient provider failures.

use std::future::Future;
use std::time::Duration;

use cafedex_core::error::{CafedexError, Result};

/// HTTP status codes worth retrying: 429/529 are rate limits, 500/503
/// are transient server errors. Everything else with a status (400,
/// 401, 403, 404, ...) fails immediately.
const RETRYABLE_STATUSES: [u16; 4] = [429, 500, 503, 529];

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient: rate limit, server unavailable, or a status-less
    /// network-level error (timeout, reset, DNS).
    Retryable,
    Fatal,
}

/// Maps an error to retryable/fatal. Only provider errors are ever
/// retried; domain and IO errors always propagate.
pub fn classify(error: &CafedexError) -> ErrorClass {
    match error {
        CafedexError::Provider { status: Some(code), .. } => {
            if RETRYABLE_STATUSES.contains(code) {
                ErrorClass::Retryable
            } else {
                ErrorClass::Fatal
            }
        }
        CafedexError::Provider { status: None, .. } => ErrorClass::Retryable,
        _ => ErrorClass::Fatal,
    }
}

/// Reusable retry policy: up to `max_retries` additional attempts with
/// delay = base x 2^attempt between them.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 3, base_delay: Duration::from_millis(1000) }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    /// Backoff before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Runs `operation`, retrying transient failures with backoff.
    /// After `max_retries` retries the last error propagates; fatal
    /// errors propagate immediately.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_retries || classify(&error) == ErrorClass::Fatal {
                        return Err(error);
                    }

                    let delay = self.delay_for_attempt(attempt);
                    let label = match error.provider_status() {
                        Some(status) => format!("HTTP {status}"),
                        None => "Network error".to_string(),
                    };
                    tracing::warn!(
                        "{label}, retrying in {}ms (attempt {}/{})",
                        delay.as_millis(),
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Converts a reqwest failure into the domain provider error, keeping
/// the HTTP status when one exists.
pub fn provider_error(context: &str, error: reqwest::Error) -> CafedexError {
    CafedexError::Provider {
        status: error.status().map(|s| s.as_u16()),
        message: format!("{context}: {error}"),
    }
}

/// Builds the provider error for a non-success HTTP response body.
pub fn status_error(context: &str, status: u16, body: &str) -> CafedexError {
    CafedexError::Provider {
        status: Some(status),
        message: format!("{context} returned {status}: {body}"),
    }
}
