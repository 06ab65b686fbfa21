//! Retry with exponential backoff for backend HTTP transports

use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::Error;

/// Failure of a single attempt, tagged with whether another try makes sense
#[derive(Debug)]
pub struct AttemptError {
    pub error: Error,
    pub retryable: bool,
}

impl AttemptError {
    pub fn transient(error: Error) -> Self {
        Self { error, retryable: true }
    }

    pub fn permanent(error: Error) -> Self {
        Self { error, retryable: false }
    }

    /// Classify a reqwest send error. Timeouts and connect failures are worth retrying.
    pub fn from_send(err: reqwest::Error, wrap: impl FnOnce(String) -> Error) -> Self {
        let retryable = err.is_timeout() || err.is_connect();
        Self {
            error: wrap(format!("request failed: {}", err)),
            retryable,
        }
    }
}

/// Whether an HTTP status should be retried
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Turn a non-success response into an attempt error
pub async fn check_status(
    response: Response,
    wrap: impl FnOnce(String) -> Error,
) -> std::result::Result<Response, AttemptError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = wrap(format!("HTTP {} - {}", status, body));
    if is_retryable_status(status) {
        Err(AttemptError::transient(error))
    } else {
        Err(AttemptError::permanent(error))
    }
}

/// Retry policy shared by the HTTP backends
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `operation` until it succeeds, fails permanently, or retries run out
    pub async fn run<F, Fut, T>(&self, label: &str, operation: F) -> crate::error::Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = std::result::Result<T, AttemptError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.retryable && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}: {}",
                        label,
                        attempt + 1,
                        self.max_retries + 1,
                        delay,
                        e.error
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.error),
            }
        }
    }
}
