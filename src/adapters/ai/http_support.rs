//! Shared plumbing for the HTTP model providers: retry with backoff and
//! status code mapping.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::AIError;

/// Retry settings for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Doubled after every failed attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Runs `attempt` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, AIError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AIError>>,
    {
        let mut retry_count = 0;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() || retry_count >= self.max_retries => {
                    return Err(err)
                }
                Err(err) => {
                    tracing::warn!(error = %err, attempt = retry_count + 1, "retrying model request");
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(self.base_delay * (1u32 << retry_count.min(6))).await;
            retry_count += 1;
        }
    }
}

/// Maps a non-success HTTP status to an error.
pub fn status_error(status: reqwest::StatusCode, body: String) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(&body)),
        400 | 404 | 422 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Maps a transport failure to an error.
pub fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Finds a retry hint in a rate-limit body.
///
/// Understands Gemini's `"retryDelay": "7s"` and OpenAI's "try again in 7s";
/// defaults to 30 seconds.
fn parse_retry_after(body: &str) -> u32 {
    for marker in ["\"retryDelay\": \"", "\"retryDelay\":\"", "try again in "] {
        if let Some(idx) = body.find(marker) {
            let digits: String = body[idx + marker.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if let Ok(secs) = digits.parse() {
                return secs;
            }
        }
    }
    30
}
