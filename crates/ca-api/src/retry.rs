//! Bounded exponential-backoff retry for upstream GETs.
//!
//! Retries cover transient upstream trouble only: rate limiting, 5xx, and
//! transport faults. This is a different mechanism from the classifier's
//! inter-batch pause, which is unconditional rate-limit avoidance rather
//! than error recovery.

use std::time::Duration;

use rand::Rng;

use crate::ApiError;

/// Statuses worth retrying: rate limit and transient server errors.
fn is_retryable(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Backoff schedule for a single GET.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt budget, first request included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
    /// Add uniform [0, 1)s of jitter to each delay. On in production to
    /// avoid thundering-herd retries; off under test for a deterministic
    /// schedule.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Delay after the given zero-based attempt: `base * 2^attempt`, plus
    /// jitter when enabled.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.min(30)).unwrap_or(30);
        let mut secs = self.base_delay.as_secs_f64() * 2_f64.powi(exponent);
        if self.jitter {
            secs += rand::thread_rng().r#gen::<f64>();
        }
        Duration::from_secs_f64(secs)
    }
}

/// Issues a GET, retrying transient failures within the policy's budget.
///
/// Returns the response immediately on 200. Any other definitive status is
/// returned as-is for the caller to interpret. A transport fault on the
/// final attempt propagates; a budget spent entirely on retryable statuses
/// yields [`ApiError::RetriesExhausted`].
pub(crate) async fn fetch_with_retry(
    http: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, ApiError> {
    for attempt in 0..policy.max_attempts {
        match http.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status == reqwest::StatusCode::OK {
                    return Ok(response);
                }
                if !is_retryable(status) {
                    return Ok(response);
                }
                let delay = policy.delay(attempt);
                tracing::warn!(
                    url,
                    %status,
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    "transient upstream status, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                if attempt + 1 >= policy.max_attempts {
                    return Err(ApiError::Request(err));
                }
                let delay = policy.delay(attempt);
                tracing::warn!(
                    url,
                    error = %err,
                    attempt,
                    delay_secs = delay.as_secs_f64(),
                    "request error, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    Err(ApiError::RetriesExhausted {
        url: url.to_string(),
        attempts: policy.max_attempts,
    })
}
