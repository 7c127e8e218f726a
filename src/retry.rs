//! Bounded retry with a fixed delay between attempts
//!
//! Wraps a single upstream call so transient failures (rate limiting, a node
//! dropping the connection) are retried a few times before surfacing.

use log::{debug, error, info, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts per fetch
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait between attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Runs `operation` until it succeeds or `max_retries` attempts have failed
///
/// Attempts run strictly one after another with a constant `delay` between
/// them. On exhaustion the error from the final attempt is returned; earlier
/// errors are dropped. A `max_retries` of zero is treated as one.
///
/// # Arguments
/// * `operation` - Produces a fresh future for each attempt
/// * `max_retries` - Total number of attempts, including the first
/// * `delay` - Wait between a failed attempt and the next one
pub async fn fetch_with_retry<T, E, F, Fut>(
    operation: F,
    max_retries: u32,
    delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryPolicy::new(max_retries, delay)
        .run("fetch", operation)
        .await
}

/// Attempt count and delay for a retrying fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: u32,
    /// Constant wait between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy, clamping `max_retries` to at least one attempt
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            delay,
        }
    }

    /// Runs `operation` under this policy, logging failed attempts under `label`
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_retries = self.max_retries.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("[{}] Succeeded on attempt {}/{}", label, attempt, max_retries);
                    }
                    return Ok(value);
                }
                Err(e) if attempt >= max_retries => {
                    error!("[{}] Attempt {} failed, giving up: {}", label, attempt, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("[{}] Attempt {} failed: {}", label, attempt, e);
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                    info!("[{}] Retrying... ({} out of {})", label, attempt, max_retries);
                }
            }
        }
    }
}
