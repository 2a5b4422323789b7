//! Retries with exponential backoff for remote translation calls.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, first one included. Must be at least 1.
    pub max_attempts: u32,
    /// Wait before the second attempt.
    pub initial_delay: Duration,
    /// Cap on any single wait.
    pub max_delay: Duration,
    /// Growth factor applied to the wait after each failed retry.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// One quick retry. A user is waiting on the rendered label.
    pub fn translation() -> Self {
        Self::new(2, Duration::from_millis(250)).with_max_delay(Duration::from_secs(1))
    }

    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait before retry number `retry` (1 for the second attempt).
    fn backoff(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(factor).min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::translation()
    }
}

/// Run `operation` until it succeeds, fails with an error `is_transient`
/// rejects, or `config.max_attempts` is used up. Returns the last error.
///
/// # Panics
/// Panics if `config.max_attempts` is 0
pub async fn with_retry_if<T, E, F, Fut, P>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
    is_transient: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    assert!(
        config.max_attempts >= 1,
        "RetryConfig.max_attempts must be >= 1, got {}",
        config.max_attempts
    );

    let mut attempt = 1;
    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "Recovered after retry");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !is_transient(&error) {
            debug!(operation = operation_name, "Permanent failure: {}", error);
            return Err(error);
        }
        if attempt >= config.max_attempts {
            warn!(
                operation = operation_name,
                attempts = attempt,
                "Giving up: {}",
                error
            );
            return Err(error);
        }

        let wait = config.backoff(attempt);
        warn!(
            operation = operation_name,
            attempt,
            max_attempts = config.max_attempts,
            "Transient failure ({}), retrying in {:?}",
            error,
            wait
        );
        sleep(wait).await;
        attempt += 1;
    }
}
