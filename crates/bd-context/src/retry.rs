use crate::{ContextError, ContextResult};

use bd_config::RetryConfig;
use bd_core::DirectoryResult;

use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;

/// Bounded retry with exponential backoff for directory calls.
///
/// Every attempt is capped by `request_timeout`; a timed-out attempt counts as
/// a transient failure. Non-transient errors end the loop immediately.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f64,
    jitter: bool,
    request_timeout: Duration,
}

impl RetryPolicy {
    pub fn new(config: &RetryConfig, request_timeout: Duration) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: config.initial_delay(),
            max_delay: config.max_delay(),
            backoff_multiplier: config.backoff_multiplier,
            jitter: config.jitter,
            request_timeout,
        }
    }

    /// Retry without waiting between attempts.
    pub fn immediate(max_attempts: u32, request_timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
            request_timeout,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the given (1-based) failed attempt.
    ///
    /// With jitter the delay is drawn from the upper half of the backoff window.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let base_ms = self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped_ms = base_ms.min(self.max_delay.as_millis() as f64).max(0.0) as u64;

        if self.jitter && capped_ms >= 2 {
            let floor = capped_ms / 2;
            Duration::from_millis(rand::rng().random_range(floor..=capped_ms))
        } else {
            Duration::from_millis(capped_ms)
        }
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> ContextResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DirectoryResult<T>>,
    {
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            match tokio::time::timeout(self.request_timeout, call()).await {
                Ok(Ok(value)) => {
                    if attempt > 1 {
                        info!("{} succeeded after {} attempts", operation, attempt);
                    }
                    return Ok(value);
                }
                Ok(Err(e)) if !e.is_transient() => {
                    return Err(ContextError::directory_rejected(operation, e));
                }
                Ok(Err(e)) => {
                    warn!(
                        "{} failed (attempt {}/{}): {}",
                        operation, attempt, self.max_attempts, e
                    );
                    last_error = e.to_string();
                }
                Err(_) => {
                    warn!(
                        "{} timed out after {:?} (attempt {}/{})",
                        operation, self.request_timeout, attempt, self.max_attempts
                    );
                    last_error = format!("timed out after {:?}", self.request_timeout);
                }
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.delay_for(attempt)).await;
            }
        }

        Err(ContextError::directory_unavailable(
            operation,
            self.max_attempts,
            last_error,
        ))
    }
}
