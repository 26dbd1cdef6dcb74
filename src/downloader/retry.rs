//! Class-aware retry with exponential backoff
//!
//! Retry happens at the data level, above the fetcher: the fetcher makes
//! exactly one attempt per call, and [`RetryExecutor`] decides whether to
//! call it again. Each [`TransportError`] carries a [`RetryClass`] that
//! selects one of two schedules: a short one for transient transport
//! failures and a longer, jittered one for rate limiting.

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::downloader::config::{
    calculate_backoff, RATE_LIMIT_BASE_DELAY_MS, RATE_LIMIT_MAX_ATTEMPTS,
    RATE_LIMIT_MAX_BACKOFF_MS, TRANSPORT_BASE_DELAY_MS, TRANSPORT_MAX_ATTEMPTS,
    TRANSPORT_MAX_BACKOFF_MS,
};
use crate::fetcher::{RetryClass, TransportError};

/// Per-class retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    /// Total invocations allowed, including the first
    pub max_attempts: u32,
    /// Initial backoff in milliseconds
    pub base_delay_ms: u64,
    /// Backoff cap in milliseconds
    pub max_backoff_ms: u64,
}

/// Retry schedules for both error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Schedule for transient transport failures
    pub transport: RetrySchedule,
    /// Schedule after a rate-limit signal
    pub rate_limit: RetrySchedule,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            transport: RetrySchedule {
                max_attempts: TRANSPORT_MAX_ATTEMPTS,
                base_delay_ms: TRANSPORT_BASE_DELAY_MS,
                max_backoff_ms: TRANSPORT_MAX_BACKOFF_MS,
            },
            rate_limit: RetrySchedule {
                max_attempts: RATE_LIMIT_MAX_ATTEMPTS,
                base_delay_ms: RATE_LIMIT_BASE_DELAY_MS,
                max_backoff_ms: RATE_LIMIT_MAX_BACKOFF_MS,
            },
        }
    }
}

impl RetryPolicy {
    fn schedule_for(&self, class: RetryClass) -> RetrySchedule {
        match class {
            RetryClass::Transport => self.transport,
            RetryClass::RateLimit => self.rate_limit,
        }
    }
}

/// Drives a fallible async operation through its retry schedule.
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Executor with the given policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// The policy this executor runs with.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds or its schedule is exhausted.
    ///
    /// A single attempt counter spans both classes; the class of the most
    /// recent error selects which schedule's ceiling and delays apply. On
    /// exhaustion the final error is returned unchanged.
    pub async fn execute<F, Fut, T>(
        &self,
        label: &str,
        mut operation: F,
    ) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(operation = label, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let class = error.retry_class();
                    let schedule = self.policy.schedule_for(class);
                    attempt += 1;

                    if class == RetryClass::RateLimit {
                        metrics::counter!("trend_rate_limit_hits_total").increment(1);
                    }

                    if attempt >= schedule.max_attempts {
                        warn!(
                            operation = label,
                            attempts = attempt,
                            error = %error,
                            "giving up: {}",
                            error.suggestion()
                        );
                        return Err(error);
                    }

                    let delay = self.backoff_delay(class, schedule, attempt - 1);
                    warn!(
                        operation = label,
                        attempt,
                        max_attempts = schedule.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "{}, retrying",
                        error.description()
                    );
                    metrics::counter!("trend_fetch_retries_total").increment(1);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn backoff_delay(&self, class: RetryClass, schedule: RetrySchedule, attempt: u32) -> Duration {
        let delay = calculate_backoff(schedule.base_delay_ms, attempt, schedule.max_backoff_ms);
        match class {
            RetryClass::Transport => delay,
            // Jitter spreads simultaneous clients off the same reset
            // boundary after a shared 429.
            RetryClass::RateLimit => {
                delay + delay.mul_f64(rand::thread_rng().gen_range(0.0..0.5))
            }
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
