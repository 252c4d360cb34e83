//! Exponential backoff with permanent-error classification
//!
//! The retry loop runs inside the caller's task: it sleeps between attempts and
//! gives up once the elapsed time budget would be exceeded.

use crate::config::RetryConfig;
use crate::error::{Result, TempoError};
use crate::logging::get_logger;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// What to do with a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Transient failure, try again after the current interval
    Retry,
    /// Failure that will not heal by itself, give up immediately
    Permanent,
}

/// Exponential backoff parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for BackoffPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        Self {
            initial_interval: Duration::from_millis(cfg.initial_interval_ms),
            multiplier: cfg.multiplier.max(1.0),
            max_interval: Duration::from_millis(cfg.max_interval_ms.max(cfg.initial_interval_ms)),
            max_elapsed: Duration::from_millis(cfg.max_elapsed_ms),
        }
    }
}

impl BackoffPolicy {
    /// Interval following `current`, capped at `max_interval`
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_interval)
    }

    /// Whether another attempt fits in the budget
    pub fn allows(&self, elapsed: Duration, next: Duration) -> bool {
        elapsed.saturating_add(next) <= self.max_elapsed
    }
}

/// Classification used for upstream calendar requests
///
/// HTTP 4xx/5xx answers and malformed-query failures are permanent; timeouts,
/// connection errors and undecodable bodies are retried.
pub fn classify_calendar_error(err: &TempoError) -> RetryDecision {
    CalendarErrorClassifier::default().classify(err)
}

/// Calendar error classification with an opt-in for retrying 5xx answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarErrorClassifier {
    pub retry_server_errors: bool,
}

impl CalendarErrorClassifier {
    pub fn classify(&self, err: &TempoError) -> RetryDecision {
        match err {
            TempoError::Status { status, .. } if (500..=599).contains(status) => {
                if self.retry_server_errors {
                    RetryDecision::Retry
                } else {
                    RetryDecision::Permanent
                }
            }
            TempoError::Status { status, .. } if (400..=499).contains(status) => {
                RetryDecision::Permanent
            }
            TempoError::Query { .. } => RetryDecision::Permanent,
            _ => RetryDecision::Retry,
        }
    }
}

/// Run `operation` until it succeeds, fails permanently, or the budget runs out
pub async fn retry<T, F, Fut, C>(policy: &BackoffPolicy, classify: C, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&TempoError) -> RetryDecision,
{
    let logger = get_logger("retry");
    let started = Instant::now();
    let mut interval = policy.initial_interval;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if classify(&err) == RetryDecision::Permanent {
            logger.debug(&format!("Attempt {} failed permanently: {}", attempt, err));
            return Err(err);
        }

        if !policy.allows(started.elapsed(), interval) {
            logger.warn(&format!(
                "Giving up after {} attempts in {:?}: {}",
                attempt,
                started.elapsed(),
                err
            ));
            return Err(err);
        }

        logger.warn(&format!(
            "Attempt {} failed, retrying in {:?}: {}",
            attempt, interval, err
        ));
        sleep(interval).await;
        interval = policy.next_interval(interval);
    }
}
