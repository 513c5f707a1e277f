// ABOUTME: Retry policy with exponential backoff, multiplicative jitter, and pluggable classification
// ABOUTME: Also hosts the degraded-content rule that turns canned 200 bodies into retryable errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Retry
//!
//! [`retry_with`] runs an async operation up to `max_retries + 1` times. After failed
//! attempt `i` (0-indexed) it sleeps
//! `min(base_delay * 2^i * uniform(0.5, 1.0), max_delay)` before the next attempt.
//! The last error is returned once attempts are exhausted or `should_retry` says no.
//!
//! [`retry`] is the common case for backend calls: it classifies with
//! [`ApiError::is_retryable`] and logs every retry and the terminal failure.

use pierre_coach_core::{ApiError, ApiResult};
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backoff parameters for a retried operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay ceiling for the first retry; doubles per attempt
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
        }
    }
}

impl RetryPolicy {
    /// Policy with the default 10s delay cap
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay: Duration::from_millis(10_000),
        }
    }

    /// Override the delay cap
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Non-streaming chat: 2 retries from 750ms
    #[must_use]
    pub const fn chat() -> Self {
        Self::new(2, Duration::from_millis(750))
    }

    /// Dashboard load: 3 retries from 1s
    #[must_use]
    pub const fn dashboard() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }

    /// AI insight generation: 2 retries from 1.5s
    #[must_use]
    pub const fn insights() -> Self {
        Self::new(2, Duration::from_millis(1500))
    }

    /// Total attempts including the first
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after failed attempt `attempt` for a given jitter factor
    ///
    /// `jitter` is clamped to `[0.5, 1.0]`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32, jitter: f64) -> Duration {
        let ceiling = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(attempt))
            .min(self.max_delay.saturating_mul(2));
        ceiling.mul_f64(jitter.clamp(0.5, 1.0)).min(self.max_delay)
    }

    /// Delay after failed attempt `attempt` with random jitter
    #[must_use]
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.5..=1.0);
        self.delay_for_attempt(attempt, jitter)
    }
}

/// A failed attempt that is about to be retried
#[derive(Debug)]
pub struct RetryAttempt<'a, E> {
    /// Index of the attempt that failed, starting at 0
    pub attempt_index: u32,
    /// Error returned by that attempt
    pub error: &'a E,
    /// Sleep before the next attempt
    pub delay: Duration,
}

/// Status-code retry rule: no status (network failure), 408, 429 and 5xx are retryable
#[must_use]
pub fn should_retry_status(status: Option<u16>) -> bool {
    match status {
        None => true,
        Some(code) => matches!(code, 408 | 429 | 500..=599),
    }
}

/// Run `operation` under `policy`, consulting `should_retry` after each failure
///
/// `on_retry` is invoked before every backoff sleep.
///
/// # Errors
///
/// Returns the last error once `should_retry` rejects it or attempts are exhausted.
pub async fn retry_with<T, E, F, Fut, S, R>(
    policy: &RetryPolicy,
    should_retry: S,
    mut on_retry: R,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: Fn(&E) -> bool,
    R: FnMut(&RetryAttempt<'_, E>),
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(error) => {
                if attempt >= policy.max_retries || !should_retry(&error) {
                    return Err(error);
                }

                let delay = policy.jittered_delay(attempt);
                on_retry(&RetryAttempt {
                    attempt_index: attempt,
                    error: &error,
                    delay,
                });
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Retry a backend call, classifying failures by the error taxonomy
///
/// `operation_name` is used as a structured log field.
///
/// # Errors
///
/// Returns the last [`ApiError`] after it is logged with its classification.
pub async fn retry<T, F, Fut>(
    operation_name: &'static str,
    policy: &RetryPolicy,
    operation: F,
) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let result = retry_with(
        policy,
        ApiError::is_retryable,
        |attempt: &RetryAttempt<'_, ApiError>| {
            warn!(
                operation = operation_name,
                attempt = attempt.attempt_index + 1,
                max_attempts = policy.max_attempts(),
                error_class = %attempt.error.class(),
                delay_ms = attempt.delay.as_millis() as u64,
                error = %attempt.error,
                "Retryable failure, backing off"
            );
        },
        operation,
    )
    .await;

    if let Err(e) = &result {
        warn!(
            operation = operation_name,
            error_class = %e.class(),
            retryable = e.is_retryable(),
            error = %e,
            "Operation failed"
        );
    }
    result
}

/// Apply the degraded-content rule to a successful response body
///
/// A body equal (ignoring surrounding whitespace) to one of `sentinels` is turned into
/// a retryable [`ApiError::DegradedContent`].
///
/// # Errors
///
/// Returns [`ApiError::DegradedContent`] when the body matches a sentinel.
pub fn reject_degraded<S: AsRef<str>>(body: String, sentinels: &[S]) -> ApiResult<String> {
    let trimmed = body.trim();
    if sentinels.iter().any(|s| s.as_ref().trim() == trimmed) {
        return Err(ApiError::DegradedContent { body });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_bounds_follow_jitter() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for_attempt(0, 0.5),
            Duration::from_millis(500)
        );
        assert_eq!(
            policy.delay_for_attempt(2, 1.0),
            Duration::from_millis(4000)
        );
        // Out-of-range jitter is clamped
        assert_eq!(
            policy.delay_for_attempt(1, 0.0),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_delay_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(6, 1.0), policy.max_delay);
        assert_eq!(policy.delay_for_attempt(31, 0.5), policy.max_delay);
        assert_eq!(policy.delay_for_attempt(u32::MAX, 0.75), policy.max_delay);
    }

    #[test]
    fn test_should_retry_status() {
        assert!(should_retry_status(None));
        assert!(should_retry_status(Some(408)));
        assert!(should_retry_status(Some(429)));
        assert!(should_retry_status(Some(500)));
        assert!(should_retry_status(Some(504)));
        assert!(!should_retry_status(Some(400)));
        assert!(!should_retry_status(Some(404)));
    }

    #[test]
    fn test_reject_degraded_matches_trimmed_body() {
        let sentinels = ["Service temporarily unavailable"];
        assert!(matches!(
            reject_degraded("  Service temporarily unavailable\n".to_owned(), &sentinels),
            Err(ApiError::DegradedContent { .. })
        ));
        assert_eq!(
            reject_degraded("Run easy today".to_owned(), &sentinels),
            Ok("Run easy today".to_owned())
        );
    }
}
