// ABOUTME: Integration tests for the retry policy and degraded-content classification
// ABOUTME: Uses a paused tokio clock so backoff sleeps complete instantly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_coach_client::retry::{
    reject_degraded, retry, retry_with, should_retry_status, RetryAttempt, RetryPolicy,
};
use pierre_coach_client::{ApiError, ErrorClass};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_non_retryable_error_invokes_once() {
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;
    let result: Result<(), ApiError> = retry_with(
        &RetryPolicy::default(),
        |_: &ApiError| false,
        |_: &RetryAttempt<'_, ApiError>| {},
        || async move {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::from_status(503, "down"))
        },
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_op_runs_max_retries_plus_one() {
    let policy = RetryPolicy::default();
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;
    let mut delays = Vec::new();

    let result: Result<(), ApiError> = retry_with(
        &policy,
        |_: &ApiError| true,
        |attempt: &RetryAttempt<'_, ApiError>| delays.push((attempt.attempt_index, attempt.delay)),
        || async move {
            calls_ref.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::transport("connection reset"))
        },
    )
    .await;

    assert_eq!(result, Err(ApiError::transport("connection reset")));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(delays.len(), 3);

    for (index, delay) in delays {
        let ceiling = policy.base_delay * 2_u32.pow(index);
        assert!(delay >= ceiling / 2, "delay {delay:?} below half of {ceiling:?}");
        assert!(delay <= ceiling.min(policy.max_delay));
    }
}

#[tokio::test(start_paused = true)]
async fn test_backoff_actually_sleeps() {
    let policy = RetryPolicy::new(2, Duration::from_millis(1000));
    let start = tokio::time::Instant::now();

    let _: Result<(), ApiError> = retry("sleep_check", &policy, || async {
        Err(ApiError::from_status(500, "boom"))
    })
    .await;

    // Two sleeps: at least 500ms + 1000ms, at most 1000ms + 2000ms
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1500));
    assert!(elapsed <= Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_after_transient_failures() {
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;
    let result = retry("flaky", &RetryPolicy::default(), || async move {
        let n = calls_ref.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(ApiError::from_status(429, "slow down"))
        } else {
            Ok(n)
        }
    })
    .await;

    assert_eq!(result, Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_client_error_is_not_retried() {
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;
    let result: Result<(), ApiError> = retry("bad_request", &RetryPolicy::default(), || async move {
        calls_ref.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::from_status(422, "invalid"))
    })
    .await;

    assert_eq!(result.unwrap_err().class(), ErrorClass::Client);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_degraded_body_is_retried() {
    let sentinels = vec!["Service temporarily unavailable".to_owned()];
    let calls = AtomicU32::new(0);
    let calls_ref = &calls;
    let sentinels_ref = &sentinels;

    let result = retry("degraded", &RetryPolicy::chat(), || async move {
        let n = calls_ref.fetch_add(1, Ordering::SeqCst);
        let body = if n == 0 {
            "Service temporarily unavailable".to_owned()
        } else {
            "Keep the long run easy".to_owned()
        };
        reject_degraded(body, sentinels_ref)
    })
    .await;

    assert_eq!(result.unwrap(), "Keep the long run easy");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_default_status_classification() {
    assert!(should_retry_status(None));
    for status in [408, 429, 500, 502, 503, 504, 599] {
        assert!(should_retry_status(Some(status)), "{status} should retry");
    }
    for status in [400, 401, 403, 404, 409, 422] {
        assert!(!should_retry_status(Some(status)), "{status} should not retry");
    }
}

#[test]
fn test_policy_presets() {
    assert_eq!(RetryPolicy::chat().max_retries, 2);
    assert_eq!(RetryPolicy::chat().base_delay, Duration::from_millis(750));
    assert_eq!(RetryPolicy::dashboard().max_retries, 3);
    assert_eq!(RetryPolicy::dashboard().base_delay, Duration::from_millis(1000));
    assert_eq!(RetryPolicy::insights().max_retries, 2);
    assert_eq!(RetryPolicy::insights().base_delay, Duration::from_millis(1500));
    assert_eq!(RetryPolicy::default().max_delay, Duration::from_millis(10_000));
    assert_eq!(RetryPolicy::default().max_attempts(), 4);
}
