//! Backoff arithmetic and retry policy defaults

use std::time::Duration;

use trend_data_downloader::downloader::config::{
    calculate_backoff, DEFAULT_CACHE_TTL, MAX_CONCURRENCY_CEILING, RATE_LIMIT_BASE_DELAY_MS,
    RATE_LIMIT_MAX_ATTEMPTS, TRANSPORT_BASE_DELAY_MS, TRANSPORT_MAX_ATTEMPTS,
    TRANSPORT_MAX_BACKOFF_MS,
};
use trend_data_downloader::downloader::RetryPolicy;

#[test]
fn test_default_policy_matches_documented_schedules() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.transport.max_attempts, TRANSPORT_MAX_ATTEMPTS);
    assert_eq!(policy.transport.base_delay_ms, TRANSPORT_BASE_DELAY_MS);
    assert_eq!(policy.rate_limit.max_attempts, RATE_LIMIT_MAX_ATTEMPTS);
    assert_eq!(policy.rate_limit.base_delay_ms, RATE_LIMIT_BASE_DELAY_MS);
    assert!(policy.rate_limit.max_attempts > policy.transport.max_attempts);
    assert!(policy.rate_limit.base_delay_ms > policy.transport.base_delay_ms);
}

#[test]
fn test_backoff_sequence_is_exponential() {
    let delays: Vec<Duration> = (0..4)
        .map(|attempt| {
            calculate_backoff(TRANSPORT_BASE_DELAY_MS, attempt, TRANSPORT_MAX_BACKOFF_MS)
        })
        .collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4),
            Duration::from_secs(8),
        ]
    );
}

#[test]
fn test_backoff_respects_cap() {
    let delay = calculate_backoff(RATE_LIMIT_BASE_DELAY_MS, 20, 120_000);
    assert_eq!(delay, Duration::from_secs(120));
}

#[test]
fn test_ambient_defaults_are_sane() {
    assert_eq!(DEFAULT_CACHE_TTL, Duration::from_secs(300));
    assert!(MAX_CONCURRENCY_CEILING >= 1);
}
