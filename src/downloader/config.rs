//! Retry, cache, and concurrency constants

use std::time::Duration;

/// Maximum attempts for transient transport failures.
/// 3 attempts recovers from blips without stretching a dead endpoint
/// past a few seconds of total wait.
pub const TRANSPORT_MAX_ATTEMPTS: u32 = 3;

/// Initial backoff for transient transport failures, in milliseconds.
pub const TRANSPORT_BASE_DELAY_MS: u64 = 1000; // 1 second

/// Backoff cap for transient transport failures, in milliseconds.
pub const TRANSPORT_MAX_BACKOFF_MS: u64 = 30_000; // 30 seconds

/// Maximum attempts once the upstream has signalled rate limiting.
/// Rate-limit windows reset on the order of minutes, so this schedule
/// is longer and slower than the transport one.
pub const RATE_LIMIT_MAX_ATTEMPTS: u32 = 5;

/// Initial backoff after a rate-limit signal, in milliseconds.
pub const RATE_LIMIT_BASE_DELAY_MS: u64 = 5000; // 5 seconds

/// Backoff cap after a rate-limit signal, in milliseconds.
pub const RATE_LIMIT_MAX_BACKOFF_MS: u64 = 120_000; // 2 minutes

/// Default time-to-live for cached results.
/// Trending data moves on the order of minutes; 5 minutes keeps repeat
/// lookups cheap without serving stale rankings.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default concurrent fetches for parallel batches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 5;

/// Hard ceiling on batch concurrency. Higher values only pile up
/// rate-limit responses upstream.
pub const MAX_CONCURRENCY_CEILING: usize = 32;

/// Calculate an exponential backoff delay: `base * 2^attempt`, capped.
pub fn calculate_backoff(base_ms: u64, attempt: u32, cap_ms: u64) -> Duration {
    let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay_ms.min(cap_ms))
}
