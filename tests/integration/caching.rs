//! Result caching through the public pipeline

use std::sync::Arc;
use std::time::Duration;

use trend_data_downloader::downloader::TrendsDownloader;
use trend_data_downloader::request::FeedParams;

use crate::support::{ManualClock, StubFetcher, SAMPLE_FEED};

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let first = downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    let second = downloader
        .download_feed(FeedParams::new("us"))
        .await
        .unwrap();

    assert_eq!(first, second);
    // geo normalization makes "US" and "us" the same cache key
    assert_eq!(fetcher.calls(), 1);

    let stats = downloader.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.entry_count, 1);
}

#[tokio::test]
async fn test_distinct_requests_fetch_separately() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    downloader
        .download_feed(FeedParams::new("DE"))
        .await
        .unwrap();
    downloader
        .download_feed(FeedParams::new("US").with_window(4))
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 3);
    assert_eq!(downloader.cache_stats().entry_count, 3);
}

#[tokio::test]
async fn test_expired_entry_refetches() {
    let clock = ManualClock::new();
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone())
        .with_cache_ttl(Duration::from_secs(60))
        .with_clock(clock.clone());

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(59));
    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), 1);

    clock.advance(Duration::from_secs(1));
    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_zero_ttl_disables_hits_but_not_stores() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone()).with_cache_ttl(Duration::ZERO);

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(downloader.cache_stats().hits, 0);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    downloader.clear_cache();
    let stats = downloader.cache_stats();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.entry_count, 0);

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();

    assert_eq!(fetcher.calls(), 2);
    assert_eq!(downloader.cache_stats().misses, 1);
}

#[tokio::test]
async fn test_ttl_change_applies_to_future_stores_only() {
    let clock = ManualClock::new();
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone())
        .with_cache_ttl(Duration::from_secs(3600))
        .with_clock(clock.clone());

    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();

    downloader.set_cache_ttl(Duration::from_secs(1));
    clock.advance(Duration::from_secs(30));

    // stored under the hour-long TTL, still live
    downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), 1);

    // stored under the new one-second TTL, expires quickly
    downloader
        .download_feed(FeedParams::new("DE"))
        .await
        .unwrap();
    clock.advance(Duration::from_secs(2));
    downloader
        .download_feed(FeedParams::new("DE"))
        .await
        .unwrap();
    assert_eq!(fetcher.calls(), 3);
}
