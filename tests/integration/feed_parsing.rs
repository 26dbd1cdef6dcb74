//! Feed download end to end: URL shape and record structure

use std::sync::Arc;

use trend_data_downloader::downloader::TrendsDownloader;
use trend_data_downloader::request::FeedParams;

use crate::support::{StubFetcher, SAMPLE_FEED};

#[tokio::test]
async fn test_feed_download_produces_typed_records() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let records = downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.trend, "solar eclipse");
    assert_eq!(first.traffic, "500+");
    assert_eq!(first.article_count(), 1);
    assert_eq!(
        first.image.as_ref().unwrap().url,
        "https://img.example.com/eclipse.jpg"
    );
    assert!(first.validate().is_ok());

    assert_eq!(
        fetcher.urls(),
        vec!["https://trends.google.com/trending/rss?geo=US".to_string()]
    );
}

#[tokio::test]
async fn test_feed_window_lands_in_the_url() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    downloader
        .download_feed(FeedParams::new("de").with_window(48))
        .await
        .unwrap();

    assert_eq!(
        fetcher.urls(),
        vec!["https://trends.google.com/trending/rss?geo=DE&hours=48".to_string()]
    );
}

#[tokio::test]
async fn test_feed_records_keep_publication_offset() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher);

    let records = downloader
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap();
    assert_eq!(
        records[0].published.to_rfc3339(),
        "2025-08-15T07:10:00-07:00"
    );
}
