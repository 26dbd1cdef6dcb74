//! Request validation through the public pipeline
//!
//! Invalid parameters must fail before any network activity.

use std::sync::Arc;

use trend_data_downloader::downloader::{DownloadError, TrendsDownloader};
use trend_data_downloader::request::{ExploreParams, FeedParams, TableParams};
use trend_data_downloader::validate::ValidationError;

use crate::support::{StubFetcher, SAMPLE_FEED};

#[tokio::test]
async fn test_invalid_geo_fails_without_fetching() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let err = downloader
        .download_feed(FeedParams::new("XX"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DownloadError::Validation(ValidationError::InvalidGeo { .. })
    ));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_invalid_table_window_fails_without_fetching() {
    let fetcher = Arc::new(StubFetcher::with_payload(""));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let err = downloader
        .download_table(TableParams::new("US").with_hours(12))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DownloadError::Validation(ValidationError::InvalidTableWindow { hours: 12 })
    ));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_too_many_explore_queries_rejected() {
    let fetcher = Arc::new(StubFetcher::with_payload(""));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let terms: Vec<String> = (0..6).map(|i| format!("term{i}")).collect();
    let err = downloader
        .download_explore(ExploreParams::comparison(terms))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DownloadError::Validation(ValidationError::TooManyQueries { count: 6 })
    ));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_explore_without_query_or_category_rejected() {
    let fetcher = Arc::new(StubFetcher::with_payload(""));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let err = downloader
        .download_explore(ExploreParams::category_browse("all"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DownloadError::Validation(ValidationError::MissingQueryOrCategory)
    ));
}

#[tokio::test]
async fn test_validation_error_messages_guide_the_caller() {
    let fetcher = Arc::new(StubFetcher::with_payload(""));
    let downloader = TrendsDownloader::new(fetcher);

    let err = downloader
        .download_table(TableParams::new("US").with_category("technology news"))
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("technology news"));
    assert!(message.contains("Available categories"));
}
