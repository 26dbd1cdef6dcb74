//! Explore download end to end: section extraction and degradation

use std::sync::Arc;

use trend_data_downloader::downloader::TrendsDownloader;
use trend_data_downloader::request::{ExploreParams, TableParams};

use crate::support::{StubFetcher, SAMPLE_EXPLORE, SAMPLE_TABLE};

#[tokio::test]
async fn test_explore_download_extracts_all_sections() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_EXPLORE));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let sectioned = downloader
        .download_explore(ExploreParams::query("bitcoin"))
        .await
        .unwrap();

    assert_eq!(sectioned.present_sections().len(), 6);
    let series = sectioned.interest_over_time.unwrap();
    assert_eq!(series.value_headers, vec!["bitcoin"]);
    assert_eq!(series.rows[1].values, vec!["58"]);

    let url = &fetcher.urls()[0];
    assert!(url.contains("/trends/explore?"));
    assert!(url.contains("q=bitcoin"));
}

#[tokio::test]
async fn test_partial_export_degrades_per_section() {
    let partial = "\
Interest over time
Week,bitcoin
garbage-row-without-a-date,42

Interest by region
Region,bitcoin
California,100
";
    let fetcher = Arc::new(StubFetcher::with_payload(partial));
    let downloader = TrendsDownloader::new(fetcher);

    let sectioned = downloader
        .download_explore(ExploreParams::query("bitcoin"))
        .await
        .unwrap();

    assert!(sectioned.interest_over_time.is_none());
    let region = sectioned.interest_by_region.unwrap();
    assert_eq!(region.rows[0], vec!["California", "100"]);
}

#[tokio::test]
async fn test_unrecognizable_export_yields_empty_sections() {
    let fetcher = Arc::new(StubFetcher::with_payload("completely unrelated text"));
    let downloader = TrendsDownloader::new(fetcher);

    let sectioned = downloader
        .download_explore(ExploreParams::query("bitcoin"))
        .await
        .unwrap();
    assert!(sectioned.is_empty());
}

#[tokio::test]
async fn test_table_download_end_to_end() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_TABLE));
    let downloader = TrendsDownloader::new(fetcher.clone());

    let table = downloader
        .download_table(TableParams::new("US").with_hours(4).with_category("tech"))
        .await
        .unwrap();

    assert_eq!(table.headers[0], "Trends");
    assert_eq!(table.len(), 2);
    assert_eq!(table.column_index("Search volume"), Some(1));
    assert_eq!(
        fetcher.urls(),
        vec!["https://trends.google.com/trending?geo=US&hours=4&category=18".to_string()]
    );
}
