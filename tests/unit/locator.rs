//! Locator URLs for edge-case requests

use trend_data_downloader::fetcher::ResourceLocator;
use trend_data_downloader::request::{ExploreParams, TableParams, TrendsRequest};

#[test]
fn test_table_alias_resolves_to_canonical_id() {
    // "gov" is an alias of law; the URL carries the canonical numeric id
    let request = TrendsRequest::table(TableParams::new("US").with_category("gov")).unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(url.contains("category=10"));
}

#[test]
fn test_table_default_window_is_omitted() {
    let request = TrendsRequest::table(TableParams::new("US").with_hours(24)).unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(!url.contains("hours="));
}

#[test]
fn test_explore_custom_date_range_is_percent_encoded() {
    let request = TrendsRequest::explore(
        ExploreParams::query("bitcoin").with_date_range("2024-01-01 2024-12-31"),
    )
    .unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(url.contains("date=2024-01-01%202024-12-31"));
    assert!(!url.contains("date=2024-01-01 "));
}

#[test]
fn test_explore_numeric_category_passthrough() {
    let request = TrendsRequest::explore(
        ExploreParams::query("bitcoin").with_category("1299"),
    )
    .unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(url.ends_with("&cat=1299"));
}

#[test]
fn test_explore_query_special_characters_are_encoded() {
    let request =
        TrendsRequest::explore(ExploreParams::query("AT&T stock")).unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(url.contains("q=AT%26T%20stock"));
}

#[test]
fn test_us_state_geo_in_url() {
    let request = TrendsRequest::table(TableParams::new("us-ny")).unwrap();
    let url = ResourceLocator::from_request(&request).url;
    assert!(url.contains("geo=US-NY"));
}
