//! Output conversion over pipeline-produced records

use std::sync::Arc;

use trend_data_downloader::downloader::TrendsDownloader;
use trend_data_downloader::output::{
    self, convert_records, ConvertedOutput, OutputFormat,
};
use trend_data_downloader::request::{ExploreParams, FeedParams};

use crate::support::{StubFetcher, SAMPLE_EXPLORE, SAMPLE_FEED};

async fn downloaded_records() -> Vec<trend_data_downloader::TrendRecord> {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    TrendsDownloader::new(fetcher)
        .download_feed(FeedParams::new("US"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_json_round_trip_is_lossless() -> anyhow::Result<()> {
    let records = downloaded_records().await;
    let json = output::records_to_json(&records)?;
    let restored = output::records_from_json(&json)?;
    assert_eq!(restored, records);
    Ok(())
}

#[tokio::test]
async fn test_csv_round_trip_is_lossless() -> anyhow::Result<()> {
    let records = downloaded_records().await;
    let csv = output::records_to_csv(&records)?;
    let restored = output::records_from_csv(&csv)?;
    assert_eq!(restored, records);
    Ok(())
}

#[tokio::test]
async fn test_convert_records_covers_every_format() {
    let records = downloaded_records().await;

    match convert_records(records.clone(), OutputFormat::Records).unwrap() {
        ConvertedOutput::Records(r) => assert_eq!(r, records),
        other => panic!("unexpected output: {other:?}"),
    }

    match convert_records(records.clone(), OutputFormat::Json).unwrap() {
        ConvertedOutput::Json(json) => assert!(json.contains("solar eclipse")),
        other => panic!("unexpected output: {other:?}"),
    }

    match convert_records(records.clone(), OutputFormat::Csv).unwrap() {
        ConvertedOutput::Csv(csv) => {
            assert!(csv.starts_with("trend,traffic,published"))
        }
        other => panic!("unexpected output: {other:?}"),
    }

    match convert_records(records, OutputFormat::Table).unwrap() {
        ConvertedOutput::Table(table) => {
            assert_eq!(table.len(), 2);
            assert_eq!(table.column_index("article_count"), Some(3));
            assert_eq!(table.rows[0][3], "1");
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[tokio::test]
async fn test_sectioned_result_serializes_present_sections_only() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_EXPLORE));
    let sectioned = TrendsDownloader::new(fetcher)
        .download_explore(ExploreParams::query("bitcoin"))
        .await
        .unwrap();

    let json = output::sectioned_to_json(&sectioned).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 6);
    assert!(object.contains_key("interest_over_time"));
    assert!(object.contains_key("related_queries_rising"));
}

#[tokio::test]
async fn test_table_result_converts_to_csv_and_json() {
    let fetcher = Arc::new(StubFetcher::with_payload(crate::support::SAMPLE_TABLE));
    let table = TrendsDownloader::new(fetcher)
        .download_table(trend_data_downloader::request::TableParams::new("US"))
        .await
        .unwrap();

    let csv = output::table_to_csv(&table).unwrap();
    assert!(csv.starts_with("Trends,Search volume,Started,Trend breakdown\n"));

    let json = output::table_to_json(&table).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["Trends"], "solar eclipse");
}
