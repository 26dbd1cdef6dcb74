//! Cooperative cancellation of batch runs

use std::sync::Arc;
use std::time::Duration;

use trend_data_downloader::cancel::CancelToken;
use trend_data_downloader::downloader::{
    BatchOrchestrator, ConcurrencyPolicy, DownloadError, TrendsDownloader,
};
use trend_data_downloader::request::FeedParams;
use trend_data_downloader::TrendsRequest;

use crate::support::{StubFetcher, SAMPLE_FEED};

fn feed_request(geo: &str) -> TrendsRequest {
    TrendsRequest::feed(FeedParams::new(geo)).unwrap()
}

#[tokio::test]
async fn test_pre_cancelled_batch_runs_nothing() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = Arc::new(TrendsDownloader::new(fetcher.clone()));
    let token = CancelToken::new();
    token.cancel();
    let orchestrator = BatchOrchestrator::new(downloader).with_cancel(token);

    let items = orchestrator
        .run(
            vec![feed_request("US"), feed_request("DE")],
            ConcurrencyPolicy::Sequential,
        )
        .await;

    assert_eq!(items.len(), 2);
    assert!(items
        .iter()
        .all(|item| matches!(item.outcome, Err(DownloadError::Cancelled))));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn test_cancel_mid_batch_reports_remaining_slots_cancelled() {
    let fetcher = Arc::new(
        StubFetcher::with_payload(SAMPLE_FEED).with_delay(Duration::from_millis(30)),
    );
    let downloader = Arc::new(TrendsDownloader::new(fetcher.clone()));
    let orchestrator = BatchOrchestrator::new(downloader);
    let token = orchestrator.cancel_token();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();
    });

    let geos = ["US", "DE", "FR", "GB", "JP", "BR"];
    let requests: Vec<TrendsRequest> = geos.iter().map(|geo| feed_request(geo)).collect();
    let items = orchestrator
        .run(requests, ConcurrencyPolicy::Parallel { max_concurrent: 1 })
        .await;

    assert_eq!(items.len(), 6);
    // the slot in flight when cancellation landed finished normally
    assert!(items[0].is_success());
    // trailing slots were never admitted
    assert!(matches!(
        items.last().unwrap().outcome,
        Err(DownloadError::Cancelled)
    ));
    assert!(fetcher.calls() < 6);
}

#[tokio::test]
async fn test_cancellation_does_not_affect_later_runs_with_fresh_token() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = Arc::new(TrendsDownloader::new(fetcher.clone()));

    let cancelled = BatchOrchestrator::new(downloader.clone());
    cancelled.cancel_token().cancel();
    let items = cancelled
        .run(vec![feed_request("US")], ConcurrencyPolicy::Sequential)
        .await;
    assert!(matches!(items[0].outcome, Err(DownloadError::Cancelled)));

    // a new orchestrator carries a fresh token
    let fresh = BatchOrchestrator::new(downloader);
    let items = fresh
        .run(vec![feed_request("US")], ConcurrencyPolicy::Sequential)
        .await;
    assert!(items[0].is_success());
}
