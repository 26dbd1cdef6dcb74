//! Progress reporting during batch runs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use trend_data_downloader::downloader::{
    BatchOrchestrator, ConcurrencyPolicy, ProgressSink, TrendsDownloader,
};
use trend_data_downloader::request::FeedParams;
use trend_data_downloader::TrendsRequest;

use crate::support::{StubFetcher, SAMPLE_FEED};

/// Sink that records every update it receives.
struct RecordingSink {
    updates: Mutex<Vec<(usize, usize)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            updates: Mutex::new(Vec::new()),
        })
    }

    fn updates(&self) -> Vec<(usize, usize)> {
        self.updates.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, completed: usize, total: usize) {
        self.updates.lock().unwrap().push((completed, total));
    }
}

fn feed_request(geo: &str) -> TrendsRequest {
    TrendsRequest::feed(FeedParams::new(geo)).unwrap()
}

#[tokio::test]
async fn test_sequential_batch_reports_monotonic_progress() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = Arc::new(TrendsDownloader::new(fetcher));
    let sink = RecordingSink::new();
    let orchestrator = BatchOrchestrator::new(downloader).with_progress(sink.clone());

    orchestrator
        .run(
            vec![feed_request("US"), feed_request("DE"), feed_request("FR")],
            ConcurrencyPolicy::Sequential,
        )
        .await;

    assert_eq!(sink.updates(), vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_parallel_batch_reports_every_completion() {
    let fetcher = Arc::new(
        StubFetcher::with_payload(SAMPLE_FEED).with_delay(Duration::from_millis(5)),
    );
    let downloader = Arc::new(TrendsDownloader::new(fetcher));
    let sink = RecordingSink::new();
    let orchestrator = BatchOrchestrator::new(downloader).with_progress(sink.clone());

    let geos = ["US", "DE", "FR", "GB"];
    let requests: Vec<TrendsRequest> = geos.iter().map(|geo| feed_request(geo)).collect();
    orchestrator
        .run(requests, ConcurrencyPolicy::Parallel { max_concurrent: 2 })
        .await;

    let updates = sink.updates();
    assert_eq!(updates.len(), 4);
    // completion counts cover 1..=4, whatever order they landed in
    let mut counts: Vec<usize> = updates.iter().map(|(done, _)| *done).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2, 3, 4]);
    assert!(updates.iter().all(|(_, total)| *total == 4));
}

#[tokio::test]
async fn test_failed_slots_still_count_as_progress() {
    let fetcher = Arc::new(StubFetcher::with_payload(SAMPLE_FEED));
    let downloader = Arc::new(TrendsDownloader::new(fetcher));
    let sink = RecordingSink::new();
    let orchestrator = BatchOrchestrator::new(downloader).with_progress(sink.clone());

    // the middle geo fails validation but still advances the counter
    orchestrator
        .run_feed_batch(
            vec!["US".to_string(), "XX".to_string(), "DE".to_string()],
            ConcurrencyPolicy::Sequential,
        )
        .await;

    assert_eq!(sink.updates(), vec![(1, 3), (2, 3), (3, 3)]);
}
