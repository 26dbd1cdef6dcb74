//! Batch orchestration
//!
//! Runs many requests through one [`TrendsDownloader`], either strictly
//! sequentially or with bounded parallelism. Results come back in input
//! order regardless of completion order, one [`BatchItem`] per input,
//! with per-slot failures isolated from their neighbours. A shared
//! [`CancelToken`] stops admission of new slots; slots already in flight
//! run to completion.

use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::downloader::config::{DEFAULT_MAX_CONCURRENT_FETCHES, MAX_CONCURRENCY_CEILING};
use crate::downloader::progress::{NoopProgress, ProgressSink};
use crate::downloader::{DownloadError, TrendsDownloader};
use crate::request::FeedParams;
use crate::{FetchOutput, TrendsRequest};

/// How a batch schedules its slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// One request at a time, in input order
    Sequential,
    /// Up to `max_concurrent` requests in flight at once
    Parallel {
        /// In-flight ceiling; clamped to `1..=MAX_CONCURRENCY_CEILING`
        max_concurrent: usize,
    },
}

impl Default for ConcurrencyPolicy {
    fn default() -> Self {
        ConcurrencyPolicy::Parallel {
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }
}

/// One slot of a finished batch, in input position.
#[derive(Debug)]
pub struct BatchItem {
    /// Human-readable request label (the request's display form, or the
    /// raw input when validation failed)
    pub label: String,
    /// The slot's result
    pub outcome: Result<FetchOutput, DownloadError>,
}

impl BatchItem {
    /// Whether this slot succeeded.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

type Slot = (String, Result<TrendsRequest, DownloadError>);

/// Fans a list of requests out over one downloader.
pub struct BatchOrchestrator {
    downloader: Arc<TrendsDownloader>,
    progress: Arc<dyn ProgressSink>,
    cancel: CancelToken,
}

impl BatchOrchestrator {
    /// Orchestrator with no progress reporting and a fresh cancel token.
    pub fn new(downloader: Arc<TrendsDownloader>) -> Self {
        Self {
            downloader,
            progress: Arc::new(NoopProgress),
            cancel: CancelToken::new(),
        }
    }

    /// Report completion through the given sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Use a caller-supplied cancel token instead of a fresh one.
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token that cancels this orchestrator's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run already-validated requests.
    pub async fn run(
        &self,
        requests: Vec<TrendsRequest>,
        policy: ConcurrencyPolicy,
    ) -> Vec<BatchItem> {
        let slots = requests
            .into_iter()
            .map(|request| (request.to_string(), Ok(request)))
            .collect();
        self.run_slots(slots, policy).await
    }

    /// Feed requests for a list of geo codes.
    ///
    /// Geos that fail validation occupy their slot with the validation
    /// error; the rest of the batch runs normally.
    pub async fn run_feed_batch(
        &self,
        geos: Vec<String>,
        policy: ConcurrencyPolicy,
    ) -> Vec<BatchItem> {
        let slots = geos
            .into_iter()
            .map(|geo| {
                match TrendsRequest::feed(FeedParams::new(geo.clone())) {
                    Ok(request) => (request.to_string(), Ok(request)),
                    Err(error) => (format!("feed geo={geo}"), Err(DownloadError::from(error))),
                }
            })
            .collect();
        self.run_slots(slots, policy).await
    }

    async fn run_slots(&self, slots: Vec<Slot>, policy: ConcurrencyPolicy) -> Vec<BatchItem> {
        let total = slots.len();
        info!(total, policy = ?policy, "starting batch");

        let items = match policy {
            ConcurrencyPolicy::Sequential => self.run_sequential(slots).await,
            ConcurrencyPolicy::Parallel { max_concurrent } => {
                let max_concurrent = max_concurrent.clamp(1, MAX_CONCURRENCY_CEILING);
                self.run_parallel(slots, max_concurrent).await
            }
        };

        let successes = items.iter().filter(|item| item.is_success()).count();
        for item in &items {
            let outcome = match &item.outcome {
                Ok(_) => "success",
                Err(DownloadError::Cancelled) => "cancelled",
                Err(_) => "error",
            };
            metrics::counter!("trend_batch_slots_total", "outcome" => outcome).increment(1);
        }
        if successes < total {
            warn!(successes, total, "batch finished with failures");
        } else {
            info!(total, "batch finished");
        }
        items
    }

    async fn run_sequential(&self, slots: Vec<Slot>) -> Vec<BatchItem> {
        let total = slots.len();
        let mut items = Vec::with_capacity(total);
        for (label, slot) in slots {
            let outcome = match slot {
                Err(error) => Err(error),
                Ok(_) if self.cancel.is_cancelled() => Err(DownloadError::Cancelled),
                Ok(request) => self.downloader.execute(&request).await,
            };
            items.push(BatchItem { label, outcome });
            self.progress.on_progress(items.len(), total);
        }
        items
    }

    async fn run_parallel(&self, slots: Vec<Slot>, max_concurrent: usize) -> Vec<BatchItem> {
        let total = slots.len();
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let completed = Arc::new(AtomicUsize::new(0));

        let futures = slots.into_iter().map(|(label, slot)| {
            let downloader = Arc::clone(&self.downloader);
            let semaphore = Arc::clone(&semaphore);
            let completed = Arc::clone(&completed);
            let progress = Arc::clone(&self.progress);
            let cancel = self.cancel.clone();

            async move {
                let outcome = match slot {
                    Err(error) => Err(error),
                    Ok(request) => {
                        // Check both before and after waiting for a
                        // permit: cancellation may arrive while queued.
                        if cancel.is_cancelled() {
                            Err(DownloadError::Cancelled)
                        } else {
                            match semaphore.acquire_owned().await {
                                Ok(_permit) if !cancel.is_cancelled() => {
                                    downloader.execute(&request).await
                                }
                                _ => Err(DownloadError::Cancelled),
                            }
                        }
                    }
                };
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.on_progress(done, total);
                BatchItem { label, outcome }
            }
        });

        // join_all yields results in input order, whatever the
        // completion order was
        join_all(futures).await
    }
}
