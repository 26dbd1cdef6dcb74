//! Single-request pipeline
//!
//! [`TrendsDownloader`] owns one fetcher, one cache, and one retry
//! executor, and runs a validated request through cache lookup, fetch
//! with retry, parse, and cache store. It is the unit the batch
//! orchestrator fans out over, so it is cheap to share behind an [`Arc`].

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::downloader::cache::{CacheStats, Clock, ResultCache};
use crate::downloader::config::DEFAULT_CACHE_TTL;
use crate::downloader::retry::{RetryExecutor, RetryPolicy};
use crate::downloader::DownloadError;
use crate::fetcher::{
    payload_reports_rate_limit, BrowserOptions, Fetcher, ResourceLocator, TransportError,
};
use crate::parser::{FeedParser, SectionedTableParser, TableParser};
use crate::request::{ExploreParams, FeedParams, TableParams};
use crate::{
    AcquisitionPath, DataTable, FetchOutput, SectionedTable, TrendRecord, TrendsRequest,
};

/// Downloads and parses trending data through one configured fetcher.
pub struct TrendsDownloader {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<ResultCache>,
    retry: RetryExecutor,
    browser_options: BrowserOptions,
}

impl TrendsDownloader {
    /// Downloader with default cache TTL, retry policy, and browser
    /// options.
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            cache: Arc::new(ResultCache::new(DEFAULT_CACHE_TTL)),
            retry: RetryExecutor::default(),
            browser_options: BrowserOptions::default(),
        }
    }

    /// Replace the cache TTL applied to future stores.
    pub fn with_cache_ttl(self, ttl: Duration) -> Self {
        self.cache.set_ttl(ttl);
        self
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetryExecutor::new(policy);
        self
    }

    /// Replace the browser options forwarded to the fetcher.
    pub fn with_browser_options(mut self, options: BrowserOptions) -> Self {
        self.browser_options = options;
        self
    }

    /// Rebuild the cache on a caller-supplied clock. Drops any entries
    /// stored so far.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let ttl = self.cache.ttl();
        self.cache = Arc::new(ResultCache::with_clock(ttl, clock));
        self
    }

    /// Validate and download a feed request.
    pub async fn download_feed(
        &self,
        params: FeedParams,
    ) -> Result<Vec<TrendRecord>, DownloadError> {
        let request = TrendsRequest::feed(params)?;
        match self.execute(&request).await? {
            FetchOutput::Feed(records) => Ok(records),
            other => Err(DownloadError::Incomplete(format!(
                "feed request produced a {} payload",
                other.path()
            ))),
        }
    }

    /// Validate and download a table request.
    pub async fn download_table(&self, params: TableParams) -> Result<DataTable, DownloadError> {
        let request = TrendsRequest::table(params)?;
        match self.execute(&request).await? {
            FetchOutput::Table(table) => Ok(table),
            other => Err(DownloadError::Incomplete(format!(
                "table request produced a {} payload",
                other.path()
            ))),
        }
    }

    /// Validate and download an explore request.
    pub async fn download_explore(
        &self,
        params: ExploreParams,
    ) -> Result<SectionedTable, DownloadError> {
        let request = TrendsRequest::explore(params)?;
        match self.execute(&request).await? {
            FetchOutput::Explore(sectioned) => Ok(sectioned),
            other => Err(DownloadError::Incomplete(format!(
                "explore request produced a {} payload",
                other.path()
            ))),
        }
    }

    /// Run an already-validated request through the full pipeline.
    #[instrument(skip(self), fields(request = %request))]
    pub async fn execute(&self, request: &TrendsRequest) -> Result<FetchOutput, DownloadError> {
        if let Some(cached) = self.cache.get(request) {
            debug!("serving from cache");
            return Ok(cached);
        }

        let path = request.path();
        let started = Instant::now();
        metrics::counter!("trend_fetch_attempts_total", "path" => path.to_string()).increment(1);

        let payload = self.fetch_with_retry(request, path).await?;
        if payload.trim().is_empty() {
            return Err(DownloadError::Incomplete(format!(
                "empty payload for {request}"
            )));
        }

        let output = match path {
            AcquisitionPath::Feed => FetchOutput::Feed(FeedParser::parse(&payload)?),
            AcquisitionPath::Table => FetchOutput::Table(TableParser::parse(&payload)?),
            AcquisitionPath::Explore => {
                FetchOutput::Explore(SectionedTableParser::parse(&payload))
            }
        };

        metrics::histogram!("trend_fetch_duration_seconds", "path" => path.to_string())
            .record(started.elapsed().as_secs_f64());
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "download complete"
        );

        self.cache.set(request.clone(), output.clone());
        Ok(output)
    }

    async fn fetch_with_retry(
        &self,
        request: &TrendsRequest,
        path: AcquisitionPath,
    ) -> Result<String, TransportError> {
        let locator = ResourceLocator::from_request(request);
        let label = request.to_string();
        let fetcher = Arc::clone(&self.fetcher);
        let options = self.browser_options.clone();

        // The rendered explore page can deliver HTTP 429 inside an
        // otherwise successful response, so the check runs inside the
        // retried closure where it can trigger the rate-limit schedule.
        self.retry
            .execute(&label, move || {
                let fetcher = Arc::clone(&fetcher);
                let locator = locator.clone();
                let options = options.clone();
                async move {
                    let payload = fetcher.fetch(&locator, &options).await?;
                    if path == AcquisitionPath::Explore && payload_reports_rate_limit(&payload) {
                        return Err(TransportError::RateLimited(format!(
                            "rate limit reported in payload from {}",
                            locator.url
                        )));
                    }
                    Ok(payload)
                }
            })
            .await
    }

    /// Drop every cached result and zero the hit/miss counters.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache hit/miss counters and entry count.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Change the cache TTL for future stores.
    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.cache.set_ttl(ttl);
    }
}
