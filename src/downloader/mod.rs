//! Download orchestration, caching, and retry
//!
//! This module provides the core acquisition pipeline with error
//! classification, data-level retry, result caching, and batch
//! orchestration.
//!
//! # Overview
//!
//! A single request moves through the pipeline as:
//!
//! 1. **Validation**: the request constructors in [`crate::request`]
//!    reject bad parameters before any network traffic
//! 2. **Cache lookup**: [`cache::ResultCache`] short-circuits repeat
//!    requests within the TTL window
//! 3. **Fetch with retry**: [`retry::RetryExecutor`] drives the
//!    configured [`crate::fetcher::Fetcher`], backing off per error class
//! 4. **Parse**: the path-specific parser turns the raw payload into a
//!    typed result
//! 5. **Cache store**: successful results are stored for later hits
//!
//! [`batch::BatchOrchestrator`] runs many requests through this pipeline
//! sequentially or with bounded parallelism, preserving input order.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use trend_data_downloader::downloader::TrendsDownloader;
//! use trend_data_downloader::fetcher::HttpFetcher;
//! use trend_data_downloader::request::FeedParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = TrendsDownloader::new(Arc::new(HttpFetcher::new()));
//! let records = downloader.download_feed(FeedParams::new("US")).await?;
//! println!("{} trends", records.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! - [`executor`] - Single-request pipeline and the [`TrendsDownloader`] handle
//! - [`batch`] - Multi-request orchestration with ordered results
//! - [`cache`] - TTL result cache with injectable clock
//! - [`retry`] - Class-aware exponential backoff
//! - [`progress`] - Batch progress reporting
//! - [`config`] - Retry, cache, and concurrency constants
//!
//! # Error Handling
//!
//! Every failure surfaces as a [`DownloadError`] variant that preserves
//! its origin: validation failures are never retried, transport failures
//! retry on the transient schedule, and rate limits retry on the slower
//! rate-limit schedule.

pub mod batch;
pub mod cache;
pub mod config;
pub mod executor;
pub mod progress;
pub mod retry;

pub use batch::{BatchItem, BatchOrchestrator, ConcurrencyPolicy};
pub use cache::{CacheStats, Clock, ResultCache, SystemClock};
pub use executor::TrendsDownloader;
pub use progress::{BatchProgress, NoopProgress, ProgressSink, TracingProgress};
pub use retry::{RetryExecutor, RetryPolicy};

use crate::fetcher::TransportError;
use crate::parser::ParseError;
use crate::validate::ValidationError;

/// Failures surfaced by the acquisition pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DownloadError {
    /// Request parameters were rejected before any fetch
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The fetch failed after exhausting its retry schedule
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The payload arrived but could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Transport succeeded but delivered no usable payload
    #[error("incomplete result: {0}")]
    Incomplete(String),

    /// The request was cancelled before it could run
    #[error("cancelled")]
    Cancelled,
}
