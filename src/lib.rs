//! # Trend Data Downloader Library
//!
//! A library for downloading and normalizing trending-topic data from the
//! Google Trends web property. Designed for research pipelines, content
//! analytics, and monitoring tools that need trend data in typed form.
//!
//! ## Features
//!
//! - **Three Acquisition Paths**: the RSS feed (fast, media-enriched), the
//!   exportable trending table, and the historical-interest explore export
//! - **Validation First**: every request parameter is checked against the
//!   embedded reference tables before any network activity
//! - **Retry with Backoff**: transient transport faults retry with
//!   exponential backoff; rate-limit responses get a longer, jittered schedule
//! - **Result Caching**: TTL-bounded in-memory cache keyed by the normalized
//!   request, with hit/miss statistics
//! - **Batch Orchestration**: sequential runs with progress reporting, or
//!   bounded-parallel fan-out with order-preserving results
//! - **Format Conversion**: records to JSON, CSV, or a tabular structure,
//!   with lossless round trips
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use trend_data_downloader::downloader::TrendsDownloader;
//! use trend_data_downloader::fetcher::HttpFetcher;
//! use trend_data_downloader::request::FeedParams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // The feed path works over plain HTTP
//! let downloader = TrendsDownloader::new(Arc::new(HttpFetcher::new()));
//!
//! let trends = downloader.download_feed(FeedParams::new("US")).await?;
//! for record in trends.iter().take(5) {
//!     println!("{} ({})", record.trend, record.traffic);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several core modules:
//!
//! - [`registry`] - Embedded reference tables (geo codes, category taxonomies)
//! - [`validate`] - Parameter validation and normalization
//! - [`request`] - Normalized request values used as cache keys
//! - [`fetcher`] - The transport boundary: Fetcher trait, locators, HTTP impl
//! - [`parser`] - Feed, table-export and multi-section export parsers
//! - [`downloader`] - Pipeline execution, retry, caching, batch orchestration
//! - [`output`] - Format conversion (records, JSON, CSV, tabular)
//!
//! ## Data Types
//!
//! - [`TrendRecord`] - One trending item from the feed path
//! - [`DataTable`] - A generic ordered table of named columns
//! - [`TimeSeries`] - A table indexed by parsed timestamps
//! - [`SectionedTable`] - The six optional sections of an explore export
//! - [`FetchOutput`] - The result of any acquisition path, the cache value

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cancellation token shared across batch workers
pub mod cancel;

/// Download orchestration: pipeline, retry, cache, batch
pub mod downloader;

/// Transport boundary: Fetcher trait, locators, HTTP implementation
pub mod fetcher;

/// Tracing subscriber setup
pub mod logging;

/// Metric names and registration
pub mod metrics;

/// Output format conversion
pub mod output;

/// Payload parsers for the three acquisition paths
pub mod parser;

/// Embedded reference tables
pub mod registry;

/// Normalized request values
pub mod request;

/// Parameter validation
pub mod validate;

// Re-export commonly used types
pub use request::TrendsRequest;

/// One news article associated with a trending item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsArticle {
    /// Article headline
    pub headline: String,
    /// Publishing outlet name
    pub source: String,
    /// Article URL
    pub url: String,
}

/// Image reference attached to a trending item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendImage {
    /// Image URL
    pub url: String,
    /// Attribution for the image
    pub source: String,
}

/// One trending item produced by the feed path.
///
/// The traffic magnitude is kept as the raw feed string (for example
/// `"500+"` or `"2,000+"`). It is an order-of-magnitude indicator, not a
/// numeric measurement, and is deliberately not parsed into a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendRecord {
    /// Trending search term or topic label
    pub trend: String,
    /// Approximate traffic magnitude string (e.g. "500+")
    pub traffic: String,
    /// Publication timestamp from the feed
    pub published: DateTime<FixedOffset>,
    /// Associated news articles, possibly empty
    pub news_articles: Vec<NewsArticle>,
    /// Representative image, when the feed provides one
    pub image: Option<TrendImage>,
}

impl TrendRecord {
    /// Number of associated news articles.
    pub fn article_count(&self) -> usize {
        self.news_articles.len()
    }

    /// Validate record integrity
    pub fn validate(&self) -> Result<(), String> {
        if self.trend.is_empty() {
            return Err("Trend label cannot be empty".to_string());
        }

        for article in &self.news_articles {
            if article.headline.is_empty() {
                return Err(format!(
                    "Article headline cannot be empty (trend: {})",
                    self.trend
                ));
            }
        }

        if let Some(image) = &self.image {
            if image.url.is_empty() {
                return Err(format!("Image URL cannot be empty (trend: {})", self.trend));
            }
        }

        Ok(())
    }
}

/// Time window accepted by the table path.
///
/// The trending table supports exactly four windows. The feed path has no
/// fixed buckets and accepts any positive hour count instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableWindow {
    /// Past 4 hours
    #[serde(rename = "4h")]
    FourHours,
    /// Past 24 hours (1 day)
    #[serde(rename = "24h")]
    OneDay,
    /// Past 48 hours (2 days)
    #[serde(rename = "48h")]
    TwoDays,
    /// Past 168 hours (7 days)
    #[serde(rename = "7d")]
    OneWeek,
}

impl TableWindow {
    /// Window length in hours.
    pub fn hours(&self) -> u32 {
        match self {
            TableWindow::FourHours => 4,
            TableWindow::OneDay => 24,
            TableWindow::TwoDays => 48,
            TableWindow::OneWeek => 168,
        }
    }

    /// Build from an hour count. Only {4, 24, 48, 168} are valid.
    pub fn from_hours(hours: u32) -> Result<Self, String> {
        match hours {
            4 => Ok(TableWindow::FourHours),
            24 => Ok(TableWindow::OneDay),
            48 => Ok(TableWindow::TwoDays),
            168 => Ok(TableWindow::OneWeek),
            _ => Err(format!("Invalid hours value: {hours}")),
        }
    }
}

impl std::fmt::Display for TableWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TableWindow::FourHours => "4h",
            TableWindow::OneDay => "24h",
            TableWindow::TwoDays => "48h",
            TableWindow::OneWeek => "7d",
        };
        write!(f, "{s}")
    }
}

impl FromStr for TableWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4h" => Ok(TableWindow::FourHours),
            "24h" => Ok(TableWindow::OneDay),
            "48h" => Ok(TableWindow::TwoDays),
            "7d" => Ok(TableWindow::OneWeek),
            _ => Err(format!("Invalid time window: {s}")),
        }
    }
}

/// Sort order for the trending table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Default relevance ranking
    #[serde(rename = "relevance")]
    Relevance,
    /// Alphabetical by trend label
    #[serde(rename = "title")]
    Title,
    /// By search volume
    #[serde(rename = "volume")]
    Volume,
    /// By recency
    #[serde(rename = "recency")]
    Recency,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SortOrder::Relevance => "relevance",
            SortOrder::Title => "title",
            SortOrder::Volume => "volume",
            SortOrder::Recency => "recency",
        };
        write!(f, "{s}")
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(SortOrder::Relevance),
            "title" => Ok(SortOrder::Title),
            "volume" => Ok(SortOrder::Volume),
            "recency" => Ok(SortOrder::Recency),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

/// Acquisition path selector.
///
/// The explore path is the historical-interest route; it shares nothing
/// with the trending page, including its category numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcquisitionPath {
    /// RSS feed of trending items
    #[serde(rename = "feed")]
    Feed,
    /// Exportable trending table
    #[serde(rename = "table")]
    Table,
    /// Historical-interest explore export
    #[serde(rename = "explore")]
    Explore,
}

impl std::fmt::Display for AcquisitionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AcquisitionPath::Feed => "feed",
            AcquisitionPath::Table => "table",
            AcquisitionPath::Explore => "explore",
        };
        write!(f, "{s}")
    }
}

impl FromStr for AcquisitionPath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feed" => Ok(AcquisitionPath::Feed),
            "table" => Ok(AcquisitionPath::Table),
            "explore" => Ok(AcquisitionPath::Explore),
            _ => Err(format!("Invalid acquisition path: {s}")),
        }
    }
}

/// A generic ordered table: named columns plus rows of string cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DataTable {
    /// Column names, in document order
    pub headers: Vec<String>,
    /// Rows of cells; every row has one cell per header
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Validate table integrity
    pub fn validate(&self) -> Result<(), String> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.headers.len() {
                return Err(format!(
                    "Row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    self.headers.len()
                ));
            }
        }
        Ok(())
    }
}

/// One row of a time-indexed table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesRow {
    /// Parsed row timestamp (the first column of the export)
    pub timestamp: NaiveDateTime,
    /// Remaining cells, one per value header
    pub values: Vec<String>,
}

/// A table whose rows are indexed by parsed timestamps.
///
/// Produced from the interest-over-time section of an explore export. The
/// timestamp column is consumed into the row index; `value_headers` names
/// the remaining columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimeSeries {
    /// Names of the value columns (timestamp column excluded)
    pub value_headers: Vec<String>,
    /// Rows in document order
    pub rows: Vec<TimeSeriesRow>,
}

impl TimeSeries {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The decomposed sections of one explore export.
///
/// Every slot is independently optional: a section that was missing from
/// the export, or that failed to parse, is `None`. Absence of one section
/// never blocks the others.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SectionedTable {
    /// Interest over time, indexed by timestamp
    pub interest_over_time: Option<TimeSeries>,
    /// Interest by region
    pub interest_by_region: Option<DataTable>,
    /// Related topics, TOP block
    pub related_topics_top: Option<DataTable>,
    /// Related topics, RISING block
    pub related_topics_rising: Option<DataTable>,
    /// Related queries, TOP block
    pub related_queries_top: Option<DataTable>,
    /// Related queries, RISING block
    pub related_queries_rising: Option<DataTable>,
}

impl SectionedTable {
    /// Names of the sections that parsed successfully, in fixed order.
    pub fn present_sections(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.interest_over_time.is_some() {
            present.push("interest_over_time");
        }
        if self.interest_by_region.is_some() {
            present.push("interest_by_region");
        }
        if self.related_topics_top.is_some() {
            present.push("related_topics_top");
        }
        if self.related_topics_rising.is_some() {
            present.push("related_topics_rising");
        }
        if self.related_queries_top.is_some() {
            present.push("related_queries_top");
        }
        if self.related_queries_rising.is_some() {
            present.push("related_queries_rising");
        }
        present
    }

    /// Whether no section parsed at all.
    pub fn is_empty(&self) -> bool {
        self.present_sections().is_empty()
    }
}

/// Result of one acquisition, whatever the path. The cache value type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FetchOutput {
    /// Feed path result
    Feed(Vec<TrendRecord>),
    /// Table path result
    Table(DataTable),
    /// Explore path result
    Explore(SectionedTable),
}

impl FetchOutput {
    /// The acquisition path that produced this output.
    pub fn path(&self) -> AcquisitionPath {
        match self {
            FetchOutput::Feed(_) => AcquisitionPath::Feed,
            FetchOutput::Table(_) => AcquisitionPath::Table,
            FetchOutput::Explore(_) => AcquisitionPath::Explore,
        }
    }
}
