//! Normalized request values
//!
//! A [`TrendsRequest`] is the validated, normalized form of a download
//! request and doubles as the cache key. It can only be built through the
//! validating constructors, so holding one is proof the parameters passed
//! validation. The caller-facing parameter structs ([`FeedParams`],
//! [`TableParams`], [`ExploreParams`]) carry the raw, not-yet-validated
//! input and use builder-style setters with the same defaults the upstream
//! service applies.

use crate::validate::{
    self, ValidationError,
};
use crate::{AcquisitionPath, SortOrder, TableWindow};
use serde::{Deserialize, Serialize};

/// Parameters for a feed-path request.
#[derive(Debug, Clone)]
pub struct FeedParams {
    /// Geo code (country or `US-XX` state)
    pub geo: String,
    /// Optional time window in hours; the feed has no fixed buckets
    pub window_hours: Option<u32>,
}

impl FeedParams {
    /// Feed request for a geo with no explicit window.
    pub fn new(geo: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            window_hours: None,
        }
    }

    /// Restrict the feed to the past `hours` hours.
    pub fn with_window(mut self, hours: u32) -> Self {
        self.window_hours = Some(hours);
        self
    }
}

/// Parameters for a table-path request.
#[derive(Debug, Clone)]
pub struct TableParams {
    /// Geo code
    pub geo: String,
    /// Time window in hours; must be one of {4, 24, 48, 168}
    pub hours: u32,
    /// Category name (trending-page taxonomy)
    pub category: String,
    /// Only include currently-active trends
    pub active_only: bool,
    /// Sort order for the exported table
    pub sort: String,
}

impl TableParams {
    /// Table request with the upstream defaults (24h, all categories,
    /// every trend, relevance order).
    pub fn new(geo: impl Into<String>) -> Self {
        Self {
            geo: geo.into(),
            hours: 24,
            category: "all".to_string(),
            active_only: false,
            sort: "relevance".to_string(),
        }
    }

    /// Set the time window in hours.
    pub fn with_hours(mut self, hours: u32) -> Self {
        self.hours = hours;
        self
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Only include currently-active trends.
    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    /// Set the sort order.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }
}

/// Parameters for an explore-path (historical-interest) request.
#[derive(Debug, Clone)]
pub struct ExploreParams {
    /// Search terms to compare, up to five; empty means category browse
    pub queries: Vec<String>,
    /// Date range: a named preset or `YYYY-MM-DD YYYY-MM-DD`
    pub date_range: String,
    /// Geo code
    pub geo: String,
    /// Category name or numeric id (explore taxonomy)
    pub category: String,
    /// Language code forwarded as `hl`
    pub language: String,
}

impl ExploreParams {
    /// Explore request for one search term with the upstream defaults
    /// (past 5 years, US, no category filter, `en-US`).
    pub fn query(term: impl Into<String>) -> Self {
        Self {
            queries: vec![term.into()],
            date_range: "today 5-y".to_string(),
            geo: "US".to_string(),
            category: "all".to_string(),
            language: "en-US".to_string(),
        }
    }

    /// Explore request comparing several search terms.
    pub fn comparison<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queries: terms.into_iter().map(Into::into).collect(),
            date_range: "today 5-y".to_string(),
            geo: "US".to_string(),
            category: "all".to_string(),
            language: "en-US".to_string(),
        }
    }

    /// Category browse: no search term, filtered by a non-`all` category.
    pub fn category_browse(category: impl Into<String>) -> Self {
        Self {
            queries: Vec::new(),
            date_range: "today 5-y".to_string(),
            geo: "US".to_string(),
            category: category.into(),
            language: "en-US".to_string(),
        }
    }

    /// Set the date range.
    pub fn with_date_range(mut self, date_range: impl Into<String>) -> Self {
        self.date_range = date_range.into();
        self
    }

    /// Set the geo code.
    pub fn with_geo(mut self, geo: impl Into<String>) -> Self {
        self.geo = geo.into();
        self
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the result language (`hl` parameter).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// A validated, normalized request. The cache key.
///
/// All string fields are in canonical form: geo uppercased, category
/// lowercased (explore categories resolved to their numeric id), date
/// range as the canonical preset or literal pair. Two requests that
/// normalize identically are the same cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendsRequest {
    /// Feed-path request
    Feed {
        /// Normalized geo code
        geo: String,
        /// Optional positive hour window
        window_hours: Option<u32>,
    },
    /// Table-path request
    Table {
        /// Normalized geo code
        geo: String,
        /// One of the four fixed windows
        window: TableWindow,
        /// Lowercased category name (trending-page taxonomy)
        category: String,
        /// Only currently-active trends
        active_only: bool,
        /// Sort order
        sort: SortOrder,
    },
    /// Explore-path request
    Explore {
        /// Search terms, at most five
        queries: Vec<String>,
        /// Canonical date range
        date_range: String,
        /// Normalized geo code
        geo: String,
        /// Resolved numeric category id; 0 means no filter
        category_id: u32,
        /// Language tag in canonical `lang-REGION` casing
        language: String,
    },
}

impl TrendsRequest {
    /// Validate and normalize feed parameters.
    pub fn feed(params: FeedParams) -> Result<Self, ValidationError> {
        let geo = validate::validate_geo(&params.geo)?;
        let window_hours = params
            .window_hours
            .map(validate::validate_feed_window)
            .transpose()?;

        Ok(TrendsRequest::Feed { geo, window_hours })
    }

    /// Validate and normalize table parameters.
    pub fn table(params: TableParams) -> Result<Self, ValidationError> {
        let geo = validate::validate_geo(&params.geo)?;
        let window = validate::validate_table_window(params.hours)?;
        let category = validate::validate_trending_category(&params.category)?;
        let sort = validate::validate_sort(&params.sort)?;

        Ok(TrendsRequest::Table {
            geo,
            window,
            category,
            active_only: params.active_only,
            sort,
        })
    }

    /// Validate and normalize explore parameters.
    pub fn explore(params: ExploreParams) -> Result<Self, ValidationError> {
        let geo = validate::validate_geo(&params.geo)?;
        let date_range = validate::validate_date_range(&params.date_range)?;
        let category_id = validate::validate_explore_category(&params.category)?;
        validate::validate_queries(&params.queries, category_id)?;
        let language = validate::validate_language(&params.language)?;

        Ok(TrendsRequest::Explore {
            queries: params.queries,
            date_range,
            geo,
            category_id,
            language,
        })
    }

    /// The acquisition path this request targets.
    pub fn path(&self) -> AcquisitionPath {
        match self {
            TrendsRequest::Feed { .. } => AcquisitionPath::Feed,
            TrendsRequest::Table { .. } => AcquisitionPath::Table,
            TrendsRequest::Explore { .. } => AcquisitionPath::Explore,
        }
    }

    /// The normalized geo code.
    pub fn geo(&self) -> &str {
        match self {
            TrendsRequest::Feed { geo, .. }
            | TrendsRequest::Table { geo, .. }
            | TrendsRequest::Explore { geo, .. } => geo,
        }
    }
}

impl std::fmt::Display for TrendsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendsRequest::Feed { geo, window_hours } => {
                write!(f, "feed geo={geo}")?;
                if let Some(hours) = window_hours {
                    write!(f, " window={hours}h")?;
                }
                Ok(())
            }
            TrendsRequest::Table {
                geo,
                window,
                category,
                active_only,
                sort,
            } => {
                write!(f, "table geo={geo} window={window} category={category}")?;
                if *active_only {
                    write!(f, " active-only")?;
                }
                if *sort != SortOrder::Relevance {
                    write!(f, " sort={sort}")?;
                }
                Ok(())
            }
            TrendsRequest::Explore {
                queries,
                date_range,
                geo,
                category_id,
                ..
            } => {
                write!(f, "explore geo={geo} date='{date_range}'")?;
                if !queries.is_empty() {
                    write!(f, " q=[{}]", queries.join(", "))?;
                }
                if *category_id != 0 {
                    write!(f, " cat={category_id}")?;
                }
                Ok(())
            }
        }
    }
}
