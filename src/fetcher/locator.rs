//! Resource locator construction
//!
//! Maps a normalized [`TrendsRequest`] onto the fully-encoded URL a
//! fetcher should retrieve. Query parameters that match the upstream
//! defaults are omitted, mirroring the URLs the service itself produces.

use crate::registry;
use crate::request::TrendsRequest;
use crate::{AcquisitionPath, SortOrder};

/// Base URL of the trends web property.
const BASE_URL: &str = "https://trends.google.com";

/// Fully-encoded fetch target plus the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    /// Complete URL, percent-encoded
    pub url: String,
    /// The acquisition path this locator serves
    pub path: AcquisitionPath,
}

impl ResourceLocator {
    /// Build the locator for a normalized request.
    pub fn from_request(request: &TrendsRequest) -> Self {
        match request {
            TrendsRequest::Feed { geo, window_hours } => {
                let mut url = format!("{BASE_URL}/trending/rss?geo={geo}");
                if let Some(hours) = window_hours {
                    url.push_str(&format!("&hours={hours}"));
                }
                Self {
                    url,
                    path: AcquisitionPath::Feed,
                }
            }
            TrendsRequest::Table {
                geo,
                window,
                category,
                active_only,
                sort,
            } => {
                let mut url = format!("{BASE_URL}/trending?geo={geo}");
                if window.hours() != 24 {
                    url.push_str(&format!("&hours={}", window.hours()));
                }
                // The category key was validated, so the lookup cannot miss;
                // "all" maps to the empty id and is omitted.
                if let Some(id) = registry::trending_category_id(category) {
                    if !id.is_empty() {
                        url.push_str(&format!("&category={id}"));
                    }
                }
                if *active_only {
                    url.push_str("&status=active");
                }
                if *sort != SortOrder::Relevance {
                    url.push_str(&format!("&sort={sort}"));
                }
                Self {
                    url,
                    path: AcquisitionPath::Table,
                }
            }
            TrendsRequest::Explore {
                queries,
                date_range,
                geo,
                category_id,
                language,
            } => {
                let date_encoded = date_range.replace(' ', "%20");
                let mut url = format!(
                    "{BASE_URL}/trends/explore?date={date_encoded}&geo={geo}&hl={language}"
                );
                if !queries.is_empty() {
                    let encoded: Vec<String> = queries
                        .iter()
                        .map(|q| urlencoding::encode(q).into_owned())
                        .collect();
                    url.push_str(&format!("&q={}", encoded.join(",")));
                }
                if *category_id != 0 {
                    url.push_str(&format!("&cat={category_id}"));
                }
                Self {
                    url,
                    path: AcquisitionPath::Explore,
                }
            }
        }
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
