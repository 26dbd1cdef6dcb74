//! Parameter validation and normalization
//!
//! Every request parameter passes through here before any network or cache
//! activity. Each function either returns the normalized value or fails
//! with a [`ValidationError`] that names the offending field, lists nearby
//! valid alternatives, and enumerates the valid set. Validation is pure:
//! no side effects, no I/O, safe to call anywhere.

use crate::registry::{
    self, GeoRegistry, EXPLORE_DATE_PRESETS, TRENDING_CATEGORIES,
};
use crate::{SortOrder, TableWindow};
use chrono::NaiveDate;
use std::str::FromStr;

/// Maximum number of free-text query terms per explore request.
pub const MAX_QUERIES: usize = 5;

/// Maximum number of suggestions attached to an invalid-parameter error.
const MAX_SUGGESTIONS: usize = 5;

/// Invalid-parameter errors. Never retried, always surfaced immediately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Unknown geo code
    #[error(
        "invalid geo code '{code}'.{} Available: {country_count} countries (US, CA, UK, DE, FR, ...) or {state_count} US states (US-CA, US-NY, US-TX, ...)",
        suggestion_clause(.suggestions)
    )]
    InvalidGeo {
        /// The rejected code, already uppercased
        code: String,
        /// Known codes sharing the first letter, at most five
        suggestions: Vec<String>,
        /// Size of the country table
        country_count: usize,
        /// Size of the US-state table
        state_count: usize,
    },

    /// Table-path window outside the fixed set
    #[error(
        "invalid hours value '{hours}'. Must be one of: [4, 24, 48, 168]\n  4   = Past 4 hours\n  24  = Past 24 hours (1 day)\n  48  = Past 48 hours (2 days)\n  168 = Past 168 hours (7 days)"
    )]
    InvalidTableWindow {
        /// The rejected hour count
        hours: u32,
    },

    /// Feed-path window must be positive
    #[error("invalid feed window '{hours}': must be a positive number of hours")]
    InvalidFeedWindow {
        /// The rejected hour count
        hours: u32,
    },

    /// Unknown trending-page category
    #[error(
        "invalid category '{name}'.{} Available categories: {}",
        suggestion_clause(.suggestions),
        .available.join(", ")
    )]
    InvalidCategory {
        /// The rejected name, already lowercased
        name: String,
        /// Known names sharing a 3-character prefix, at most five
        suggestions: Vec<String>,
        /// The full sorted category list
        available: Vec<String>,
    },

    /// Unknown explore category
    #[error(
        "invalid explore category '{name}'. Available categories: {}. Or use a numeric category ID directly",
        .available.join(", ")
    )]
    InvalidExploreCategory {
        /// The rejected name, already normalized
        name: String,
        /// The full sorted category list
        available: Vec<String>,
    },

    /// Date range neither a preset nor a YYYY-MM-DD pair
    #[error(
        "invalid date range '{value}'. Valid presets: {}. Or a custom range 'YYYY-MM-DD YYYY-MM-DD' (e.g. '2024-01-01 2024-12-31')",
        EXPLORE_DATE_PRESETS.join(", ")
    )]
    InvalidDateRange {
        /// The rejected value
        value: String,
    },

    /// Custom date range with the first date after the second
    #[error("invalid date range: start '{start}' is after end '{end}'")]
    DateRangeOrder {
        /// First date of the pair
        start: String,
        /// Second date of the pair
        end: String,
    },

    /// More query terms than the comparison limit
    #[error("maximum {MAX_QUERIES} queries allowed for comparison, got {count}")]
    TooManyQueries {
        /// Number of terms supplied
        count: usize,
    },

    /// Neither a query nor a category filter was supplied
    #[error("either a query or a non-'all' category must be specified")]
    MissingQueryOrCategory,

    /// Language tag empty or not of the `lang` / `lang-REGION` shape
    #[error("invalid language '{value}'. Use a tag like 'en' or 'en-US'")]
    InvalidLanguage {
        /// The rejected value
        value: String,
    },

    /// Unknown sort order
    #[error("invalid sort order '{value}'. Must be one of: relevance, title, volume, recency")]
    InvalidSort {
        /// The rejected value
        value: String,
    },

    /// Unknown output format identifier
    #[error("invalid output format '{value}'. Must be one of: records, json, csv, table")]
    UnsupportedFormat {
        /// The rejected value
        value: String,
    },

    /// Embedded reference data failed to load
    #[error("reference data unavailable: {0}")]
    Registry(String),
}

fn suggestion_clause(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean one of: {}?", suggestions.join(", "))
    }
}

fn geo_registry() -> Result<&'static GeoRegistry, ValidationError> {
    GeoRegistry::load().map_err(|e| ValidationError::Registry(e.to_string()))
}

/// Validate a geo code against the country and US-state tables.
///
/// Returns the uppercased code. Already-normalized input passes through
/// unchanged.
pub fn validate_geo(geo: &str) -> Result<String, ValidationError> {
    let registry = geo_registry()?;
    let code = geo.to_uppercase();

    if registry.contains(&code) {
        return Ok(code);
    }

    let suggestions: Vec<String> = match code.chars().next() {
        Some(first) => registry
            .all_codes()
            .iter()
            .filter(|candidate| candidate.starts_with(first))
            .take(MAX_SUGGESTIONS)
            .map(|candidate| candidate.to_string())
            .collect(),
        None => Vec::new(),
    };

    Err(ValidationError::InvalidGeo {
        code,
        suggestions,
        country_count: registry.country_count(),
        state_count: registry.us_state_count(),
    })
}

/// Validate a feed-path time window. Any positive hour count is accepted.
pub fn validate_feed_window(hours: u32) -> Result<u32, ValidationError> {
    if hours == 0 {
        return Err(ValidationError::InvalidFeedWindow { hours });
    }
    Ok(hours)
}

/// Validate a table-path time window against the fixed bucket set.
pub fn validate_table_window(hours: u32) -> Result<TableWindow, ValidationError> {
    TableWindow::from_hours(hours).map_err(|_| ValidationError::InvalidTableWindow { hours })
}

/// Validate a trending-page category name.
///
/// Case-insensitive; returns the lowercased name (aliases stay aliases,
/// resolution to a numeric identifier happens at locator build time).
pub fn validate_trending_category(category: &str) -> Result<String, ValidationError> {
    let name = category.to_lowercase();

    if registry::trending_category_id(&name).is_some() {
        return Ok(name);
    }

    let prefix: String = name.chars().take(3).collect();
    let suggestions: Vec<String> = if name.chars().count() >= 3 {
        TRENDING_CATEGORIES
            .iter()
            .filter(|(key, _)| key.starts_with(prefix.as_str()))
            .take(MAX_SUGGESTIONS)
            .map(|(key, _)| key.to_string())
            .collect()
    } else {
        Vec::new()
    };

    Err(ValidationError::InvalidCategory {
        name,
        suggestions,
        available: registry::trending_category_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Validate an explore category, by name or numeric identifier.
///
/// Names are case-insensitive with spaces and hyphens normalized to
/// underscores. Bare numeric identifiers pass through. The returned id 0
/// means no category filter.
pub fn validate_explore_category(category: &str) -> Result<u32, ValidationError> {
    let name = category.to_lowercase().replace([' ', '-'], "_");

    if let Some(id) = registry::explore_category_id(&name) {
        return Ok(id);
    }

    if let Ok(id) = name.parse::<u32>() {
        return Ok(id);
    }

    Err(ValidationError::InvalidExploreCategory {
        name,
        available: registry::explore_category_names()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

/// Validate an explore date range: a named preset or `YYYY-MM-DD YYYY-MM-DD`
/// with the first date not after the second. Returns the canonical string.
pub fn validate_date_range(date_range: &str) -> Result<String, ValidationError> {
    if EXPLORE_DATE_PRESETS.contains(&date_range) {
        return Ok(date_range.to_string());
    }

    if let Some((start, end)) = date_range.split_once(' ') {
        if start.len() == 10 && end.len() == 10 {
            let parsed_start = NaiveDate::parse_from_str(start, "%Y-%m-%d");
            let parsed_end = NaiveDate::parse_from_str(end, "%Y-%m-%d");
            if let (Ok(start_date), Ok(end_date)) = (parsed_start, parsed_end) {
                if start_date > end_date {
                    return Err(ValidationError::DateRangeOrder {
                        start: start.to_string(),
                        end: end.to_string(),
                    });
                }
                return Ok(date_range.to_string());
            }
        }
    }

    Err(ValidationError::InvalidDateRange {
        value: date_range.to_string(),
    })
}

/// Validate the explore query list against the category filter.
///
/// At most [`MAX_QUERIES`] terms; an empty list requires a non-`all`
/// category (id != 0) so the request still selects something.
pub fn validate_queries(queries: &[String], category_id: u32) -> Result<(), ValidationError> {
    if queries.len() > MAX_QUERIES {
        return Err(ValidationError::TooManyQueries {
            count: queries.len(),
        });
    }

    if queries.is_empty() && category_id == 0 {
        return Err(ValidationError::MissingQueryOrCategory);
    }

    Ok(())
}

/// Normalize an explore language tag (the `hl` parameter) to canonical
/// `lang-REGION` casing, e.g. `EN-us` becomes `en-US`.
///
/// The tag is forwarded to the service, not checked against a registry;
/// only the shape is enforced so case variants share a cache key.
pub fn validate_language(language: &str) -> Result<String, ValidationError> {
    let tag = language.trim();
    let well_formed = !tag.is_empty()
        && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !tag.starts_with('-')
        && !tag.ends_with('-');
    if !well_formed {
        return Err(ValidationError::InvalidLanguage {
            value: language.to_string(),
        });
    }

    Ok(match tag.split_once('-') {
        Some((lang, region)) => {
            format!("{}-{}", lang.to_lowercase(), region.to_uppercase())
        }
        None => tag.to_lowercase(),
    })
}

/// Validate a sort order name for the table path.
pub fn validate_sort(sort: &str) -> Result<SortOrder, ValidationError> {
    SortOrder::from_str(&sort.to_lowercase()).map_err(|_| ValidationError::InvalidSort {
        value: sort.to_string(),
    })
}
