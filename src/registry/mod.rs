//! Reference tables for request validation
//!
//! The registry holds the static data every request is validated against:
//! the geographic tables (countries and US states) embedded as JSON, the
//! two category taxonomies, and the date-range presets for the
//! historical-interest path. The trending page and the explore endpoint
//! use numerically incompatible category identifiers for the same
//! conceptual categories, so the two tables are kept strictly separate.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

/// Embedded geographic reference data
const GEO_JSON: &str = include_str!("geo.json");

/// Global geo registry instance (loaded once)
static GEO_REGISTRY: Lazy<Result<GeoRegistry, RegistryError>> =
    Lazy::new(|| GeoRegistry::from_json(GEO_JSON));

/// Category table for the trending page (table path).
///
/// Numeric identifiers specific to the `/trending` page; they are NOT the
/// explore taxonomy. The empty string means no category filter. The last
/// three entries are accepted aliases.
pub const TRENDING_CATEGORIES: &[(&str, &str)] = &[
    ("all", ""),
    ("business", "3"),
    ("health", "7"),
    ("law", "10"),
    ("politics", "14"),
    ("technology", "18"),
    ("science", "20"),
    ("tech", "18"),
    ("gov", "10"),
    ("government", "10"),
];

/// Category table for the explore endpoint (historical-interest path).
///
/// Identifier 0 means no category filter.
pub const EXPLORE_CATEGORIES: &[(&str, u32)] = &[
    ("all", 0),
    ("arts_entertainment", 3),
    ("autos_vehicles", 47),
    ("beauty_fitness", 44),
    ("books_literature", 22),
    ("business_industrial", 12),
    ("computers_electronics", 5),
    ("finance", 7),
    ("food_drink", 71),
    ("games", 8),
    ("health", 45),
    ("hobbies_leisure", 65),
    ("home_garden", 11),
    ("internet_telecom", 13),
    ("jobs_education", 958),
    ("law_government", 19),
    ("news", 16),
    ("online_communities", 299),
    ("people_society", 14),
    ("pets_animals", 66),
    ("real_estate", 29),
    ("reference", 533),
    ("science", 174),
    ("shopping", 18),
    ("sports", 20),
    ("travel", 67),
    ("ai_ml", 1299),
    ("computer_security", 314),
    ("investing", 107),
    ("politics", 396),
    ("banking", 37),
    ("accounting", 278),
];

/// Named date-range presets accepted by the explore endpoint.
pub const EXPLORE_DATE_PRESETS: &[&str] = &[
    "today 5-y",
    "today 12-m",
    "today 3-m",
    "today 1-m",
    "now 7-d",
    "now 1-d",
];

/// Registry of supported geographic codes
#[derive(Debug, Clone)]
pub struct GeoRegistry {
    #[allow(dead_code)]
    schema_version: String,
    #[allow(dead_code)]
    last_updated: String,
    countries: HashMap<String, String>,
    us_states: HashMap<String, String>,
}

impl GeoRegistry {
    /// Load the embedded registry
    ///
    /// This is a singleton operation - the registry is loaded once and cached.
    pub fn load() -> Result<&'static Self, &'static RegistryError> {
        GEO_REGISTRY.as_ref()
    }

    /// Load the embedded registry, returning an owned copy
    pub fn load_embedded() -> Result<Self, RegistryError> {
        Self::from_json(GEO_JSON)
    }

    fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawGeoRegistry = serde_json::from_str(json)
            .map_err(|e| RegistryError::ParseError(format!("Failed to parse geo registry: {e}")))?;

        Ok(Self {
            schema_version: raw.schema_version,
            last_updated: raw.last_updated,
            countries: raw.countries,
            us_states: raw.us_states,
        })
    }

    /// Whether the code is a known country code.
    pub fn is_country(&self, code: &str) -> bool {
        self.countries.contains_key(code)
    }

    /// Whether the code is a known `US-XX` state code.
    pub fn is_us_state(&self, code: &str) -> bool {
        self.us_states.contains_key(code)
    }

    /// Whether the code exists in either table.
    pub fn contains(&self, code: &str) -> bool {
        self.is_country(code) || self.is_us_state(code)
    }

    /// Display name for a code, searching both tables.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.countries
            .get(code)
            .or_else(|| self.us_states.get(code))
            .map(String::as_str)
    }

    /// Number of known countries.
    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    /// Number of known US states.
    pub fn us_state_count(&self) -> usize {
        self.us_states.len()
    }

    /// All known codes from both tables, sorted for deterministic output.
    pub fn all_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .countries
            .keys()
            .chain(self.us_states.keys())
            .map(String::as_str)
            .collect();
        codes.sort_unstable();
        codes
    }
}

/// Raw geo registry structure for deserialization
#[derive(Debug, Deserialize)]
struct RawGeoRegistry {
    schema_version: String,
    last_updated: String,
    countries: HashMap<String, String>,
    us_states: HashMap<String, String>,
}

/// Resolve a trending-page category name to its numeric identifier.
pub fn trending_category_id(name: &str) -> Option<&'static str> {
    TRENDING_CATEGORIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, id)| *id)
}

/// Resolve an explore category name to its numeric identifier.
pub fn explore_category_id(name: &str) -> Option<u32> {
    EXPLORE_CATEGORIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, id)| *id)
}

/// Sorted trending-page category names, for error messages.
pub fn trending_category_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TRENDING_CATEGORIES.iter().map(|(key, _)| *key).collect();
    names.sort_unstable();
    names
}

/// Sorted explore category names, for error messages.
pub fn explore_category_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = EXPLORE_CATEGORIES.iter().map(|(key, _)| *key).collect();
    names.sort_unstable();
    names
}

/// Errors that can occur when working with the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to parse embedded registry JSON
    #[error("registry parse error: {0}")]
    ParseError(String),
}
