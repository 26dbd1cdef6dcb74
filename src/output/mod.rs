//! Output format conversion
//!
//! Converts in-memory results into their serialized output shapes. The
//! conversions are pure value-to-value transforms; where the data lands
//! (file, stdout, HTTP response) is the caller's business.

use std::str::FromStr;

use crate::validate::ValidationError;
use crate::{DataTable, TrendRecord};

pub mod csv;
pub mod json;

pub use self::csv::{records_from_csv, records_to_csv, table_to_csv};
pub use self::json::{records_from_json, records_to_json, sectioned_to_json, table_to_json};

/// Output conversion errors.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// CSV encode/decode error
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON encode/decode error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Input data does not fit the requested shape
    #[error("malformed data: {0}")]
    Malformed(String),
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Requested output shape for feed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Typed records, unchanged
    #[default]
    Records,
    /// Pretty-printed JSON array
    Json,
    /// Flat CSV document
    Csv,
    /// Generic [`DataTable`]
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OutputFormat::Records => "records",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Table => "table",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "records" => Ok(OutputFormat::Records),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            other => Err(ValidationError::UnsupportedFormat {
                value: other.to_string(),
            }),
        }
    }
}

/// A feed result in its requested output shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertedOutput {
    /// Typed records
    Records(Vec<TrendRecord>),
    /// JSON document
    Json(String),
    /// CSV document
    Csv(String),
    /// Generic table
    Table(DataTable),
}

/// Convert feed records into the requested shape.
pub fn convert_records(
    records: Vec<TrendRecord>,
    format: OutputFormat,
) -> OutputResult<ConvertedOutput> {
    match format {
        OutputFormat::Records => Ok(ConvertedOutput::Records(records)),
        OutputFormat::Json => Ok(ConvertedOutput::Json(records_to_json(&records)?)),
        OutputFormat::Csv => Ok(ConvertedOutput::Csv(records_to_csv(&records)?)),
        OutputFormat::Table => Ok(ConvertedOutput::Table(records_to_table(&records))),
    }
}

/// Flatten feed records into a generic table with one row per trend.
pub fn records_to_table(records: &[TrendRecord]) -> DataTable {
    let headers = vec![
        "trend".to_string(),
        "traffic".to_string(),
        "published".to_string(),
        "article_count".to_string(),
    ];
    let rows = records
        .iter()
        .map(|record| {
            vec![
                record.trend.clone(),
                record.traffic.clone(),
                record.published.to_rfc3339(),
                record.article_count().to_string(),
            ]
        })
        .collect();
    DataTable::new(headers, rows)
}
