//! Table-path parser
//!
//! The trending export is one flat CSV with a single header row. Rows
//! that cannot be decoded or that carry the wrong cell count are skipped
//! with a warning; only a payload with no header row at all is an error.

use tracing::warn;

use crate::parser::ParseError;
use crate::DataTable;

/// Parser for the flat trending-table export.
pub struct TableParser;

impl TableParser {
    /// Parse an export payload into a [`DataTable`].
    pub fn parse(raw: &str) -> Result<DataTable, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::Table("export is empty".to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(raw.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ParseError::Table(format!("unreadable header row: {e}")))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(ParseError::Table("export has no header row".to_string()));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    if record.len() != headers.len() {
                        warn!(
                            row = index + 1,
                            cells = record.len(),
                            expected = headers.len(),
                            "skipping export row with wrong cell count"
                        );
                        continue;
                    }
                    rows.push(record.iter().map(|cell| cell.to_string()).collect());
                }
                Err(e) => {
                    warn!(row = index + 1, error = %e, "skipping undecodable export row");
                }
            }
        }

        Ok(DataTable::new(headers, rows))
    }
}
