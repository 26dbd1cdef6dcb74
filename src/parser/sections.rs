//! Explore-export parser
//!
//! The explore export is one text blob holding several logically distinct
//! tables separated by blank lines, each usually preceded by a label line
//! ("Interest over time", "TOP", "RISING", ...). The TOP and RISING
//! labels are ambiguous on their own: whether they belong to related
//! topics or related queries depends on which marker line most recently
//! preceded them, so the scan carries a small state machine across
//! segments. Every section parses independently; a failure in one is
//! logged and recorded as an absent slot, never aborting the rest.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::parser::ParseError;
use crate::{DataTable, SectionedTable, TimeSeries, TimeSeriesRow};

/// Which related-section family the scan is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelatedKind {
    None,
    Topics,
    Queries,
}

/// Timestamp layouts observed in time-series first columns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parser for the multi-section explore export.
pub struct SectionedTableParser;

impl SectionedTableParser {
    /// Decompose an export blob into its sections.
    ///
    /// Never fails as a whole: an empty or fully unclassifiable blob
    /// yields a [`SectionedTable`] with every slot absent.
    pub fn parse(raw: &str) -> SectionedTable {
        let normalized = raw.replace("\r\n", "\n");
        let mut out = SectionedTable::default();
        let mut related = RelatedKind::None;

        for segment in normalized.split("\n\n") {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let lines: Vec<&str> = segment.lines().collect();
            let first = lines[0].trim();
            let header = first.to_lowercase();

            if header.contains("interest over time") || Self::looks_like_time_header(&lines) {
                // skip the label line unless the segment opens with the header row
                let data_start = usize::from(!Self::names_time_bucket(first));
                match Self::parse_time_series(&lines[data_start..]) {
                    Ok(series) => out.interest_over_time = Some(series),
                    Err(e) => warn!(error = %e, "failed to parse interest-over-time section"),
                }
            } else if header.contains("interest by") || header.contains("region") {
                match Self::parse_data_table("interest_by_region", &lines[1..]) {
                    Ok(table) => out.interest_by_region = Some(table),
                    Err(e) => warn!(error = %e, "failed to parse interest-by-region section"),
                }
            } else if header.contains("related topics") {
                related = RelatedKind::Topics;
            } else if header.contains("related queries") {
                related = RelatedKind::Queries;
            } else if first.eq_ignore_ascii_case("top") && related != RelatedKind::None {
                match Self::parse_data_table("related_top", &lines[1..]) {
                    Ok(table) => match related {
                        RelatedKind::Topics => out.related_topics_top = Some(table),
                        RelatedKind::Queries => out.related_queries_top = Some(table),
                        RelatedKind::None => unreachable!(),
                    },
                    Err(e) => warn!(error = %e, "failed to parse TOP section"),
                }
            } else if first.eq_ignore_ascii_case("rising") && related != RelatedKind::None {
                match Self::parse_data_table("related_rising", &lines[1..]) {
                    Ok(table) => match related {
                        RelatedKind::Topics => out.related_topics_rising = Some(table),
                        RelatedKind::Queries => out.related_queries_rising = Some(table),
                        RelatedKind::None => unreachable!(),
                    },
                    Err(e) => warn!(error = %e, "failed to parse RISING section"),
                }
            } else {
                debug!(header = %first, "unclassified export segment");
            }
        }

        out
    }

    /// Fallback signal for the time-series section when the label line is
    /// missing or ambiguous: either the second line is the time-bucket
    /// header row, or the segment opens with that header row directly and
    /// a date-like row follows it.
    fn looks_like_time_header(lines: &[&str]) -> bool {
        if lines.get(1).is_some_and(|line| Self::names_time_bucket(line)) {
            return true;
        }
        lines.first().is_some_and(|line| Self::names_time_bucket(line))
            && lines
                .get(1)
                .and_then(|line| line.split(',').next())
                .is_some_and(|cell| Self::parse_timestamp(cell).is_ok())
    }

    fn names_time_bucket(line: &str) -> bool {
        let line = line.trim().to_lowercase();
        line.starts_with("week")
            || line.starts_with("day")
            || line.starts_with("month")
            || line.starts_with("time")
    }

    fn parse_data_table(
        section: &'static str,
        lines: &[&str],
    ) -> Result<DataTable, ParseError> {
        let data = lines.join("\n");
        if data.trim().is_empty() {
            return Err(ParseError::Section {
                section,
                reason: "section has no data rows".to_string(),
            });
        }

        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ParseError::Section {
                section,
                reason: format!("unreadable header row: {e}"),
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ParseError::Section {
                section,
                reason: format!("undecodable row: {e}"),
            })?;
            if record.len() != headers.len() {
                return Err(ParseError::Section {
                    section,
                    reason: format!(
                        "row has {} cells, expected {}",
                        record.len(),
                        headers.len()
                    ),
                });
            }
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(DataTable::new(headers, rows))
    }

    fn parse_time_series(lines: &[&str]) -> Result<TimeSeries, ParseError> {
        let table = Self::parse_data_table("interest_over_time", lines)?;
        if table.headers.is_empty() {
            return Err(ParseError::Section {
                section: "interest_over_time",
                reason: "no columns".to_string(),
            });
        }

        let value_headers = table.headers[1..].to_vec();
        let mut rows = Vec::with_capacity(table.rows.len());
        for row in table.rows {
            let timestamp = Self::parse_timestamp(&row[0])?;
            rows.push(TimeSeriesRow {
                timestamp,
                values: row[1..].to_vec(),
            });
        }

        Ok(TimeSeries {
            value_headers,
            rows,
        })
    }

    /// Parse a time-series index cell: a bare date or one of the
    /// datetime layouts the export uses for finer granularities.
    fn parse_timestamp(cell: &str) -> Result<NaiveDateTime, ParseError> {
        let cell = cell.trim();

        if let Ok(date) = NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
            return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default());
        }
        for format in DATETIME_FORMATS {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(cell, format) {
                return Ok(datetime);
            }
        }

        Err(ParseError::Timestamp {
            value: cell.to_string(),
        })
    }
}
