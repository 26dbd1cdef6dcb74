//! CSV conversion
//!
//! Feed records are nested (a trend carries a list of news articles and
//! an optional image), so the CSV shape flattens them: the article list
//! becomes a JSON array in one cell, the image becomes two plain
//! columns, and the publication time is written as RFC 3339 so the CSV
//! round-trips without timezone loss.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::{OutputError, OutputResult};
use crate::{DataTable, NewsArticle, TrendImage, TrendRecord};

/// One CSV row of a flattened feed export.
#[derive(Debug, Serialize, Deserialize)]
struct FlatRecord {
    trend: String,
    traffic: String,
    published: String,
    image_url: String,
    image_source: String,
    news_articles: String,
}

impl TryFrom<&TrendRecord> for FlatRecord {
    type Error = OutputError;

    fn try_from(record: &TrendRecord) -> Result<Self, Self::Error> {
        let news_articles = serde_json::to_string(&record.news_articles)
            .map_err(|e| OutputError::Serialization(e.to_string()))?;
        let (image_url, image_source) = match &record.image {
            Some(image) => (image.url.clone(), image.source.clone()),
            None => (String::new(), String::new()),
        };
        Ok(Self {
            trend: record.trend.clone(),
            traffic: record.traffic.clone(),
            published: record.published.to_rfc3339(),
            image_url,
            image_source,
            news_articles,
        })
    }
}

impl TryFrom<FlatRecord> for TrendRecord {
    type Error = OutputError;

    fn try_from(flat: FlatRecord) -> Result<Self, Self::Error> {
        let published = DateTime::parse_from_rfc3339(&flat.published).map_err(|e| {
            OutputError::Malformed(format!("bad published timestamp '{}': {e}", flat.published))
        })?;
        let news_articles: Vec<NewsArticle> = if flat.news_articles.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&flat.news_articles)
                .map_err(|e| OutputError::Malformed(format!("bad news_articles cell: {e}")))?
        };
        let image = if flat.image_url.is_empty() {
            None
        } else {
            Some(TrendImage {
                url: flat.image_url,
                source: flat.image_source,
            })
        };
        Ok(TrendRecord {
            trend: flat.trend,
            traffic: flat.traffic,
            published,
            news_articles,
            image,
        })
    }
}

/// Serialize feed records to a CSV document.
pub fn records_to_csv(records: &[TrendRecord]) -> OutputResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        let flat = FlatRecord::try_from(record)?;
        writer
            .serialize(flat)
            .map_err(|e| OutputError::Csv(e.to_string()))?;
    }
    finish(writer)
}

/// Deserialize feed records from a CSV document produced by
/// [`records_to_csv`].
pub fn records_from_csv(data: &str) -> OutputResult<Vec<TrendRecord>> {
    let mut reader = csv::Reader::from_reader(data.as_bytes());
    let mut records = Vec::new();
    for result in reader.deserialize::<FlatRecord>() {
        let flat = result.map_err(|e| OutputError::Csv(e.to_string()))?;
        records.push(TrendRecord::try_from(flat)?);
    }
    Ok(records)
}

/// Serialize a generic table to a CSV document.
pub fn table_to_csv(table: &DataTable) -> OutputResult<String> {
    table
        .validate()
        .map_err(|e| OutputError::Malformed(e.to_string()))?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|e| OutputError::Csv(e.to_string()))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| OutputError::Csv(e.to_string()))?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> OutputResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| OutputError::Csv(e.to_string()))
}
