//! JSON conversion

use serde_json::{json, Map, Value};

use super::{OutputError, OutputResult};
use crate::{DataTable, SectionedTable, TrendRecord};

/// Serialize feed records to a pretty-printed JSON array.
pub fn records_to_json(records: &[TrendRecord]) -> OutputResult<String> {
    serde_json::to_string_pretty(records).map_err(|e| OutputError::Serialization(e.to_string()))
}

/// Deserialize feed records from a JSON array.
pub fn records_from_json(data: &str) -> OutputResult<Vec<TrendRecord>> {
    serde_json::from_str(data).map_err(|e| OutputError::Serialization(e.to_string()))
}

/// Serialize a generic table as an array of objects, one per row, keyed
/// by column name.
pub fn table_to_json(table: &DataTable) -> OutputResult<String> {
    table
        .validate()
        .map_err(|e| OutputError::Malformed(e.to_string()))?;

    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .headers
                .iter()
                .zip(row)
                .map(|(header, cell)| (header.clone(), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();

    serde_json::to_string_pretty(&rows).map_err(|e| OutputError::Serialization(e.to_string()))
}

/// Serialize an explore result as one object with a key per present
/// section. Absent sections are omitted rather than written as null.
pub fn sectioned_to_json(sectioned: &SectionedTable) -> OutputResult<String> {
    let mut object = Map::new();
    if let Some(series) = &sectioned.interest_over_time {
        object.insert("interest_over_time".to_string(), json!(series));
    }
    if let Some(table) = &sectioned.interest_by_region {
        object.insert("interest_by_region".to_string(), json!(table));
    }
    if let Some(table) = &sectioned.related_topics_top {
        object.insert("related_topics_top".to_string(), json!(table));
    }
    if let Some(table) = &sectioned.related_topics_rising {
        object.insert("related_topics_rising".to_string(), json!(table));
    }
    if let Some(table) = &sectioned.related_queries_top {
        object.insert("related_queries_top".to_string(), json!(table));
    }
    if let Some(table) = &sectioned.related_queries_rising {
        object.insert("related_queries_rising".to_string(), json!(table));
    }

    serde_json::to_string_pretty(&Value::Object(object))
        .map_err(|e| OutputError::Serialization(e.to_string()))
}
