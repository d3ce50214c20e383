//! Helpers for unpacking ScienceDirect search payloads
//!
//! The PUT search endpoint reports `resultsFound` either as a JSON number
//! or as an integer-in-a-string, and only includes `results` when there is
//! something to return. These helpers normalize both quirks and keep the
//! contract errors distinct from transport failures.

use serde_json::{Map, Value};

use crate::error::{Result, SciDirectError};

/// Total match count reported by a search response
pub(crate) fn results_found(response: &Value) -> Result<u64> {
    let value = response
        .get("resultsFound")
        .ok_or_else(|| SciDirectError::MissingField {
            field: "resultsFound".to_string(),
        })?;

    match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| SciDirectError::SchemaError {
            message: format!("`resultsFound` is not a non-negative integer: {n}"),
        }),
        Value::String(s) => s.parse().map_err(|_| SciDirectError::SchemaError {
            message: format!("`resultsFound` is not an integer: '{s}'"),
        }),
        other => Err(SciDirectError::SchemaError {
            message: format!("`resultsFound` has unexpected type: {other}"),
        }),
    }
}

/// The raw result records of one search response page
pub(crate) fn result_records(response: &Value) -> Result<Vec<Map<String, Value>>> {
    let results = response
        .get("results")
        .ok_or_else(|| SciDirectError::MissingField {
            field: "results".to_string(),
        })?;

    let entries = results.as_array().ok_or_else(|| SciDirectError::SchemaError {
        message: "`results` is not an array".to_string(),
    })?;

    entries
        .iter()
        .map(|entry| {
            entry
                .as_object()
                .cloned()
                .ok_or_else(|| SciDirectError::SchemaError {
                    message: format!("`results` entry is not an object: {entry}"),
                })
        })
        .collect()
}

/// Render a record field as a string, passing strings through untouched
pub(crate) fn field_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
