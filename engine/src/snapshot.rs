//! Row-tolerant ingestion of externally hosted JSON snapshots.

use {
    crate::error::EngineError,
    log::*,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// Whether a snapshot was actually obtained.
///
/// An unavailable source aggregates exactly like an empty one; the status is
/// carried through to reports so callers can tell "nothing paid yet" from
/// "payout log could not be fetched".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceStatus {
    #[default]
    Loaded,
    Unavailable,
}

/// Split a JSON document into its top-level rows.
pub(crate) fn parse_rows(json: &str) -> Result<Vec<Value>, EngineError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(rows) => Ok(rows),
        other => Err(EngineError::NotAnArray {
            found: value_kind(&other),
        }),
    }
}

/// Convert every row with `parse`, skipping and counting those that fail.
pub(crate) fn ingest_rows<T>(
    label: &str,
    rows: Vec<Value>,
    mut parse: impl FnMut(usize, Value) -> Result<T, EngineError>,
) -> (Vec<T>, usize) {
    let mut records = Vec::with_capacity(rows.len());
    let mut malformed = 0usize;
    for (index, row) in rows.into_iter().enumerate() {
        match parse(index, row) {
            Ok(record) => records.push(record),
            Err(err) => {
                malformed = malformed.saturating_add(1);
                debug!("{label}: skipping row: {err}");
            }
        }
    }
    if malformed > 0 {
        info!(
            "{label}: ingested {} rows, skipped {malformed} malformed",
            records.len()
        );
    }
    (records, malformed)
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
