//! Projection of raw exchange snapshot records into flat quote rows
//!
//! The exchange feed nests company metadata under `meta` and sometimes sends
//! numbers as strings. Normalization is strict about which keys exist and
//! lenient about what they contain: a missing key rejects the record, an
//! unparseable value becomes `None`.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::quote::{QuoteField, QuoteRecord, parse_number};

/// Why a raw record could not be normalized
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    /// The record is not a JSON object
    #[error("Snapshot record is not an object")]
    NotAnObject,

    /// A required key is absent
    #[error("Snapshot record {symbol} is missing required field '{field}'")]
    MissingField {
        symbol: String,
        field: &'static str,
    },

    /// The snapshot has no `data` array
    #[error("Snapshot has no 'data' array")]
    MissingData,
}

/// Outcome of normalizing a whole snapshot
#[derive(Debug, Default)]
pub struct NormalizedSnapshot {
    /// Records that normalized cleanly, in feed order
    pub records: Vec<QuoteRecord>,
    /// Records that were rejected, with the reason
    pub skipped: Vec<NormalizeError>,
}

/// Normalize one raw record
pub fn normalize_record(raw: &Value) -> Result<QuoteRecord, NormalizeError> {
    let object = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

    let symbol = match object.get("symbol") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(other) if !other.is_null() && !other.is_string() => other.to_string(),
        _ => {
            return Err(NormalizeError::MissingField {
                symbol: "<unknown>".to_string(),
                field: "symbol",
            });
        }
    };

    let mut record = QuoteRecord::new(symbol);

    if let Some(meta) = object.get("meta").and_then(Value::as_object) {
        record.company_name = meta_text(meta, "companyName");
        record.industry = meta_text(meta, "industry");
    }

    for field in QuoteField::ALL {
        let value = object
            .get(field.column())
            .ok_or_else(|| NormalizeError::MissingField {
                symbol: record.symbol.clone(),
                field: field.column(),
            })?;
        *record.slot_mut(field) = number(value);
    }

    Ok(record)
}

/// Normalize every record under the snapshot's `data` array
///
/// Rejected records are logged and collected in `skipped`; they never abort
/// the batch.
pub fn normalize_snapshot(snapshot: &Value) -> Result<NormalizedSnapshot, NormalizeError> {
    let data = snapshot
        .get("data")
        .and_then(Value::as_array)
        .ok_or(NormalizeError::MissingData)?;

    let mut out = NormalizedSnapshot::default();
    for raw in data {
        match normalize_record(raw) {
            Ok(record) => out.records.push(record),
            Err(err) => {
                warn!("Skipping snapshot record: {err}");
                out.skipped.push(err);
            }
        }
    }

    debug!(
        "Normalized {} records ({} skipped)",
        out.records.len(),
        out.skipped.len()
    );
    Ok(out)
}

fn meta_text(meta: &Map<String, Value>, key: &str) -> Option<String> {
    meta.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}
