//! Metrics derived from a single quote row

use serde::Serialize;

use crate::data::{QuoteField, QuoteRecord};
use crate::error::{InsightError, Result};

/// Rupees per crore
pub const CRORE: f64 = 10_000_000.0;

/// Per-query derived values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Where the last price sits in the 52-week range, in percent
    ///
    /// Not clamped: a price below the 52-week low gives a negative value.
    pub price_position_pct: f64,
    /// Total traded value in crore
    pub traded_value_cr: f64,
}

impl DerivedMetrics {
    /// Compute the metrics for a record
    pub fn derive(record: &QuoteRecord) -> Result<Self> {
        let last = record.require(QuoteField::LastPrice)?;
        let high = record.require(QuoteField::YearHigh)?;
        let low = record.require(QuoteField::YearLow)?;
        let traded_value = record.require(QuoteField::TotalTradedValue)?;

        Ok(Self {
            price_position_pct: price_position(&record.symbol, last, low, high)?,
            traded_value_cr: traded_value / CRORE,
        })
    }
}

/// `(last - low) / (high - low) * 100`
pub fn price_position(symbol: &str, last: f64, low: f64, high: f64) -> Result<f64> {
    let range = high - low;
    if range == 0.0 {
        return Err(InsightError::DivisionByZero {
            symbol: symbol.to_string(),
            level: high,
        });
    }
    Ok((last - low) / range * 100.0)
}
