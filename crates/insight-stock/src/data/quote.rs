//! Flat per-instrument quote row

use serde::Serialize;

use crate::error::{InsightError, Result};

/// Numeric columns of a quote row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteField {
    Open,
    DayHigh,
    DayLow,
    LastPrice,
    PreviousClose,
    Change,
    PChange,
    YearHigh,
    YearLow,
    TotalTradedVolume,
    TotalTradedValue,
    PerChange365d,
    PerChange30d,
}

impl QuoteField {
    /// All numeric columns in dataset order
    pub const ALL: [QuoteField; 13] = [
        QuoteField::Open,
        QuoteField::DayHigh,
        QuoteField::DayLow,
        QuoteField::LastPrice,
        QuoteField::PreviousClose,
        QuoteField::Change,
        QuoteField::PChange,
        QuoteField::YearHigh,
        QuoteField::YearLow,
        QuoteField::TotalTradedVolume,
        QuoteField::TotalTradedValue,
        QuoteField::PerChange365d,
        QuoteField::PerChange30d,
    ];

    /// Column name as used by the exchange feed and the CSV dataset
    pub fn column(&self) -> &'static str {
        match self {
            QuoteField::Open => "open",
            QuoteField::DayHigh => "dayHigh",
            QuoteField::DayLow => "dayLow",
            QuoteField::LastPrice => "lastPrice",
            QuoteField::PreviousClose => "previousClose",
            QuoteField::Change => "change",
            QuoteField::PChange => "pChange",
            QuoteField::YearHigh => "yearHigh",
            QuoteField::YearLow => "yearLow",
            QuoteField::TotalTradedVolume => "totalTradedVolume",
            QuoteField::TotalTradedValue => "totalTradedValue",
            QuoteField::PerChange365d => "perChange365d",
            QuoteField::PerChange30d => "perChange30d",
        }
    }
}

/// One row per traded instrument
///
/// Numeric fields are `None` when the source value was absent or not a
/// number. `last_price` is allowed to sit outside the 52-week range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub symbol: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub last_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<f64>,
    pub p_change: Option<f64>,
    pub year_high: Option<f64>,
    pub year_low: Option<f64>,
    pub total_traded_volume: Option<f64>,
    pub total_traded_value: Option<f64>,
    #[serde(rename = "perChange365d")]
    pub per_change_365d: Option<f64>,
    #[serde(rename = "perChange30d")]
    pub per_change_30d: Option<f64>,
}

impl QuoteRecord {
    /// Create an empty record for a symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Value of a numeric field
    pub fn get(&self, field: QuoteField) -> Option<f64> {
        match field {
            QuoteField::Open => self.open,
            QuoteField::DayHigh => self.day_high,
            QuoteField::DayLow => self.day_low,
            QuoteField::LastPrice => self.last_price,
            QuoteField::PreviousClose => self.previous_close,
            QuoteField::Change => self.change,
            QuoteField::PChange => self.p_change,
            QuoteField::YearHigh => self.year_high,
            QuoteField::YearLow => self.year_low,
            QuoteField::TotalTradedVolume => self.total_traded_volume,
            QuoteField::TotalTradedValue => self.total_traded_value,
            QuoteField::PerChange365d => self.per_change_365d,
            QuoteField::PerChange30d => self.per_change_30d,
        }
    }

    /// Mutable slot of a numeric field
    pub fn slot_mut(&mut self, field: QuoteField) -> &mut Option<f64> {
        match field {
            QuoteField::Open => &mut self.open,
            QuoteField::DayHigh => &mut self.day_high,
            QuoteField::DayLow => &mut self.day_low,
            QuoteField::LastPrice => &mut self.last_price,
            QuoteField::PreviousClose => &mut self.previous_close,
            QuoteField::Change => &mut self.change,
            QuoteField::PChange => &mut self.p_change,
            QuoteField::YearHigh => &mut self.year_high,
            QuoteField::YearLow => &mut self.year_low,
            QuoteField::TotalTradedVolume => &mut self.total_traded_volume,
            QuoteField::TotalTradedValue => &mut self.total_traded_value,
            QuoteField::PerChange365d => &mut self.per_change_365d,
            QuoteField::PerChange30d => &mut self.per_change_30d,
        }
    }

    /// Set a numeric field, builder style
    pub fn with(mut self, field: QuoteField, value: f64) -> Self {
        *self.slot_mut(field) = Some(value);
        self
    }

    /// Resolved value of a field the caller cannot do without
    pub fn require(&self, field: QuoteField) -> Result<f64> {
        self.get(field).ok_or_else(|| InsightError::FieldParse {
            symbol: self.symbol.clone(),
            field: field.column(),
        })
    }

    /// Industry name, `"N/A"` when unknown
    pub fn industry_or_na(&self) -> &str {
        self.industry.as_deref().unwrap_or("N/A")
    }

    /// Company name, falling back to the symbol
    pub fn company_or_symbol(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.symbol)
    }
}

/// Parse a loosely formatted number: `"1,234.5"`, `" 12 "`, `"-3.2"`
///
/// Placeholders such as `"-"` or `""` yield `None`, as do NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
