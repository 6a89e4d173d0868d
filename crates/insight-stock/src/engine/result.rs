//! Analysis result types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::{DerivedMetrics, Insights};
use crate::data::{QuoteField, QuoteRecord};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub symbol: String,
    pub company: String,
    pub industry: String,
}

/// Low/high pair; day bounds may be unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange<T> {
    pub low: T,
    pub high: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceData {
    pub current_price: f64,
    pub day_range: PriceRange<Option<f64>>,
    pub year_range: PriceRange<f64>,
    pub price_position: f64,
}

/// Percentage changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Performance {
    pub daily_change: f64,
    pub monthly_change: f64,
    pub yearly_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradingInfo {
    pub volume: Option<u64>,
    pub value_cr: f64,
}

/// Full analysis of one symbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub basic_info: BasicInfo,
    pub price_data: PriceData,
    pub performance: Performance,
    pub trading_info: TradingInfo,
    pub insights: Insights,
    pub ai_analysis: String,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Assemble a result from its computed parts
    pub fn assemble(
        record: &QuoteRecord,
        metrics: &DerivedMetrics,
        insights: Insights,
        narrative: String,
    ) -> Result<Self> {
        Ok(Self {
            basic_info: BasicInfo {
                symbol: record.symbol.clone(),
                company: record.company_or_symbol().to_string(),
                industry: record.industry_or_na().to_string(),
            },
            price_data: PriceData {
                current_price: record.require(QuoteField::LastPrice)?,
                day_range: PriceRange {
                    low: record.day_low,
                    high: record.day_high,
                },
                year_range: PriceRange {
                    low: record.require(QuoteField::YearLow)?,
                    high: record.require(QuoteField::YearHigh)?,
                },
                price_position: metrics.price_position_pct,
            },
            performance: Performance {
                daily_change: record.require(QuoteField::PChange)?,
                monthly_change: record.require(QuoteField::PerChange30d)?,
                yearly_change: record.require(QuoteField::PerChange365d)?,
            },
            trading_info: TradingInfo {
                volume: record
                    .total_traded_volume
                    .filter(|v| *v >= 0.0)
                    .map(|v| v as u64),
                value_cr: metrics.traded_value_cr,
            },
            insights,
            ai_analysis: narrative,
            generated_at: Utc::now(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.basic_info.symbol
    }

    /// Derived metrics this result was built from
    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            price_position_pct: self.price_data.price_position,
            traded_value_cr: self.trading_info.value_cr,
        }
    }
}

/// Error record returned in place of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
}

/// Outcome of one query: the full result or only an error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(Box<AnalysisResult>),
    Failure(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn failure(error: impl std::fmt::Display) -> Self {
        AnalysisOutcome::Failure(AnalysisFailure {
            error: error.to_string(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Success(result) => Some(result),
            AnalysisOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Success(_) => None,
            AnalysisOutcome::Failure(failure) => Some(&failure.error),
        }
    }
}

impl From<AnalysisResult> for AnalysisOutcome {
    fn from(result: AnalysisResult) -> Self {
        AnalysisOutcome::Success(Box::new(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::InsightEngine;

    fn record() -> QuoteRecord {
        let mut record = QuoteRecord::new("HDFCBANK")
            .with(QuoteField::LastPrice, 1710.0)
            .with(QuoteField::DayLow, 1690.0)
            .with(QuoteField::DayHigh, 1720.0)
            .with(QuoteField::YearLow, 1363.0)
            .with(QuoteField::YearHigh, 1794.0)
            .with(QuoteField::TotalTradedVolume, 9_000_000.0)
            .with(QuoteField::TotalTradedValue, 15_400_000_000.0)
            .with(QuoteField::PChange, 0.88)
            .with(QuoteField::PerChange30d, 4.0)
            .with(QuoteField::PerChange365d, 12.0);
        record.company_name = Some("HDFC Bank Limited".to_string());
        record
    }

    fn assembled() -> AnalysisResult {
        let record = record();
        let metrics = DerivedMetrics::derive(&record).unwrap();
        let insights = InsightEngine::new().evaluate(&record, &metrics).unwrap();
        AnalysisResult::assemble(&record, &metrics, insights, "Steady.".to_string()).unwrap()
    }

    #[test]
    fn test_assemble() {
        let result = assembled();
        assert_eq!(result.symbol(), "HDFCBANK");
        assert_eq!(result.basic_info.company, "HDFC Bank Limited");
        assert_eq!(result.basic_info.industry, "N/A");
        assert_eq!(result.price_data.day_range.low, Some(1690.0));
        assert_eq!(result.trading_info.volume, Some(9_000_000));
        assert!((result.trading_info.value_cr - 1540.0).abs() < 1e-9);
        assert_eq!(result.ai_analysis, "Steady.");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(AnalysisOutcome::from(assembled())).unwrap();
        assert_eq!(json["basic_info"]["symbol"], "HDFCBANK");
        assert_eq!(json["price_data"]["year_range"]["high"], 1794.0);
        assert_eq!(json["performance"]["monthly_change"], 4.0);
        assert_eq!(json["insights"]["growth"]["title"], "Growth Analysis");
        assert_eq!(json["insights"]["strategy"]["icon"], "💡");
        assert!(json["generated_at"].is_string());
    }

    #[test]
    fn test_failure_serializes_as_error_object() {
        let outcome = AnalysisOutcome::failure("Symbol not found in dataset: NOPE");
        assert!(!outcome.is_success());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({ "error": "Symbol not found in dataset: NOPE" })
        );
    }
}
