//! Threshold rules that turn raw and derived metrics into short insight fragments

use serde::Serialize;

use super::metrics::DerivedMetrics;
use crate::data::{QuoteField, QuoteRecord};
use crate::error::Result;

/// Insight bucket kinds, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightCategory {
    Growth,
    Valuation,
    Technical,
    Market,
    Strategy,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 5] = [
        InsightCategory::Growth,
        InsightCategory::Valuation,
        InsightCategory::Technical,
        InsightCategory::Market,
        InsightCategory::Strategy,
    ];

    /// Key used in serialized results
    pub fn key(&self) -> &'static str {
        match self {
            InsightCategory::Growth => "growth",
            InsightCategory::Valuation => "valuation",
            InsightCategory::Technical => "technical",
            InsightCategory::Market => "market",
            InsightCategory::Strategy => "strategy",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            InsightCategory::Growth => "✅",
            InsightCategory::Valuation => "⚠️",
            InsightCategory::Technical => "📈",
            InsightCategory::Market => "🌍",
            InsightCategory::Strategy => "💡",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            InsightCategory::Growth => "Growth Analysis",
            InsightCategory::Valuation => "Valuation Risk",
            InsightCategory::Technical => "Technical Indicators",
            InsightCategory::Market => "Market Risks",
            InsightCategory::Strategy => "Investment Strategy",
        }
    }

    /// Label used for this bucket in the narrative prompt
    pub fn prompt_label(&self) -> &'static str {
        match self {
            InsightCategory::Growth => "Growth",
            InsightCategory::Valuation => "Valuation",
            InsightCategory::Technical => "Technical Indicators",
            InsightCategory::Market => "Market Risks",
            InsightCategory::Strategy => "Strategy",
        }
    }
}

/// One category's fragments with display metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightBucket {
    pub icon: String,
    pub title: String,
    pub details: Vec<String>,
}

impl InsightBucket {
    fn new(category: InsightCategory, details: Vec<String>) -> Self {
        Self {
            icon: category.icon().to_string(),
            title: category.title().to_string(),
            details,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

/// The five insight buckets of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub growth: InsightBucket,
    pub valuation: InsightBucket,
    pub technical: InsightBucket,
    pub market: InsightBucket,
    pub strategy: InsightBucket,
}

impl Insights {
    pub fn bucket(&self, category: InsightCategory) -> &InsightBucket {
        match category {
            InsightCategory::Growth => &self.growth,
            InsightCategory::Valuation => &self.valuation,
            InsightCategory::Technical => &self.technical,
            InsightCategory::Market => &self.market,
            InsightCategory::Strategy => &self.strategy,
        }
    }

    /// Buckets in display order
    pub fn iter(&self) -> impl Iterator<Item = (InsightCategory, &InsightBucket)> {
        InsightCategory::ALL.into_iter().map(move |c| (c, self.bucket(c)))
    }
}

/// Thresholds shared by the rules
mod threshold {
    pub const STRONG_YEARLY: f64 = 20.0;
    pub const ROBUST_MONTHLY: f64 = 10.0;
    pub const NEAR_HIGH: f64 = 80.0;
    pub const NEAR_LOW: f64 = 20.0;
    pub const OVERBOUGHT: f64 = 90.0;
    pub const OVERSOLD: f64 = 10.0;
    pub const HIGH_ACTIVITY_CR: f64 = 1000.0;
    pub const VOLATILE_DAILY: f64 = 3.0;
}

/// Stateless rule evaluator
///
/// Each bucket is evaluated independently, so the near-high valuation rule and
/// the overbought technical rule can both fire for the same quote.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightEngine;

impl InsightEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every rule for one quote
    pub fn evaluate(&self, record: &QuoteRecord, metrics: &DerivedMetrics) -> Result<Insights> {
        let yearly = record.require(QuoteField::PerChange365d)?;
        let monthly = record.require(QuoteField::PerChange30d)?;
        let daily = record.require(QuoteField::PChange)?;
        let position = metrics.price_position_pct;

        Ok(Insights {
            growth: InsightBucket::new(InsightCategory::Growth, growth(yearly, monthly)),
            valuation: InsightBucket::new(InsightCategory::Valuation, valuation(position)),
            technical: InsightBucket::new(
                InsightCategory::Technical,
                technical(position, metrics.traded_value_cr),
            ),
            market: InsightBucket::new(
                InsightCategory::Market,
                market(record.industry_or_na(), daily),
            ),
            strategy: InsightBucket::new(InsightCategory::Strategy, strategy(position)),
        })
    }
}

fn growth(yearly: f64, monthly: f64) -> Vec<String> {
    let mut details = Vec::new();

    if yearly > threshold::STRONG_YEARLY {
        details.push(format!("Strong yearly growth of {yearly:.1}%"));
    } else if yearly < -threshold::STRONG_YEARLY {
        details.push(format!("Significant decline of {yearly:.1}%"));
    }

    if monthly > threshold::ROBUST_MONTHLY {
        details.push(format!("Robust monthly performance: +{monthly:.1}%"));
    }

    if details.is_empty() {
        details.push(format!("Moderate growth with {yearly:.1}% yearly change"));
    }
    details
}

fn valuation(position: f64) -> Vec<String> {
    let detail = if position > threshold::NEAR_HIGH {
        "Trading near 52-week high, potential overvaluation".to_string()
    } else if position < threshold::NEAR_LOW {
        "Trading near 52-week low, possible undervaluation".to_string()
    } else {
        format!("Trading at {position:.1}% of 52-week range")
    };
    vec![detail]
}

fn technical(position: f64, value_cr: f64) -> Vec<String> {
    let mut details = Vec::new();

    if position > threshold::OVERBOUGHT {
        details.push("Strongly overbought conditions".to_string());
    } else if position < threshold::OVERSOLD {
        details.push("Strongly oversold conditions".to_string());
    }

    if value_cr > threshold::HIGH_ACTIVITY_CR {
        details.push(format!("High trading activity: ₹{value_cr:.0}Cr"));
    }

    if details.is_empty() {
        details.push("Neutral technical indicators".to_string());
    }
    details
}

fn market(industry: &str, daily: f64) -> Vec<String> {
    let mut details = vec![format!("Monitor {industry} sector trends")];
    if daily.abs() > threshold::VOLATILE_DAILY {
        details.push(format!("High volatility: {daily:+.1}% daily change"));
    }
    details
}

fn strategy(position: f64) -> Vec<String> {
    let detail = if position > threshold::NEAR_HIGH {
        "Consider profit booking or staggered exit"
    } else if position < threshold::NEAR_LOW {
        "Opportunity for gradual accumulation"
    } else {
        "Hold with strict stop-loss"
    };
    vec![detail.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;

    fn quote(yearly: f64, monthly: f64, daily: f64) -> QuoteRecord {
        QuoteRecord::new("INFY")
            .with(QuoteField::PerChange365d, yearly)
            .with(QuoteField::PerChange30d, monthly)
            .with(QuoteField::PChange, daily)
    }

    fn metrics(position: f64, value_cr: f64) -> DerivedMetrics {
        DerivedMetrics {
            price_position_pct: position,
            traded_value_cr: value_cr,
        }
    }

    fn evaluate(record: &QuoteRecord, metrics: &DerivedMetrics) -> Insights {
        InsightEngine::new().evaluate(record, metrics).unwrap()
    }

    #[test]
    fn test_strong_yearly_growth() {
        let insights = evaluate(&quote(25.0, 0.0, 0.0), &metrics(50.0, 10.0));
        assert!(
            insights
                .growth
                .details
                .contains(&"Strong yearly growth of 25.0%".to_string())
        );
    }

    #[test]
    fn test_decline_only() {
        let insights = evaluate(&quote(-25.0, 0.0, 0.0), &metrics(50.0, 10.0));
        assert_eq!(insights.growth.details, vec!["Significant decline of -25.0%"]);
    }

    #[test]
    fn test_growth_fallback() {
        let insights = evaluate(&quote(5.0, 5.0, 0.0), &metrics(50.0, 10.0));
        assert_eq!(
            insights.growth.details,
            vec!["Moderate growth with 5.0% yearly change"]
        );
    }

    #[test]
    fn test_growth_rules_are_independent() {
        let insights = evaluate(&quote(30.0, 12.34, 0.0), &metrics(50.0, 10.0));
        assert_eq!(
            insights.growth.details,
            vec![
                "Strong yearly growth of 30.0%",
                "Robust monthly performance: +12.3%"
            ]
        );
    }

    #[test]
    fn test_near_high_fires_valuation_and_technical() {
        let insights = evaluate(&quote(0.0, 0.0, 0.0), &metrics(95.0, 10.0));
        assert_eq!(
            insights.valuation.details,
            vec!["Trading near 52-week high, potential overvaluation"]
        );
        assert_eq!(insights.technical.details, vec!["Strongly overbought conditions"]);
        assert_eq!(
            insights.strategy.details,
            vec!["Consider profit booking or staggered exit"]
        );
    }

    #[test]
    fn test_neutral_technicals() {
        let insights = evaluate(&quote(0.0, 0.0, 0.0), &metrics(50.0, 500.0));
        assert_eq!(insights.technical.details, vec!["Neutral technical indicators"]);
        assert_eq!(
            insights.valuation.details,
            vec!["Trading at 50.0% of 52-week range"]
        );
        assert_eq!(insights.strategy.details, vec!["Hold with strict stop-loss"]);
    }

    #[test]
    fn test_oversold_with_heavy_trading() {
        let insights = evaluate(&quote(0.0, 0.0, 0.0), &metrics(-5.0, 1540.6));
        assert_eq!(
            insights.technical.details,
            vec!["Strongly oversold conditions", "High trading activity: ₹1541Cr"]
        );
        assert_eq!(
            insights.valuation.details,
            vec!["Trading near 52-week low, possible undervaluation"]
        );
        assert_eq!(
            insights.strategy.details,
            vec!["Opportunity for gradual accumulation"]
        );
    }

    #[test]
    fn test_market_bucket() {
        let record = quote(0.0, 0.0, -3.5);
        let insights = evaluate(&record, &metrics(50.0, 10.0));
        assert_eq!(
            insights.market.details,
            vec!["Monitor N/A sector trends", "High volatility: -3.5% daily change"]
        );

        let mut record = quote(0.0, 0.0, 3.0);
        record.industry = Some("Private Sector Bank".to_string());
        let insights = evaluate(&record, &metrics(50.0, 10.0));
        assert_eq!(
            insights.market.details,
            vec!["Monitor Private Sector Bank sector trends"]
        );
    }

    #[test]
    fn test_bucket_metadata() {
        let insights = evaluate(&quote(0.0, 0.0, 0.0), &metrics(50.0, 10.0));
        let titles: Vec<(&str, &str)> = insights
            .iter()
            .map(|(_, b)| (b.icon.as_str(), b.title.as_str()))
            .collect();
        assert_eq!(
            titles,
            vec![
                ("✅", "Growth Analysis"),
                ("⚠️", "Valuation Risk"),
                ("📈", "Technical Indicators"),
                ("🌍", "Market Risks"),
                ("💡", "Investment Strategy"),
            ]
        );
    }

    #[test]
    fn test_missing_change_field() {
        let record = QuoteRecord::new("INFY").with(QuoteField::PerChange365d, 1.0);
        let result = InsightEngine::new().evaluate(&record, &metrics(50.0, 10.0));
        assert!(matches!(
            result,
            Err(InsightError::FieldParse { field: "perChange30d", .. })
        ));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let record = quote(21.0, 11.0, 4.0);
        let m = metrics(85.0, 2000.0);
        assert_eq!(evaluate(&record, &m), evaluate(&record, &m));
    }
}
