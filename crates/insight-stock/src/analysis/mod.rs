//! Derived metrics and rule-based insights

pub mod insights;
pub mod metrics;

pub use insights::{InsightBucket, InsightCategory, InsightEngine, Insights};
pub use metrics::{CRORE, DerivedMetrics, price_position};
