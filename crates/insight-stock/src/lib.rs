//! Index snapshot insight engine
//!
//! This crate turns an exchange index snapshot into per-stock analyses:
//!
//! - Snapshot fetching from the NSE India public API
//! - Normalization of the nested snapshot into a flat CSV dataset
//! - Derived metrics (52-week price position, traded value in crore)
//! - Threshold rules producing growth, valuation, technical, market and
//!   strategy insights
//! - A generated narrative from a pluggable text-generation provider
//! - A terminal dashboard and an interactive session
//!
//! # Architecture
//!
//! A query flows through the layers leaves first:
//! - [`Dataset`]: immutable quote rows loaded once at startup
//! - [`DerivedMetrics`]: per-query price position and traded value
//! - [`InsightEngine`]: pure rule evaluation
//! - [`Narrator`]: prompt rendering and the provider call
//! - [`AnalysisEngine`]: assembles everything into an [`AnalysisOutcome`]
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_stock::{AnalysisEngine, Dataset, InsightConfig, Narrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InsightConfig::builder().with_env().build()?;
//!     let dataset = Arc::new(Dataset::load(&config.dataset_path));
//!     let engine = AnalysisEngine::new(dataset, Narrator::from_config(&config)?);
//!
//!     let outcome = engine.analyze("INFY").await;
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod bot;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod interface;
pub mod narrative;

// Re-export main types for convenience
pub use analysis::{DerivedMetrics, InsightBucket, InsightCategory, InsightEngine, Insights};
pub use api::NseClient;
pub use config::{DecodingConfig, InsightConfig, NarrativeBackend};
pub use data::{Dataset, NormalizeError, QuoteField, QuoteRecord};
pub use engine::{AnalysisEngine, AnalysisFailure, AnalysisOutcome, AnalysisResult};
pub use error::{InsightError, Result};
pub use narrative::Narrator;
