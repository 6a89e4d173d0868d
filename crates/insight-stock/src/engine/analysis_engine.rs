//! Analysis engine: dataset lookup, metrics, rules and narrative in one query

use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::result::{AnalysisOutcome, AnalysisResult};
use crate::analysis::{DerivedMetrics, InsightEngine};
use crate::data::Dataset;
use crate::error::Result;
use crate::narrative::Narrator;

/// Answers `analyze(symbol)` queries against an immutable dataset
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    dataset: Arc<Dataset>,
    rules: InsightEngine,
    narrator: Narrator,
}

impl AnalysisEngine {
    pub fn new(dataset: Arc<Dataset>, narrator: Narrator) -> Self {
        Self {
            dataset,
            rules: InsightEngine::new(),
            narrator,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Analyze a symbol, returning an error record on any failure
    pub async fn analyze(&self, symbol: &str) -> AnalysisOutcome {
        match self.try_analyze(symbol).await {
            Ok(result) => result.into(),
            Err(e) => {
                warn!("Analysis of {symbol} failed: {e}");
                AnalysisOutcome::failure(e)
            }
        }
    }

    /// Analyze a symbol, propagating the first error
    #[instrument(skip(self))]
    pub async fn try_analyze(&self, symbol: &str) -> Result<AnalysisResult> {
        let record = self.dataset.require(symbol)?;
        let metrics = DerivedMetrics::derive(record)?;
        let insights = self.rules.evaluate(record, &metrics)?;
        let narrative = self.narrator.narrate(record, &metrics, &insights).await?;

        let result = AnalysisResult::assemble(record, &metrics, insights, narrative)?;
        info!(
            "Analyzed {symbol}: position {:.1}%, value ₹{:.0}Cr",
            metrics.price_position_pct, metrics.traded_value_cr
        );
        Ok(result)
    }
}
