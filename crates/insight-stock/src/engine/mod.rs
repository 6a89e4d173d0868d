//! Analysis engine
//!
//! Assembles one immutable result per query from the dataset row, its derived
//! metrics, the rule output and the generated narrative.

pub mod analysis_engine;
pub mod result;

pub use analysis_engine::AnalysisEngine;
pub use result::{
    AnalysisFailure, AnalysisOutcome, AnalysisResult, BasicInfo, Performance, PriceData,
    PriceRange, TradingInfo,
};
