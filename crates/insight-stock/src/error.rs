//! Error types for snapshot loading and stock analysis

use thiserror::Error;

use crate::data::NormalizeError;

/// Stock insight errors
#[derive(Debug, Error)]
pub enum InsightError {
    /// Symbol lookup found no row in the dataset
    #[error("Symbol not found in dataset: {0}")]
    MissingSymbol(String),

    /// A numeric field needed by the query is absent or not a number
    #[error("Field '{field}' is missing or not numeric for {symbol}")]
    FieldParse {
        symbol: String,
        field: &'static str,
    },

    /// 52-week high equals 52-week low, so the price position is undefined
    #[error("Cannot compute price position for {symbol}: 52-week high equals 52-week low ({level})")]
    DivisionByZero {
        symbol: String,
        level: f64,
    },

    /// The narrative collaborator failed, timed out or returned nothing
    #[error("Narrative generation failed: {0}")]
    GenerationFailure(String),

    /// A raw snapshot record could not be normalized
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The dataset file is malformed
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Exchange API returned an unusable response
    #[error("API error: {0}")]
    Api(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unparseable interactive command
    #[error("Command error: {0}")]
    Command(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result type alias for insight operations
pub type Result<T> = std::result::Result<T, InsightError>;

/// Every provider error is a generation failure from the query's point of view
impl From<insight_llm::LLMError> for InsightError {
    fn from(err: insight_llm::LLMError) -> Self {
        InsightError::GenerationFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InsightError::MissingSymbol("NOPE".to_string());
        assert_eq!(err.to_string(), "Symbol not found in dataset: NOPE");

        let err = InsightError::FieldParse {
            symbol: "TCS".to_string(),
            field: "yearHigh",
        };
        assert_eq!(err.to_string(), "Field 'yearHigh' is missing or not numeric for TCS");

        let err = InsightError::DivisionByZero {
            symbol: "ITC".to_string(),
            level: 450.0,
        };
        assert!(err.to_string().contains("52-week high equals 52-week low"));
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: InsightError = insight_llm::LLMError::AuthenticationFailed.into();
        match err {
            InsightError::GenerationFailure(msg) => {
                assert!(msg.contains("authentication"));
            }
            other => panic!("Expected GenerationFailure, got {other:?}"),
        }
    }
}
