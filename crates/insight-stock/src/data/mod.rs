//! Quote rows, snapshot normalization and the CSV dataset

pub mod dataset;
pub mod normalizer;
pub mod quote;

pub use dataset::{ALL_INDUSTRIES, Dataset, INDEX_SYMBOL};
pub use normalizer::{NormalizeError, NormalizedSnapshot, normalize_record, normalize_snapshot};
pub use quote::{QuoteField, QuoteRecord, parse_number};
