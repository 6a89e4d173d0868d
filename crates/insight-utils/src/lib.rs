//! Shared utilities for stock-insight
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and the number formatting used by prompts and the dashboard.

pub mod format;
pub mod logging;

pub use format::{delta_arrow, with_commas};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
