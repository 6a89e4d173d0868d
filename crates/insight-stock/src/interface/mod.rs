//! Terminal presentation

pub mod dashboard;

pub use dashboard::{
    format_delta, render_analysis, render_industries, render_outcome, render_quote_list,
};
