//! Terminal rendering of datasets and analysis results

use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, Table};
use insight_utils::{delta_arrow, with_commas};

use crate::data::{Dataset, INDEX_SYMBOL, QuoteRecord};
use crate::engine::{AnalysisOutcome, AnalysisResult};

const BAR_WIDTH: usize = 30;

/// `"↑ +1.25%"` style change text
pub fn format_delta(value: f64) -> String {
    format!("{} {value:+.2}%", delta_arrow(value))
}

fn rupees(value: f64) -> String {
    format!("₹{}", with_commas(value, 2))
}

fn crore(value: f64) -> String {
    format!("₹{}Cr", with_commas(value, 0))
}

/// Company and industry as shown in headers; the index row gets fixed labels
pub fn header_names<'a>(symbol: &str, company: &'a str, industry: &'a str) -> (&'a str, &'a str) {
    if symbol == INDEX_SYMBOL {
        ("NSE Indices", "Market Index")
    } else {
        (company, industry)
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

/// Table of the quotes in one industry filter
pub fn render_quote_list(dataset: &Dataset, records: &[&QuoteRecord]) -> String {
    if records.is_empty() {
        return "No stocks match the current filter.".to_string();
    }

    let mut table = base_table();
    table.set_header(vec!["Stock", "Industry", "Price", "Change"]);
    for record in records {
        let (_, industry) = header_names(
            &record.symbol,
            record.company_or_symbol(),
            record.industry_or_na(),
        );
        table.add_row(vec![
            dataset.display_label(&record.symbol),
            industry.to_string(),
            record.last_price.map_or_else(|| "-".to_string(), rupees),
            record.p_change.map_or_else(|| "-".to_string(), format_delta),
        ]);
    }
    align_numeric(&mut table, &[2, 3]);
    table.to_string()
}

/// Industry picker contents, `"All"` first
pub fn render_industries(dataset: &Dataset) -> String {
    let mut out = String::from("Industries:\n  All\n");
    for industry in dataset.industries() {
        out.push_str(&format!("  {industry}\n"));
    }
    out
}

/// Render an outcome: the full dashboard or the error line
pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Success(result) => render_analysis(result),
        AnalysisOutcome::Failure(failure) => format!("❌ Error in analysis: {}", failure.error),
    }
}

/// Full dashboard for one analysis
pub fn render_analysis(result: &AnalysisResult) -> String {
    [
        render_overview(result),
        format!("🤖 AI Summary\n\n{}", result.ai_analysis),
        format!(
            "📈 Key Stock Insights\nAnalysis as of {}",
            analysis_date(&result.generated_at)
        ),
        render_summary(result),
        render_key_metrics(result),
        render_details(result),
        render_performance(result),
        render_chart(result),
    ]
    .join("\n\n")
}

fn analysis_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Market overview line
pub fn render_overview(result: &AnalysisResult) -> String {
    let info = &result.basic_info;
    let (company, industry) = header_names(&info.symbol, &info.company, &info.industry);
    format!(
        "📊 Market Overview\n{company} ({}) | {industry}\nCurrent Price: {} ({:+.2}%)",
        info.symbol,
        rupees(result.price_data.current_price),
        result.performance.daily_change
    )
}

/// Analysis summary view
pub fn render_summary(result: &AnalysisResult) -> String {
    format!(
        "Analysis Summary\nCurrent Trading Price: {} {} Today",
        rupees(result.price_data.current_price),
        format_delta(result.performance.daily_change)
    )
}

/// Key metrics view
pub fn render_key_metrics(result: &AnalysisResult) -> String {
    let perf = &result.performance;
    let prices = &result.price_data;

    let mut table = base_table();
    table.set_header(vec!["Price Range", "Performance", "Trading Activity"]);
    table.add_row(vec![
        rupees(prices.year_range.high),
        format!("{} (1Y)", format_delta(perf.yearly_change)),
        crore(result.trading_info.value_cr),
    ]);
    table.add_row(vec![
        format!("Low: {}", rupees(prices.year_range.low)),
        format!("{} (1M)", format_delta(perf.monthly_change)),
        format_delta(perf.daily_change),
    ]);

    format!("Key Metrics\n{table}")
}

/// Detailed insights; empty buckets are skipped
pub fn render_details(result: &AnalysisResult) -> String {
    let mut out = String::from("Detailed Insights");
    for (_, bucket) in result.insights.iter().filter(|(_, b)| !b.is_empty()) {
        out.push_str(&format!("\n\n{} {}", bucket.icon, bucket.title));
        for detail in &bucket.details {
            out.push_str(&format!("\n  • {detail}"));
        }
    }
    out
}

/// Performance metrics view
pub fn render_performance(result: &AnalysisResult) -> String {
    let perf = &result.performance;
    let prices = &result.price_data;

    let mut table = base_table();
    table.set_header(vec!["1 Year Change", "30 Day Change", "Trading Value"]);
    table.add_row(vec![
        format!("{:+.2}%", perf.yearly_change),
        format!("{:+.2}%", perf.monthly_change),
        crore(result.trading_info.value_cr),
    ]);
    table.add_row(vec![
        format!("High: {}", rupees(prices.year_range.high)),
        format!("Low: {}", rupees(prices.year_range.low)),
        format_delta(perf.daily_change),
    ]);

    format!("📈 Performance Metrics\n{table}")
}

/// Horizontal bar chart of Daily / 30 Days / 1 Year changes
pub fn render_chart(result: &AnalysisResult) -> String {
    let perf = &result.performance;
    let periods = [
        ("Daily", perf.daily_change),
        ("30 Days", perf.monthly_change),
        ("1 Year", perf.yearly_change),
    ];

    let scale = periods
        .iter()
        .map(|(_, change)| change.abs())
        .fold(0.0_f64, f64::max);

    let mut out = String::from("Performance Comparison (Change %)");
    for (label, change) in periods {
        let len = if scale > 0.0 {
            ((change.abs() / scale) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if change >= 0.0 { "█" } else { "░" };
        out.push_str(&format!(
            "\n{label:>8} │{:<width$} {change:+.2}%",
            glyph.repeat(len),
            width = BAR_WIDTH
        ));
    }
    out
}

fn align_numeric(table: &mut Table, columns: &[usize]) {
    for idx in columns {
        if let Some(column) = table.column_mut(*idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DerivedMetrics, InsightEngine};
    use crate::data::QuoteField;

    fn quote(symbol: &str) -> QuoteRecord {
        let mut record = QuoteRecord::new(symbol)
            .with(QuoteField::LastPrice, 24_200.5)
            .with(QuoteField::YearLow, 21_281.0)
            .with(QuoteField::YearHigh, 26_277.0)
            .with(QuoteField::TotalTradedValue, 190_000_000_000.0)
            .with(QuoteField::PChange, -0.5)
            .with(QuoteField::PerChange30d, -1.3)
            .with(QuoteField::PerChange365d, 10.2);
        if symbol != INDEX_SYMBOL {
            record.company_name = Some("Reliance Industries Limited".to_string());
            record.industry = Some("Refineries & Marketing".to_string());
        }
        record
    }

    fn result_for(symbol: &str) -> AnalysisResult {
        let record = quote(symbol);
        let metrics = DerivedMetrics::derive(&record).unwrap();
        let insights = InsightEngine::new().evaluate(&record, &metrics).unwrap();
        AnalysisResult::assemble(&record, &metrics, insights, "Index is steady.".to_string())
            .unwrap()
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(-1.234), "↓ -1.23%");
        assert_eq!(format_delta(0.0), "↑ +0.00%");
        assert_eq!(format_delta(12.5), "↑ +12.50%");
    }

    #[test]
    fn test_index_overview_uses_fixed_labels() {
        let overview = render_overview(&result_for(INDEX_SYMBOL));
        assert!(overview.contains("NSE Indices (NIFTY 50) | Market Index"));
        assert!(overview.contains("Current Price: ₹24,200.50 (-0.50%)"));
    }

    #[test]
    fn test_stock_overview() {
        let overview = render_overview(&result_for("RELIANCE"));
        assert!(overview.contains("Reliance Industries Limited (RELIANCE) | Refineries & Marketing"));
    }

    #[test]
    fn test_full_dashboard_sections() {
        let text = render_analysis(&result_for("RELIANCE"));
        assert!(text.contains("🤖 AI Summary\n\nIndex is steady."));
        assert!(text.contains("Analysis as of "));
        assert!(text.contains("Current Trading Price: ₹24,200.50 ↓ -0.50% Today"));
        assert!(text.contains("↑ +10.20% (1Y)"));
        assert!(text.contains("₹19,000Cr"));
        assert!(text.contains("✅ Growth Analysis"));
        assert!(text.contains("  • Monitor Refineries & Marketing sector trends"));
        assert!(text.contains("Performance Comparison (Change %)"));
    }

    #[test]
    fn test_chart_scales_to_largest_change() {
        let chart = render_chart(&result_for("RELIANCE"));
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[3].contains(&"█".repeat(BAR_WIDTH)));
        assert!(lines[3].ends_with("+10.20%"));
        assert!(lines[1].contains('░'));
    }

    #[test]
    fn test_failure_rendering() {
        let outcome = AnalysisOutcome::failure("Symbol not found in dataset: NOPE");
        assert_eq!(
            render_outcome(&outcome),
            "❌ Error in analysis: Symbol not found in dataset: NOPE"
        );
    }

    #[test]
    fn test_quote_list() {
        let index = quote(INDEX_SYMBOL);
        let stock = quote("RELIANCE");
        let dataset = Dataset::from_records(vec![index.clone(), stock.clone()]);

        let text = render_quote_list(&dataset, &[&index, &stock]);
        assert!(text.contains("RELIANCE - Reliance Industries Limited"));
        assert!(text.contains("Market Index"));
        assert!(text.contains("↓ -0.50%"));

        assert_eq!(
            render_quote_list(&dataset, &[]),
            "No stocks match the current filter."
        );
    }

    #[test]
    fn test_render_industries() {
        let dataset = Dataset::from_records(vec![quote(INDEX_SYMBOL), quote("RELIANCE")]);
        assert_eq!(
            render_industries(&dataset),
            "Industries:\n  All\n  Refineries & Marketing\n"
        );
    }
}
