//! Narrative prompt rendering

use minijinja::{Environment, context};
use serde::Serialize;

use crate::analysis::{DerivedMetrics, InsightCategory, Insights};
use crate::data::{QuoteField, QuoteRecord};
use crate::error::{InsightError, Result};
use insight_utils::with_commas;

const TEMPLATE: &str = "\
Question: Provide a detailed analysis for {{ symbol }} ({{ company }}) in the {{ industry }} sector:

Current Market Data:
• Price: ₹{{ price }} ({{ daily }}% today)
• 52-Week Range: ₹{{ year_low }} - ₹{{ year_high }}
• Trading Value: ₹{{ value_cr }}Cr
• Price Position: {{ position }}% of 52-week range

Performance Changes:
• Daily: {{ daily }}%
• Monthly: {{ monthly }}%
• Yearly: {{ yearly }}%

Technical Analysis:
{% for section in sections %}• {{ section.label }}: {{ section.details }}
{% endfor %}
Provide a structured analysis with the following sections:
1. Overall Market Position: Current standing and momentum
2. Key Strengths: Positive factors and opportunities
3. Primary Concerns: Risk factors and challenges
4. Investment Recommendations: Clear actionable steps
5. Risk Monitoring: Specific factors to watch

Answer: ";

#[derive(Serialize)]
struct Section {
    label: &'static str,
    details: String,
}

/// Render the narrative prompt for one quote
///
/// Numbers are pre-formatted so the template only interpolates text.
pub fn render_prompt(
    record: &QuoteRecord,
    metrics: &DerivedMetrics,
    insights: &Insights,
) -> Result<String> {
    let sections: Vec<Section> = insights
        .iter()
        .map(|(category, bucket)| Section {
            label: InsightCategory::prompt_label(&category),
            details: bucket.details.join(", "),
        })
        .collect();

    let env = Environment::new();
    env.render_str(
        TEMPLATE,
        context! {
            symbol => &record.symbol,
            company => record.company_or_symbol(),
            industry => record.industry_or_na(),
            price => with_commas(record.require(QuoteField::LastPrice)?, 2),
            year_low => with_commas(record.require(QuoteField::YearLow)?, 2),
            year_high => with_commas(record.require(QuoteField::YearHigh)?, 2),
            value_cr => with_commas(metrics.traded_value_cr, 2),
            position => format!("{:.1}", metrics.price_position_pct),
            daily => format!("{:+.2}", record.require(QuoteField::PChange)?),
            monthly => format!("{:+.2}", record.require(QuoteField::PerChange30d)?),
            yearly => format!("{:+.2}", record.require(QuoteField::PerChange365d)?),
            sections => sections,
        },
    )
    .map_err(|e| InsightError::GenerationFailure(format!("prompt rendering failed: {e}")))
}

/// Keep the first `max_tokens` whitespace-delimited tokens
///
/// Spacing up to the last kept token is preserved. Text with
/// fewer tokens is returned unchanged.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> &str {
    if max_tokens == 0 {
        return "";
    }

    let mut seen = 0;
    let mut in_token = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_token {
                in_token = false;
                if seen == max_tokens {
                    return &text[..idx];
                }
            }
        } else if !in_token {
            in_token = true;
            seen += 1;
        }
    }
    text
}
