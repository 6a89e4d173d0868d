//! Number formatting shared by prompts and the dashboard

/// Format a number with `,` thousands separators and fixed decimals
///
/// `with_commas(1234567.891, 2)` yields `"1,234,567.89"`.
pub fn with_commas(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Rounding can turn a tiny negative into "0.00"
    let negative = value.is_sign_negative()
        && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Arrow used next to a signed change: `↓` for negatives, `↑` otherwise
pub fn delta_arrow(value: f64) -> &'static str {
    if value < 0.0 { "↓" } else { "↑" }
}
