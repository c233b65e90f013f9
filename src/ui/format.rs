//! Number formatting for display.

/// Round to a whole number and group thousands with commas (`12345.6` -> `"12,346"`).
///
/// Non-finite values render as `"0"`.
pub fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a percentage with one decimal place (`66.666` -> `"66.7%"`).
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}
