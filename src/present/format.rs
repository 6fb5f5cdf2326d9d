//! Display formatting for KPI values
//!
//! Undefined and non-finite values render as zero so that a NaN never
//! reaches a formatted string.

use num_format::{Locale, ToFormattedString};

/// Currency with thousands separators and fixed decimals: `$1,234.50`
pub fn format_currency(value: f64, decimals: usize) -> String {
    let value = finite_or_zero(value);
    let rounded = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rounded.as_str(), None),
    };

    let negative = value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::with_capacity(rounded.len() + 4);
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Percentage with one decimal: `42.5%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", finite_or_zero(value))
}

/// Integer with thousands separators: `12,345`
pub fn format_integer(value: f64) -> String {
    let value = finite_or_zero(value).round();
    let digits = format!("{:.0}", value.abs());
    if value < 0.0 {
        format!("-{}", group_thousands(&digits))
    } else {
        group_thousands(&digits)
    }
}

/// Currency for a possibly undefined value
pub fn display_currency(value: Option<f64>, decimals: usize) -> String {
    format_currency(value.unwrap_or(0.0), decimals)
}

/// Percentage for a possibly undefined value
pub fn display_percent(value: Option<f64>) -> String {
    format_percent(value.unwrap_or(0.0))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Insert `,` separators into a string of ASCII digits
fn group_thousands(digits: &str) -> String {
    match digits.parse::<u128>() {
        Ok(n) => n.to_formatted_string(&Locale::en),
        Err(_) => digits.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(0.0, 0), "$0");
        assert_eq!(format_currency(999.0, 0), "$999");
        assert_eq!(format_currency(1234.5, 2), "$1,234.50");
        assert_eq!(format_currency(1_234_567.891, 2), "$1,234,567.89");
        assert_eq!(format_currency(123_456.0, 0), "$123,456");
        assert_eq!(format_currency(-2_500.0, 0), "-$2,500");
    }

    #[test]
    fn test_currency_never_formats_nan() {
        assert_eq!(format_currency(f64::NAN, 2), "$0.00");
        assert_eq!(format_currency(f64::INFINITY, 0), "$0");
        assert_eq!(display_currency(None, 2), "$0.00");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(42.46), "42.5%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(display_percent(None), "0.0%");
        assert_eq!(format_percent(f64::NAN), "0.0%");
    }

    #[test]
    fn test_integer() {
        assert_eq!(format_integer(0.0), "0");
        assert_eq!(format_integer(1_000.0), "1,000");
        assert_eq!(format_integer(1_234_567.4), "1,234,567");
        assert_eq!(format_integer(-9_876.0), "-9,876");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("7"), "7");
        assert_eq!(group_thousands("1000000"), "1,000,000");
    }
}
