//! Numeric parsing of raw result values.

/// Parses a raw result value as f64, returning None for invalid or empty
/// strings and for non-finite results.
///
/// Parsing is deliberately strict: comparator-prefixed entries like `<5` or
/// `>=48` are left unparsed so they surface as PARSE_ERROR in the run
/// summary instead of being silently coerced.
pub fn parse_result_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::parse_result_value;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_result_value("48"), Some(48.0));
        assert_eq!(parse_result_value(" 7.2 "), Some(7.2));
        assert_eq!(parse_result_value("-0.5"), Some(-0.5));
    }

    #[test]
    fn rejects_blank_and_non_numeric() {
        assert_eq!(parse_result_value(""), None);
        assert_eq!(parse_result_value("   "), None);
        assert_eq!(parse_result_value("high"), None);
        assert_eq!(parse_result_value("7,2"), None);
    }

    #[test]
    fn rejects_comparator_prefixed_entries() {
        assert_eq!(parse_result_value("<5"), None);
        assert_eq!(parse_result_value(">=48"), None);
    }

    #[test]
    fn rejects_non_finite() {
        assert_eq!(parse_result_value("NaN"), None);
        assert_eq!(parse_result_value("inf"), None);
    }
}
