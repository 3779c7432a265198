//! Feature engineering over raw fields.
//!
//! Two deterministic conversions run before anything is fitted: the raw
//! occurrence date becomes calendar features, and locale-formatted decimals
//! become floats. Both fail soft (None) - the training loader decides which
//! holes drop the row and which are left for imputation.

use chrono::{Datelike, NaiveDate};

/// Date format of `dt_ocorrencia` in the source datasets.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Calendar features derived from the occurrence date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarFeatures {
    pub year: i32,
    pub month: u32,
}

/// Parse a `dd/mm/yyyy` date and extract year and month.
pub fn derive_calendar(raw: &str) -> Option<CalendarFeatures> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()?;
    Some(CalendarFeatures { year: date.year(), month: date.month() })
}

/// Parse a decimal that may use a comma as the decimal separator
/// (e.g. `-23,5505`).
pub fn parse_decimal_comma(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a plain float field; empty or malformed input becomes None.
pub fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-empty, trimmed categorical value.
pub fn parse_category(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_calendar() {
        let features = derive_calendar("15/06/2020").unwrap();
        assert_eq!(features.year, 2020);
        assert_eq!(features.month, 6);
    }

    #[test]
    fn test_derive_calendar_rejects_bad_input() {
        assert_eq!(derive_calendar(""), None);
        assert_eq!(derive_calendar("2020-06-15"), None);
        assert_eq!(derive_calendar("32/01/2020"), None);
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal_comma("-23,5505"), Some(-23.5505));
        assert_eq!(parse_decimal_comma("10.5"), Some(10.5));
        assert_eq!(parse_decimal_comma(" 7 "), Some(7.0));
    }

    #[test]
    fn test_parse_decimal_comma_rejects_bad_input() {
        assert_eq!(parse_decimal_comma(""), None);
        assert_eq!(parse_decimal_comma("sul"), None);
        assert_eq!(parse_decimal_comma("NaN"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("5700"), Some(5700.0));
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("n/a"), None);
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category(" DECOLAGEM "), Some("DECOLAGEM".to_string()));
        assert_eq!(parse_category("   "), None);
    }
}
