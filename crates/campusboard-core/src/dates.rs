//! Date parsing and display helpers shared by the store and view layers.

use chrono::NaiveDate;

/// Storage format for event dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-readable long form, e.g. "January 05, 2025".
pub const LONG_DATE_FORMAT: &str = "%B %d, %Y";

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Render a date in the long display form.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format(LONG_DATE_FORMAT).to_string()
}

/// Render a stored date string in the long form.
///
/// Strings that are not `YYYY-MM-DD` dates are returned unchanged.
pub fn format_date_str(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => format_long_date(date),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_pads_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_long_date(date), "January 05, 2025");
    }

    #[test]
    fn format_date_str_passes_through_garbage() {
        assert_eq!(format_date_str("2025-12-31"), "December 31, 2025");
        assert_eq!(format_date_str("next friday"), "next friday");
        assert_eq!(format_date_str(""), "");
    }

    #[test]
    fn parse_date_trims_and_rejects_other_formats() {
        assert_eq!(
            parse_date(" 2025-01-10 "),
            NaiveDate::from_ymd_opt(2025, 1, 10)
        );
        assert!(parse_date("10/01/2025").is_none());
        assert!(parse_date("2025-02-30").is_none());
    }
}
