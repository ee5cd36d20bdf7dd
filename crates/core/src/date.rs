//! Publication date parsing.
//!
//! EPUB `dc:date` values are wildly inconsistent in the wild: full RFC 3339
//! timestamps, plain calendar dates, or a bare year. The declared formats
//! are tried in order and the first hit wins; total failure yields `None`,
//! never an error.

use chrono::{DateTime, NaiveDate};
use tracing::warn;

/// Parse a declared date string against the supported formats, in order:
/// RFC 3339 datetime, `YYYY-MM-DD`, bare `YYYY` (mapped to January 1st).
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    // chrono's %Y is width-flexible, so the length guard keeps the year at
    // exactly four digits.
    if raw.len() == 10
        && let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    {
        return Some(date);
    }

    if raw.len() == 4
        && raw.chars().all(|c| c.is_ascii_digit())
        && let Ok(year) = raw.parse::<i32>()
    {
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    warn!(value = raw, "Unparseable publication date, recording absence");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2020-05-01", Some((2020, 5, 1)))]
    #[case("2020", Some((2020, 1, 1)))]
    #[case("2024-01-15T10:30:00Z", Some((2024, 1, 15)))]
    #[case("2024-01-15T10:30:00+02:00", Some((2024, 1, 15)))]
    #[case("not-a-date", None)]
    #[case("20-05-01", None)]
    #[case("199-05-01", None)]
    #[case("", None)]
    #[case("   ", None)]
    fn test_parse_publication_date(#[case] input: &str, #[case] expected: Option<(i32, u32, u32)>) {
        let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
        assert_eq!(parse_publication_date(input), expected);
    }

    #[test]
    fn test_surrounding_whitespace_is_tolerated() {
        assert_eq!(
            parse_publication_date("  2020-05-01  "),
            NaiveDate::from_ymd_opt(2020, 5, 1)
        );
    }

    #[test]
    fn test_failure_is_absence_not_panic() {
        // A garbage date degrades silently to absence.
        assert_eq!(parse_publication_date("May the 1st, 2020"), None);
    }
}
