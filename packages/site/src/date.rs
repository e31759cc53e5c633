//! Best-effort closure date normalization.
//!
//! Closure dates show up as epoch milliseconds (numbers or numeric strings)
//! or as assorted date strings. Numbers above [`EPOCH_MS_THRESHOLD`] are
//! read as epoch milliseconds; everything else is tried against a list of
//! calendar formats. Anything unparsable is returned verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rec_map_site_models::PropertyValue;

/// Magnitude above which a numeric value is treated as epoch milliseconds.
///
/// Smaller numbers (years, counts) fall through to string parsing.
pub const EPOCH_MS_THRESHOLD: f64 = 1_000_000_000.0;

/// Default short date format (`en-CA`, e.g. `2023-11-14`).
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parses a raw closure date into a UTC timestamp.
///
/// Only full calendar dates are accepted. Partial dates such as a bare year
/// (`"2023"`) or year and month (`"2023-11"`) yield `None`, so
/// [`format_closure_date`] shows them as written instead of inventing a day.
#[must_use]
pub fn parse_closure_date(raw: &PropertyValue) -> Option<DateTime<Utc>> {
    if let Some(n) = raw.as_number()
        && n.abs() > EPOCH_MS_THRESHOLD
    {
        return from_epoch_ms(n);
    }

    match raw {
        PropertyValue::Text(s) => parse_date_str(s.trim()),
        PropertyValue::Number(_) | PropertyValue::Bool(_) => None,
    }
}

/// Renders a closure date for display.
///
/// Returns an empty string for absent or blank input, the formatted date
/// when parsing succeeds, and the original text otherwise.
#[must_use]
pub fn format_closure_date(raw: Option<&PropertyValue>, format: &str) -> String {
    let Some(raw) = raw.filter(|v| !v.is_blank()) else {
        return String::new();
    };

    parse_closure_date(raw).map_or_else(
        || raw.display_text(),
        |date| date.format(format).to_string(),
    )
}

fn from_epoch_ms(ms: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let ms = ms.round() as i64;
    DateTime::from_timestamp_millis(ms)
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> PropertyValue {
        PropertyValue::Text(s.to_string())
    }

    #[test]
    fn epoch_ms_number_renders_calendar_date() {
        let raw = PropertyValue::Number(1_700_000_000_000.0);
        assert_eq!(format_closure_date(Some(&raw), DEFAULT_DATE_FORMAT), "2023-11-14");
    }

    #[test]
    fn epoch_ms_string_renders_calendar_date() {
        let raw = text("1700000000000");
        assert_eq!(format_closure_date(Some(&raw), DEFAULT_DATE_FORMAT), "2023-11-14");
    }

    #[test]
    fn unparsable_text_is_returned_unchanged() {
        let raw = text("not a date");
        assert_eq!(format_closure_date(Some(&raw), DEFAULT_DATE_FORMAT), "not a date");
    }

    #[test]
    fn empty_and_absent_render_empty() {
        assert_eq!(format_closure_date(None, DEFAULT_DATE_FORMAT), "");
        assert_eq!(format_closure_date(Some(&text("")), DEFAULT_DATE_FORMAT), "");
        assert_eq!(format_closure_date(Some(&text("   ")), DEFAULT_DATE_FORMAT), "");
    }

    #[test]
    fn small_numbers_are_not_epochs() {
        let raw = PropertyValue::Number(2023.0);
        assert!(parse_closure_date(&raw).is_none());
        assert_eq!(format_closure_date(Some(&raw), DEFAULT_DATE_FORMAT), "2023");
    }

    #[test]
    fn partial_dates_are_shown_as_written() {
        for s in ["2023", "2023-11"] {
            let raw = text(s);
            assert!(parse_closure_date(&raw).is_none(), "{s:?}");
            assert_eq!(format_closure_date(Some(&raw), DEFAULT_DATE_FORMAT), s);
        }
    }

    #[test]
    fn parses_common_date_strings() {
        for s in [
            "2024-05-01",
            "2024/05/01",
            "05/01/2024",
            "2024-05-01T08:30:00",
            "2024-05-01T08:30:00.000",
            "2024-05-01 08:30:00",
            "2024-05-01T08:30:00Z",
            "May 1, 2024",
        ] {
            assert_eq!(
                format_closure_date(Some(&text(s)), DEFAULT_DATE_FORMAT),
                "2024-05-01",
                "{s}"
            );
        }
    }

    #[test]
    fn honours_custom_format() {
        let raw = text("2024-05-01");
        assert_eq!(format_closure_date(Some(&raw), "%b %-d, %Y"), "May 1, 2024");
    }
}
