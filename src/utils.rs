//! Helper functions for date presentation and log-safe truncation.

use chrono::NaiveDateTime;
use tracing::warn;

/// Timestamp layout used by the Guardian API.
const PUBLICATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Short human-readable layout shown in list rows, e.g. "Aug 6, 2016".
const DISPLAY_FORMAT: &str = "%b %-d, %Y";

/// Reformat an ISO-8601 publication timestamp for display.
///
/// `"2016-08-06T12:00:00Z"` becomes `"Aug 6, 2016"`. An unparseable input is
/// logged and yields `None`, so the row's date cell is left unset rather than
/// failing the whole screen.
pub fn format_publication_date(raw: &str) -> Option<String> {
    match NaiveDateTime::parse_from_str(raw, PUBLICATION_FORMAT) {
        Ok(parsed) => Some(parsed.format(DISPLAY_FORMAT).to_string()),
        Err(e) => {
            warn!(raw, error = %e, "Problem parsing the date string");
            None
        }
    }
}

/// Truncate a string for logging purposes.
///
/// Long bodies are cut to `max` bytes with an ellipsis and a byte-count
/// indicator appended, so response previews don't flood the log.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_publication_date() {
        assert_eq!(
            format_publication_date("2016-08-06T12:00:00Z"),
            Some("Aug 6, 2016".to_string())
        );
    }

    #[test]
    fn test_format_publication_date_single_digit_day_unpadded() {
        assert_eq!(
            format_publication_date("2025-01-03T00:00:00Z"),
            Some("Jan 3, 2025".to_string())
        );
    }

    #[test]
    fn test_format_publication_date_double_digit_day() {
        assert_eq!(
            format_publication_date("2016-12-25T23:59:59Z"),
            Some("Dec 25, 2016".to_string())
        );
    }

    #[test]
    fn test_format_publication_date_unparseable() {
        assert_eq!(format_publication_date("tomorrow-ish"), None);
        assert_eq!(format_publication_date(""), None);
        // Offset form isn't the documented layout; treated as unparseable.
        assert_eq!(format_publication_date("2016-08-06T12:00:00+02:00"), None);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        // "é" is two bytes; cutting at 1 must back off to a boundary.
        assert_eq!(truncate_for_log("émile", 1), "…(+6 bytes)");
    }
}
