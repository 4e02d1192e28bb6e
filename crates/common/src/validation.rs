//! Pure validation helpers for banner fields.
//!
//! These are the write-time checks shared by the service layer and any
//! import tooling: schedule range rule, hex colors, safe URLs, and
//! integer ranges. Each function is a pure predicate with no I/O.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Matches a 3- or 6-digit hex color, with or without a leading `#`.
#[allow(clippy::unwrap_used)] // pattern is a compile-time constant
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#?([0-9a-fA-F]{6}|[0-9a-fA-F]{3})$").unwrap());

/// Check that a schedule range is well-formed.
///
/// Either bound may be absent; when both are present the end must not
/// precede the start. Equal bounds are allowed (a one-instant window).
#[must_use]
pub fn validate_date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => end >= start,
        _ => true,
    }
}

/// Check whether a string is a valid 3- or 6-digit hex color.
#[must_use]
pub fn is_valid_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Normalize a hex color to lowercase `#rrggbb`/`#rgb` form.
///
/// Returns `None` for anything that is not a valid hex color.
#[must_use]
pub fn normalize_hex_color(color: &str) -> Option<String> {
    if !is_valid_hex_color(color) {
        return None;
    }
    let digits = color.trim_start_matches('#');
    Some(format!("#{}", digits.to_lowercase()))
}

/// Check whether a URL is safe to use as a CTA target.
///
/// Accepts absolute `http`/`https` URLs and site-relative paths starting
/// with `/`. Everything else (including `javascript:` and other schemes)
/// is rejected.
#[must_use]
pub fn is_safe_url(url: &str) -> bool {
    if url.starts_with('/') {
        return true;
    }

    Url::parse(url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
}

/// Check whether a value falls within an inclusive integer range.
#[must_use]
pub const fn is_in_range(value: i64, min: i64, max: i64) -> bool {
    value >= min && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_date_range_allows_missing_bounds() {
        assert!(validate_date_range(None, None));
        assert!(validate_date_range(Some(at(100)), None));
        assert!(validate_date_range(None, Some(at(100))));
    }

    #[test]
    fn test_date_range_rejects_end_before_start() {
        assert!(!validate_date_range(Some(at(200)), Some(at(100))));
    }

    #[test]
    fn test_date_range_allows_equal_bounds() {
        assert!(validate_date_range(Some(at(100)), Some(at(100))));
    }

    #[test]
    fn test_hex_color_accepts_short_and_long_forms() {
        assert!(is_valid_hex_color("#fff"));
        assert!(is_valid_hex_color("#A1B2C3"));
        assert!(is_valid_hex_color("a1b2c3"));
    }

    #[test]
    fn test_hex_color_rejects_invalid() {
        assert!(!is_valid_hex_color(""));
        assert!(!is_valid_hex_color("#ggg"));
        assert!(!is_valid_hex_color("#12345"));
        assert!(!is_valid_hex_color("red"));
    }

    #[test]
    fn test_normalize_hex_color() {
        assert_eq!(normalize_hex_color("A1B2C3").as_deref(), Some("#a1b2c3"));
        assert_eq!(normalize_hex_color("#FFF").as_deref(), Some("#fff"));
        assert!(normalize_hex_color("nope").is_none());
    }

    #[test]
    fn test_safe_url_accepts_http_and_relative() {
        assert!(is_safe_url("https://example.com/sale"));
        assert!(is_safe_url("http://example.com"));
        assert!(is_safe_url("/campaigns/summer"));
    }

    #[test]
    fn test_safe_url_rejects_other_schemes() {
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("ftp://example.com/file"));
        assert!(!is_safe_url("example.com/no-scheme"));
    }

    #[test]
    fn test_int_range_is_inclusive() {
        assert!(is_in_range(0, 0, 60));
        assert!(is_in_range(60, 0, 60));
        assert!(!is_in_range(61, 0, 60));
        assert!(!is_in_range(-1, 0, 60));
    }
}
