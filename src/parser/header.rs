//! Header helpers: lookup, subject, date parsing and `List-Unsubscribe` (RFC 2369).
//!
//! Providers hand headers over already unfolded and with encoded-words
//! resolved, so only value-level parsing happens here.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::model::part::Header;

/// Subject shown for messages without one.
pub const NO_SUBJECT: &str = "No Subject";

/// Get the first value for a header name (case-insensitive).
pub fn find_header<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// The `Subject` header, or [`NO_SUBJECT`] when missing or blank.
pub fn subject(headers: &[Header]) -> String {
    find_header(headers, "Subject")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_SUBJECT)
        .to_string()
}

/// Split a `List-Unsubscribe` value into its URIs.
///
/// `"<mailto:u@x.com?subject=stop>, <https://x.com/u?id=1>"` yields both URIs
/// without brackets. A value with no brackets at all is returned whole.
pub fn parse_list_unsubscribe(value: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut remaining = value;
    while let Some(start) = remaining.find('<') {
        if let Some(end) = remaining[start..].find('>') {
            let uri = remaining[start + 1..start + end].trim();
            if !uri.is_empty() {
                result.push(uri.to_string());
            }
            remaining = &remaining[start + end + 1..];
        } else {
            break;
        }
    }

    if result.is_empty() {
        let bare = value.trim();
        if !bare.is_empty() {
            result.push(bare.to_string());
        }
    }
    result
}

/// Parse an email date string in various common formats.
///
/// Supports RFC 2822 (with or without a trailing `(Zone)` comment), RFC 3339
/// and a few broken real-world variants.
pub fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = strip_trailing_comment(date_str.trim());
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let no_dow = strip_day_of_week(trimmed);

    let formats = [
        "%d %b %Y %H:%M:%S %z",
        "%d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M %z",
        "%Y-%m-%dT%H:%M:%S%z",
        "%Y-%m-%d %H:%M:%S %z",
        "%Y-%m-%d %H:%M:%S",
    ];

    for candidate in [no_dow.clone(), replace_named_tz(&no_dow)] {
        for fmt in &formats {
            if let Ok(dt) = DateTime::parse_from_str(&candidate, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(ndt) = NaiveDateTime::parse_from_str(&candidate, fmt) {
                return Some(Utc.from_utc_datetime(&ndt));
            }
        }
    }

    warn!(date = trimmed, "Could not parse date");
    None
}

/// Drop a trailing `(comment)`, e.g. `"... -0800 (PST)"`.
fn strip_trailing_comment(s: &str) -> &str {
    if s.ends_with(')') {
        if let Some(open) = s.rfind('(') {
            return s[..open].trim_end();
        }
    }
    s
}

/// Strip leading day-of-week prefix (e.g. "Thu, " or "Thu ").
fn strip_day_of_week(s: &str) -> String {
    let days = [
        "Mon,", "Tue,", "Wed,", "Thu,", "Fri,", "Sat,", "Sun,", "Mon ", "Tue ", "Wed ", "Thu ",
        "Fri ", "Sat ", "Sun ",
    ];
    for day in &days {
        if let Some(rest) = s.strip_prefix(day) {
            return rest.trim().to_string();
        }
    }
    s.to_string()
}

/// Replace well-known timezone abbreviations with numeric offsets.
fn replace_named_tz(s: &str) -> String {
    let tzs = [
        ("EST", "-0500"),
        ("EDT", "-0400"),
        ("CST", "-0600"),
        ("CDT", "-0500"),
        ("MST", "-0700"),
        ("MDT", "-0600"),
        ("PST", "-0800"),
        ("PDT", "-0700"),
        ("GMT", "+0000"),
        ("UTC", "+0000"),
        ("CEST", "+0200"),
        ("CET", "+0100"),
        ("JST", "+0900"),
    ];
    for (name, offset) in &tzs {
        // Whole word only: "CEST" must not match "EST"
        if let Some(rest) = s.strip_suffix(name) {
            if rest.ends_with(' ') {
                return format!("{rest}{offset}");
            }
        }
    }
    s.to_string()
}
