//! Choosing and normalizing the link to open for "unsubscribe".

use crate::parser::header;

/// Host that development builds of the web front end leak into links.
pub const DEFAULT_DEV_HOST: &str = "localhost:3000";

/// Origin prepended to relative links.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Pick the URI to open: the first `http(s)` one, else the first `mailto:`,
/// else whatever comes first.
pub fn preferred_link(entries: &[String]) -> Option<&str> {
    let is_web = |e: &&String| {
        let lower = e.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    };
    let is_mailto = |e: &&String| e.to_ascii_lowercase().starts_with("mailto:");

    entries
        .iter()
        .find(is_web)
        .or_else(|| entries.iter().find(is_mailto))
        .or_else(|| entries.first())
        .map(String::as_str)
}

/// Make a link openable from outside the app.
///
/// A leading `[http(s)://]<dev_host>` is stripped. What remains is returned
/// as-is if it is an `http(s)` URL or carries another scheme (`mailto:`);
/// otherwise it is treated as a path under `origin`.
pub fn normalize_link(link: &str, dev_host: &str, origin: &str) -> String {
    let link = link.trim();
    let without_scheme = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"))
        .unwrap_or(link);

    let cleaned = match without_scheme.strip_prefix(dev_host) {
        Some(rest) if !dev_host.is_empty() => rest,
        _ => link,
    };

    if cleaned.starts_with("http") || has_scheme(cleaned) {
        return cleaned.to_string();
    }

    let origin = origin.trim_end_matches('/');
    if cleaned.starts_with('/') {
        format!("{origin}{cleaned}")
    } else {
        format!("{origin}/{cleaned}")
    }
}

/// Resolve a raw `List-Unsubscribe` value to the single link to open.
pub fn resolve(header_value: &str, dev_host: &str, origin: &str) -> Option<String> {
    let entries = header::parse_list_unsubscribe(header_value);
    preferred_link(&entries).map(|link| normalize_link(link, dev_host, origin))
}

/// `scheme:` prefix per RFC 3986 (letter, then letters, digits, `+`, `-`, `.`).
fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
