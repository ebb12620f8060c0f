//! Plain-text rendering of message lists and message details.

use humansize::{format_size, BINARY};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Config;
use crate::model::message::MessageSummary;
use crate::model::part::ContentKind;
use crate::parser::body::{html_to_text, looks_like_html, preview, text_to_html};

/// Shown in place of a body when a message has none.
pub const NO_CONTENT: &str = "This email has no content.";

const DATE_WIDTH: usize = 17;
const SIZE_WIDTH: usize = 9;

/// Column header line for [`list_row`].
pub fn list_header(config: &Config) -> String {
    let d = &config.display;
    format!(
        "  {} {} {} {:>SIZE_WIDTH$}",
        pad_to_width("Date", DATE_WIDTH),
        pad_to_width("From", d.from_width),
        pad_to_width("Subject", d.subject_width),
        "Size"
    )
}

/// Rule drawn under [`list_header`], as wide as the configured columns.
pub fn list_rule(config: &Config) -> String {
    let d = &config.display;
    let width = DATE_WIDTH + d.from_width + d.subject_width + SIZE_WIDTH + 3;
    format!("  {}", "-".repeat(width))
}

/// One list entry: a column row followed by an indented body preview.
pub fn list_row(summary: &MessageSummary, config: &Config) -> String {
    let d = &config.display;
    let date = summary
        .date
        .map(|dt| dt.format(&config.general.date_format).to_string())
        .unwrap_or_default();
    let size = if summary.size > 0 {
        format_size(summary.size, BINARY)
    } else {
        String::new()
    };

    let mut row = format!(
        "  {} {} {} {:>SIZE_WIDTH$}",
        pad_to_width(&truncate_str(&date, DATE_WIDTH), DATE_WIDTH),
        pad_to_width(&truncate_str(&summary.from, d.from_width), d.from_width),
        pad_to_width(&truncate_str(&summary.subject, d.subject_width), d.subject_width),
        size
    );

    let snippet = preview(&summary.body, d.preview_chars);
    if !snippet.is_empty() {
        row.push_str("\n      ");
        row.push_str(&snippet);
    }
    row
}

/// Full detail view for the terminal: headers, a rule, then the body.
///
/// HTML bodies are converted to text. A missing body shows [`NO_CONTENT`].
pub fn detail_text(summary: &MessageSummary, config: &Config) -> String {
    let mut content = String::new();

    if let Some(date) = summary.date {
        content.push_str(&format!(
            "Date:    {}\n",
            date.format(&config.general.date_format)
        ));
    }
    if !summary.from.is_empty() {
        content.push_str(&format!("From:    {}\n", summary.from));
    }
    content.push_str(&format!("Subject: {}\n", summary.subject));
    content.push_str(&format!("{}\n\n", "-".repeat(72)));

    let body = summary.body.trim();
    if body.is_empty() {
        content.push_str(NO_CONTENT);
    } else if summary.body_kind == ContentKind::Html || looks_like_html(body) {
        content.push_str(&html_to_text(body));
    } else {
        content.push_str(body);
    }
    content.push('\n');
    content
}

/// Body as an HTML fragment, ready to hand to a sanitizer.
///
/// Plain-text bodies are escaped and their line breaks become `<br>`.
pub fn detail_html(summary: &MessageSummary) -> String {
    let body = summary.body.trim();
    if body.is_empty() {
        format!("<p>{NO_CONTENT}</p>")
    } else if summary.body_kind == ContentKind::Html || looks_like_html(body) {
        body.to_string()
    } else {
        text_to_html(body)
    }
}

/// Truncate a string to fit within `max_width` columns, adding "..." if needed.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    let width = UnicodeWidthStr::width(s);
    if width <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        s.chars().take(max_width).collect()
    } else {
        let mut result = String::new();
        let mut current_width = 0;
        for ch in s.chars() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if current_width + ch_width + 3 > max_width {
                break;
            }
            result.push(ch);
            current_width += ch_width;
        }
        result.push_str("...");
        result
    }
}

/// Right-pad with spaces to `width` display columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(s);
    let mut padded = s.to_string();
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(current)));
    padded
}
