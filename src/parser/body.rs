//! Body selection and conversion: html-over-text preference, previews,
//! HTML-to-text for terminal display, and text-to-HTML for web rendering.
//!
//! None of this sanitizes anything. HTML coming out of these functions is
//! still untrusted sender content.

use serde::{Deserialize, Serialize};

use crate::model::message::ExtractedContent;
use crate::model::part::ContentKind;

/// Which extracted body to show when a message has both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPreference {
    #[default]
    Html,
    Text,
}

/// The single body chosen for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedBody {
    pub content: String,
    pub kind: ContentKind,
}

impl SelectedBody {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Pick the body to display.
///
/// The preferred kind wins when non-empty, then the other one. A message
/// with neither yields an empty `text/plain` body.
pub fn select_body(content: &ExtractedContent, preference: BodyPreference) -> SelectedBody {
    let html = (!content.html_content.is_empty()).then_some(&content.html_content);
    let text = (!content.text_content.is_empty()).then_some(&content.text_content);

    let chosen = match preference {
        BodyPreference::Html => html
            .map(|c| (c, ContentKind::Html))
            .or(text.map(|c| (c, ContentKind::PlainText))),
        BodyPreference::Text => text
            .map(|c| (c, ContentKind::PlainText))
            .or(html.map(|c| (c, ContentKind::Html))),
    };

    match chosen {
        Some((c, kind)) => SelectedBody {
            content: c.clone(),
            kind,
        },
        None => SelectedBody {
            content: String::new(),
            kind: ContentKind::PlainText,
        },
    }
}

/// Heuristic for bodies of unknown kind: HTML if it starts with a tag.
pub fn looks_like_html(body: &str) -> bool {
    body.trim_start().starts_with('<')
}

/// Convert plain text to HTML: escape markup characters, turn line breaks into `<br>`.
pub fn text_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => out.push_str("<br>"),
            _ => out.push(ch),
        }
    }
    out
}

/// Short single-line preview of a body for list views.
///
/// Tags are stripped, whitespace runs collapse to one space, and `...` is
/// appended when the preview is cut at `max_chars`.
pub fn preview(body: &str, max_chars: usize) -> String {
    let stripped = strip_tags(body);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Remove everything between `<` and `>`.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Convert HTML to plain text for terminal display.
///
/// - Line breaks for `<br>`, `<p>`, `<div>`, `<tr>`, headings and list items
/// - `<li>` items prefixed with `"- "`
/// - Scripts and styles removed
/// - Common HTML entities decoded
/// - Runs of blank lines collapsed to one
pub fn html_to_text(html: &str) -> String {
    let html = remove_tag_block(html, "script");
    let html = remove_tag_block(&html, "style");

    let mut result = String::with_capacity(html.len());
    let mut rest = html.as_str();
    while let Some(start) = rest.find('<') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            // Unterminated tag: drop the remainder
            rest = "";
            break;
        };
        let (closing, name) = tag_name(&after[..end]);
        if is_block_tag(&name) {
            result.push('\n');
        }
        if name == "li" && !closing {
            result.push_str("- ");
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);

    let decoded = decode_entities(&result);

    let mut prev_was_blank = false;
    let mut cleaned = String::with_capacity(decoded.len());
    for line in decoded.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_was_blank {
                cleaned.push('\n');
                prev_was_blank = true;
            }
        } else {
            cleaned.push_str(trimmed);
            cleaned.push('\n');
            prev_was_blank = false;
        }
    }

    cleaned.trim().to_string()
}

/// Split a tag body (`/p`, `br /`, `div class="x"`) into (is_closing, lowercase name).
fn tag_name(tag: &str) -> (bool, String) {
    let tag = tag.trim();
    let closing = tag.starts_with('/');
    let name = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    (closing, name)
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "br" | "p" | "div" | "tr" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
    )
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last so "&amp;lt;" stays "&lt;"
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
}

/// Remove an entire tag block (e.g. `<script>…</script>`), case-insensitively.
fn remove_tag_block(html: &str, tag: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut remaining = html;
    let open = format!("<{tag}");
    let close = format!("</{tag}>");

    // ASCII lowercasing keeps byte offsets aligned with the original.
    while let Some(start) = remaining.to_ascii_lowercase().find(&open) {
        result.push_str(&remaining[..start]);
        let after = &remaining[start..];
        if let Some(end) = after.to_ascii_lowercase().find(&close) {
            remaining = &after[end + close.len()..];
        } else {
            // No closing tag: remove the rest
            remaining = "";
            break;
        }
    }
    result.push_str(remaining);
    result
}
