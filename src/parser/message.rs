//! Turn a provider message into what the list and detail views show.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug_span;

use crate::error::{MailError, Result};
use crate::model::message::{ExtractedContent, MessageSummary, RawMessage};
use crate::model::part::MessagePart;
use crate::parser::body::{select_body, BodyPreference};
use crate::parser::extract::{extract_content_with, SkippedPart, TracingHook};
use crate::parser::header;

/// A message with its extracted content and any leaves that failed to decode.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub summary: MessageSummary,
    pub content: ExtractedContent,
    pub skipped: Vec<SkippedPart>,
}

/// Extract and summarize one message.
///
/// A message without a payload is not an error: it gets an empty body.
pub fn parse_message(raw: &RawMessage, preference: BodyPreference) -> ParsedMessage {
    let span = debug_span!("parse_message", id = %raw.id);
    let _guard = span.enter();

    let headers = raw.headers();
    let root = raw.payload.as_ref().map(MessagePart::from_raw);
    let extraction = extract_content_with(root.as_ref(), &mut TracingHook);
    let body = select_body(&extraction.content, preference);

    let date = header::find_header(headers, "Date")
        .and_then(header::parse_date)
        .or_else(|| internal_date(raw));

    let summary = MessageSummary {
        id: raw.id.clone(),
        subject: header::subject(headers),
        from: header::find_header(headers, "From")
            .unwrap_or_default()
            .to_string(),
        date,
        unread: raw.is_unread(),
        size: raw.size_estimate.unwrap_or(0),
        body: body.content,
        body_kind: body.kind,
    };

    ParsedMessage {
        summary,
        content: extraction.content,
        skipped: extraction.skipped,
    }
}

/// Shorthand for [`parse_message`] when only the summary is needed.
pub fn summarize(raw: &RawMessage, preference: BodyPreference) -> MessageSummary {
    parse_message(raw, preference).summary
}

/// Read a standalone payload document.
///
/// Accepts either a part tree (`{"mimeType": ..., "parts": [...]}`) or a
/// whole message, whose `payload` is used. `null`, or a message without a
/// payload, yields `None`.
pub fn payload_from_json(json: &str) -> Result<Option<MessagePart>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| MailError::InvalidPayload(e.to_string()))?;

    let root = match value {
        Value::Null => None,
        Value::Object(mut map) if map.contains_key("payload") || map.contains_key("labelIds") => {
            map.remove("payload").filter(|p| !p.is_null())
        }
        other => Some(other),
    };

    root.map(serde_json::from_value::<MessagePart>)
        .transpose()
        .map_err(|e| MailError::InvalidPayload(e.to_string()))
}

/// The provider's receive time (`internalDate`, epoch milliseconds).
pub fn internal_date(raw: &RawMessage) -> Option<DateTime<Utc>> {
    raw.internal_date
        .as_deref()
        .and_then(|d| d.trim().parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
}
