//! Message-level types: the provider's message envelope, extraction output,
//! and the summary used for list and detail views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::part::{ContentKind, Header, RawPart};

/// Label the provider attaches to messages that have not been read.
pub const UNREAD_LABEL: &str = "UNREAD";

/// A full message as returned by the provider's "get message" call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    #[serde(default)]
    pub label_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Milliseconds since the Unix epoch, as a decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_estimate: Option<u64>,

    /// Root of the part tree. Providers may omit it for partial metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<RawPart>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawMessage {
    /// Whether the message still carries the `UNREAD` label.
    pub fn is_unread(&self) -> bool {
        self.label_ids.iter().any(|l| l == UNREAD_LABEL)
    }

    /// Top-level headers (empty when the payload is missing).
    pub fn headers(&self) -> &[Header] {
        self.payload
            .as_ref()
            .map(|p| p.headers.as_slice())
            .unwrap_or(&[])
    }
}

/// Text and HTML recovered from a message's part tree.
///
/// Both fields are empty when the tree holds no decodable text leaf; that is
/// a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    /// All `text/plain` leaves, newline-joined in document order, trimmed.
    pub text_content: String,
    /// All `text/html` leaves, concatenated in document order, trimmed.
    pub html_content: String,
}

impl ExtractedContent {
    pub fn is_empty(&self) -> bool {
        self.text_content.is_empty() && self.html_content.is_empty()
    }
}

/// Everything the list and detail views need about one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageSummary {
    pub id: String,

    /// `Subject` header, or `"No Subject"`.
    pub subject: String,

    /// Raw `From` header value (may be empty).
    pub from: String,

    /// `Date` header, falling back to the provider's internal date.
    pub date: Option<DateTime<Utc>>,

    pub unread: bool,

    /// Provider size estimate in bytes (0 when unknown).
    pub size: u64,

    /// The body chosen for display (HTML preferred by default).
    pub body: String,

    /// Whether [`MessageSummary::body`] is HTML or plain text.
    pub body_kind: ContentKind,
}
