//! Message part tree: the provider's wire shape and the typed tree built from it.
//!
//! [`RawPart`] mirrors the JSON a mail provider returns for a message payload
//! (`mimeType`, `body.data`, `parts`). [`MessagePart`] is the form the
//! extractor walks: every part is classified exactly once, when it is
//! converted, as a content leaf, a container, or an empty part.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single `name: value` header as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Inline body holder of a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartBody {
    /// Decoded size in bytes, as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Base64 content (standard or URL-safe alphabet). Only set on leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// Fields we do not interpret (e.g. `attachmentId`), kept for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A message part exactly as the provider sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PartBody>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<RawPart>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawPart {
    /// Non-empty `body.data`, if any. An empty string counts as absent.
    pub fn data(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.data.as_deref())
            .filter(|d| !d.is_empty())
    }
}

/// The kind of textual content a leaf carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "text/plain")]
    PlainText,
    #[serde(rename = "text/html")]
    Html,
}

impl ContentKind {
    /// Classify a MIME type. Only the exact strings `text/plain` and
    /// `text/html` are content types; parameters or other casing are not.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match mime_type {
            "text/plain" => Some(Self::PlainText),
            "text/html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Html => "text/html",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A classified message part.
///
/// A part with a textual MIME type and body data is a [`MessagePart::Leaf`];
/// otherwise a part with a `parts` list (even an empty one) is a
/// [`MessagePart::Container`]; anything else is [`MessagePart::Empty`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawPart")]
pub enum MessagePart {
    /// A `text/plain` or `text/html` part with base64 body data.
    Leaf { kind: ContentKind, data: String },
    /// A part that only groups child parts.
    Container {
        mime_type: String,
        children: Vec<MessagePart>,
    },
    /// A part contributing nothing: no data and no children, or a non-text leaf.
    Empty { mime_type: String },
}

impl MessagePart {
    /// Build a leaf from already-encoded base64 data.
    pub fn leaf(kind: ContentKind, data: impl Into<String>) -> Self {
        Self::Leaf {
            kind,
            data: data.into(),
        }
    }

    /// Build a container of the given MIME type.
    pub fn container(mime_type: impl Into<String>, children: Vec<MessagePart>) -> Self {
        Self::Container {
            mime_type: mime_type.into(),
            children,
        }
    }

    /// Classify a borrowed wire part (and its whole subtree).
    pub fn from_raw(raw: &RawPart) -> Self {
        if let (Some(kind), Some(data)) = (ContentKind::from_mime_type(&raw.mime_type), raw.data())
        {
            return Self::leaf(kind, data);
        }
        match &raw.parts {
            Some(parts) => Self::container(
                raw.mime_type.clone(),
                parts.iter().map(Self::from_raw).collect(),
            ),
            None => Self::Empty {
                mime_type: raw.mime_type.clone(),
            },
        }
    }

    /// MIME type of this part.
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Leaf { kind, .. } => kind.mime_type(),
            Self::Container { mime_type, .. } | Self::Empty { mime_type } => mime_type,
        }
    }

    /// Child parts (empty for leaves and empty parts).
    pub fn children(&self) -> &[MessagePart] {
        match self {
            Self::Container { children, .. } => children,
            _ => &[],
        }
    }
}

impl From<RawPart> for MessagePart {
    fn from(raw: RawPart) -> Self {
        let kind = ContentKind::from_mime_type(&raw.mime_type);
        let data = raw
            .body
            .and_then(|b| b.data)
            .filter(|d| !d.is_empty());

        match (kind, data, raw.parts) {
            (Some(kind), Some(data), _) => Self::Leaf { kind, data },
            (_, _, Some(parts)) => Self::Container {
                mime_type: raw.mime_type,
                children: parts.into_iter().map(Self::from).collect(),
            },
            _ => Self::Empty {
                mime_type: raw.mime_type,
            },
        }
    }
}

impl From<&RawPart> for MessagePart {
    fn from(raw: &RawPart) -> Self {
        Self::from_raw(raw)
    }
}
