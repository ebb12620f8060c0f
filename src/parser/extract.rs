//! Multipart content extraction: walk a part tree and collect its text and HTML.
//!
//! The walk is depth-first and pre-order, children in the order given.
//! `text/plain` leaves are appended to the text buffer followed by a newline,
//! `text/html` leaves are appended to the HTML buffer as-is, containers only
//! contribute their children, and everything else is ignored. Both buffers are
//! trimmed at the end.
//!
//! A leaf whose base64 cannot be decoded is skipped and reported in
//! [`Extraction::skipped`]; the rest of the tree is still extracted.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MailError, Result};
use crate::model::message::ExtractedContent;
use crate::model::part::{ContentKind, MessagePart};
use crate::parser::decode;

/// Position of a part in the tree, as child indices from the root.
///
/// Displayed as `root` for the root part and `0.1` for the second child of
/// the first child.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PartPath(Vec<usize>);

impl PartPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th child of this part.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for PartPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// A leaf left out of the result because its body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPart {
    pub path: PartPath,
    pub kind: ContentKind,
    pub reason: String,
}

/// Extracted content plus the leaves that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub content: ExtractedContent,
    pub skipped: Vec<SkippedPart>,
}

impl Extraction {
    /// `true` when every content leaf decoded.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Fail with the first skipped leaf, if any.
    pub fn into_strict(self) -> Result<ExtractedContent> {
        if let Some(first) = self.skipped.into_iter().next() {
            return Err(MailError::Decode {
                part: first.path.to_string(),
                reason: first.reason,
            });
        }
        Ok(self.content)
    }
}

/// Observer for extraction progress, supplied by the caller.
///
/// All methods default to doing nothing.
pub trait ExtractionHook {
    /// A content leaf was decoded and appended.
    fn on_leaf(&mut self, _path: &PartPath, _kind: ContentKind, _decoded_len: usize) {}

    /// A content leaf was skipped.
    fn on_skipped(&mut self, _skipped: &SkippedPart) {}

    /// The walk finished; `content` is the final, trimmed result.
    fn on_finished(&mut self, _content: &ExtractedContent) {}
}

/// Hook that observes nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl ExtractionHook for NoopHook {}

/// Hook that reports through `tracing` events.
///
/// Wrap the call in a span to attach message context.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHook;

impl ExtractionHook for TracingHook {
    fn on_leaf(&mut self, path: &PartPath, kind: ContentKind, decoded_len: usize) {
        debug!(part = %path, %kind, bytes = decoded_len, "Extracted leaf");
    }

    fn on_skipped(&mut self, skipped: &SkippedPart) {
        warn!(
            part = %skipped.path,
            kind = %skipped.kind,
            reason = %skipped.reason,
            "Skipping undecodable leaf"
        );
    }

    fn on_finished(&mut self, content: &ExtractedContent) {
        if content.is_empty() {
            warn!("No content extracted from message");
        } else {
            debug!(
                text_len = content.text_content.len(),
                html_len = content.html_content.len(),
                "Extraction finished"
            );
        }
    }
}

/// Extract text and HTML from a part tree.
///
/// An absent root yields an empty result.
pub fn extract_content(root: Option<&MessagePart>) -> Extraction {
    extract_content_with(root, &mut NoopHook)
}

/// Same as [`extract_content`], reporting progress to `hook`.
pub fn extract_content_with(
    root: Option<&MessagePart>,
    hook: &mut dyn ExtractionHook,
) -> Extraction {
    let mut text = String::new();
    let mut html = String::new();
    let mut skipped = Vec::new();

    // Explicit stack: nesting depth is not bounded by the call stack.
    let mut stack: Vec<(&MessagePart, PartPath)> =
        root.into_iter().map(|part| (part, PartPath::root())).collect();

    while let Some((part, path)) = stack.pop() {
        match part {
            MessagePart::Leaf { kind, data } => match decode::decode_text(data) {
                Ok(decoded) => {
                    hook.on_leaf(&path, *kind, decoded.len());
                    match kind {
                        ContentKind::PlainText => {
                            text.push_str(&decoded);
                            text.push('\n');
                        }
                        ContentKind::Html => html.push_str(&decoded),
                    }
                }
                Err(e) => {
                    let entry = SkippedPart {
                        path,
                        kind: *kind,
                        reason: e.to_string(),
                    };
                    hook.on_skipped(&entry);
                    skipped.push(entry);
                }
            },
            MessagePart::Container { children, .. } => {
                // Pushed in reverse so the first child is visited first.
                for (index, child) in children.iter().enumerate().rev() {
                    stack.push((child, path.child(index)));
                }
            }
            MessagePart::Empty { .. } => {}
        }
    }

    let content = ExtractedContent {
        text_content: text.trim().to_string(),
        html_content: html.trim().to_string(),
    };
    hook.on_finished(&content);

    Extraction { content, skipped }
}
