//! Local mailbox: a JSON file of provider-shaped messages.
//!
//! The file looks like a provider list response with full messages inlined:
//!
//! ```json
//! { "messages": [ { "id": "...", "labelIds": ["UNREAD"], "payload": { ... } } ] }
//! ```
//!
//! Fields this crate does not interpret are preserved when the mailbox is saved.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{MailError, Result};
use crate::model::message::{RawMessage, UNREAD_LABEL};
use crate::parser::header;

/// On-disk layout of a mailbox file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailboxFile {
    #[serde(default)]
    pub messages: Vec<RawMessage>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A mailbox loaded in memory. Changes are written back with [`Mailbox::save`].
#[derive(Debug)]
pub struct Mailbox {
    path: PathBuf,
    file: MailboxFile,
}

impl Mailbox {
    /// Load a mailbox file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MailError::FileNotFound(path.clone())
            } else {
                MailError::io(&path, e)
            }
        })?;

        let file: MailboxFile =
            serde_json::from_str(&contents).map_err(|e| MailError::InvalidMailbox {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            path = %path.display(),
            messages = file.messages.len(),
            "Opened mailbox"
        );
        Ok(Self { path, file })
    }

    /// An in-memory mailbox that will be written to `path` on save.
    pub fn from_messages(path: impl Into<PathBuf>, messages: Vec<RawMessage>) -> Self {
        Self {
            path: path.into(),
            file: MailboxFile {
                messages,
                extra: Map::new(),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All messages, in file order.
    pub fn messages(&self) -> &[RawMessage] {
        &self.file.messages
    }

    /// Messages carrying the `UNREAD` label, in file order.
    pub fn list_unread(&self) -> Vec<&RawMessage> {
        self.file.messages.iter().filter(|m| m.is_unread()).collect()
    }

    /// Look up a message by id.
    pub fn get(&self, id: &str) -> Result<&RawMessage> {
        self.file
            .messages
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| MailError::MessageNotFound(id.to_string()))
    }

    /// Remove the `UNREAD` label. Returns `false` if the message was already read.
    pub fn mark_as_read(&mut self, id: &str) -> Result<bool> {
        let message = self
            .file
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| MailError::MessageNotFound(id.to_string()))?;

        let before = message.label_ids.len();
        message.label_ids.retain(|l| l != UNREAD_LABEL);
        let changed = message.label_ids.len() != before;

        debug!(id, changed, "Marked message as read");
        Ok(changed)
    }

    /// Raw `List-Unsubscribe` header value of a message.
    pub fn unsubscribe_link(&self, id: &str) -> Result<&str> {
        let message = self.get(id)?;
        header::find_header(message.headers(), "List-Unsubscribe")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| MailError::NoUnsubscribeLink(id.to_string()))
    }

    /// Write the mailbox back to its path.
    ///
    /// The JSON goes to a sibling temp file first and is renamed over the
    /// original, so a failed write leaves the old file intact. The temp file
    /// is removed if the rename fails.
    pub fn save(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.file)
            .map_err(|e| MailError::Serialize(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mailbox.json".to_string());
        let tmp = self.path.with_file_name(format!("{file_name}.tmp"));

        std::fs::write(&tmp, contents).map_err(|e| MailError::io(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(MailError::io(&self.path, e));
        }

        info!(path = %self.path.display(), "Saved mailbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::part::{Header, RawPart};

    fn message(id: &str, labels: &[&str], headers: Vec<Header>) -> RawMessage {
        RawMessage {
            id: id.to_string(),
            label_ids: labels.iter().map(|l| l.to_string()).collect(),
            payload: Some(RawPart {
                mime_type: "text/plain".into(),
                headers,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn sample() -> Mailbox {
        Mailbox::from_messages(
            "unused.json",
            vec![
                message("a", &["INBOX", "UNREAD"], vec![]),
                message("b", &["INBOX"], vec![]),
                message(
                    "c",
                    &["UNREAD"],
                    vec![Header {
                        name: "List-Unsubscribe".into(),
                        value: "<https://x.example/u>".into(),
                    }],
                ),
            ],
        )
    }

    #[test]
    fn test_list_unread_keeps_order() {
        let mailbox = sample();
        let ids: Vec<&str> = mailbox.list_unread().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_mark_as_read() {
        let mut mailbox = sample();
        assert!(mailbox.mark_as_read("a").unwrap());
        assert!(!mailbox.mark_as_read("a").unwrap());
        assert_eq!(mailbox.get("a").unwrap().label_ids, vec!["INBOX".to_string()]);
        assert_eq!(mailbox.list_unread().len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let mut mailbox = sample();
        assert!(matches!(mailbox.get("zz"), Err(MailError::MessageNotFound(_))));
        assert!(matches!(
            mailbox.mark_as_read("zz"),
            Err(MailError::MessageNotFound(_))
        ));
    }

    #[test]
    fn test_unsubscribe_link() {
        let mailbox = sample();
        assert_eq!(mailbox.unsubscribe_link("c").unwrap(), "<https://x.example/u>");
        assert!(matches!(
            mailbox.unsubscribe_link("a"),
            Err(MailError::NoUnsubscribeLink(_))
        ));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory in place of the mailbox makes the rename fail
        let target = dir.path().join("box.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), "x").unwrap();

        let mailbox = Mailbox::from_messages(&target, sample().messages().to_vec());
        assert_eq!(mailbox.path(), target.as_path());

        let err = mailbox.save().unwrap_err();
        assert!(matches!(err, MailError::Io { .. }));
        assert!(!dir.path().join("box.json.tmp").exists());
        assert!(target.join("keep").exists());
    }
}
