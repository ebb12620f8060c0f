//! Centralized error types for mailglance.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailglance library.
#[derive(Error, Debug)]
pub enum MailError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified mailbox file does not exist.
    #[error("Mailbox file not found: {0}")]
    FileNotFound(PathBuf),

    /// The file is not a readable mailbox (bad JSON or wrong shape).
    #[error("Invalid mailbox '{path}': {reason}")]
    InvalidMailbox { path: PathBuf, reason: String },

    /// A standalone payload document is not valid JSON or not a part tree.
    #[error("Invalid message payload: {0}")]
    InvalidPayload(String),

    /// A leaf body could not be decoded.
    #[error("Cannot decode body of part {part}: {reason}")]
    Decode { part: String, reason: String },

    /// No message with the given id exists in the mailbox.
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// The message carries no `List-Unsubscribe` header.
    #[error("No unsubscribe link found for message {0}")]
    NoUnsubscribeLink(String),

    /// Writing a mailbox or report back out failed.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias for `Result<T, MailError>`.
pub type Result<T> = std::result::Result<T, MailError>;

impl MailError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `MailError::io`).
impl From<std::io::Error> for MailError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
