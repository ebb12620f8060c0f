//! `mailglance`: a minimal unread-mail viewer core.
//!
//! The heart of the crate is [`parser::extract`], which walks a provider's
//! multipart part tree and recovers its text and HTML bodies. Around it sit a
//! local JSON mailbox with the two inbox actions (mark-as-read, unsubscribe),
//! list navigation state, and plain-text rendering for the CLI.

pub mod config;
pub mod error;
pub mod inbox;
pub mod model;
pub mod parser;
pub mod render;
pub mod store;
