//! Core data model types for message parts, messages and extraction output.

pub mod message;
pub mod part;
