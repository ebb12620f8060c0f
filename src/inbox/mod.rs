//! Inbox view state.

pub mod navigation;
