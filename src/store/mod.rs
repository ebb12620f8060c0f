//! Message storage: the local mailbox and the actions it supports.

pub mod mailbox;
pub mod unsubscribe;
