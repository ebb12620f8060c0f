//! Integration tests for the JSON mailbox, inbox actions and rendering.

use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;

use mailglance::config::Config;
use mailglance::error::MailError;
use mailglance::inbox::navigation::Selection;
use mailglance::parser::body::BodyPreference;
use mailglance::parser::header::NO_SUBJECT;
use mailglance::parser::message::summarize;
use mailglance::render;
use mailglance::store::mailbox::Mailbox;
use mailglance::store::unsubscribe;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

// ─── Test 1: unread listing ─────────────────────────────────────────

#[test]
fn test_list_unread() {
    let mailbox = Mailbox::open(fixture("mailbox.json")).unwrap();
    assert_eq!(mailbox.messages().len(), 4);

    let ids: Vec<&str> = mailbox
        .list_unread()
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec!["m1", "m3", "m4"]);
}

// ─── Test 2: summaries for every kind of message ────────────────────

#[test]
fn test_summaries() {
    let mailbox = Mailbox::open(fixture("mailbox.json")).unwrap();

    let digest = summarize(mailbox.get("m1").unwrap(), BodyPreference::Html);
    assert_eq!(digest.body, "<p>Top <b>stories</b> this week</p>");
    assert_eq!(
        digest.date.map(|d| d.to_rfc3339()),
        Some("2024-01-08T08:30:00+00:00".to_string())
    );

    let note = summarize(mailbox.get("m3").unwrap(), BodyPreference::Html);
    assert_eq!(note.body, "Lunch at 1?\nSee you.");

    // Attachment only, no subject, unparseable date
    let bare = summarize(mailbox.get("m4").unwrap(), BodyPreference::Html);
    assert_eq!(bare.subject, NO_SUBJECT);
    assert_eq!(bare.body, "");
    assert!(bare.date.is_some(), "should fall back to internalDate");

    let detail = render::detail_text(&bare, &Config::default());
    assert!(detail.contains(render::NO_CONTENT));
}

// ─── Test 3: mark as read persists ──────────────────────────────────

#[test]
fn test_mark_as_read_and_save() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("box.json");
    file.write_file(&fixture("mailbox.json")).unwrap();

    let mut mailbox = Mailbox::open(file.path()).unwrap();
    assert!(mailbox.mark_as_read("m1").unwrap());
    mailbox.save().unwrap();

    let reopened = Mailbox::open(file.path()).unwrap();
    let ids: Vec<&str> = reopened
        .list_unread()
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(ids, vec!["m3", "m4"]);
    assert_eq!(reopened.get("m1").unwrap().label_ids, vec!["INBOX".to_string()]);

    // Fields we do not model survive the rewrite
    file.assert(predicate::str::contains("\"resultSizeEstimate\""));
    file.assert(predicate::str::contains("\"attachmentId\": \"X1\""));
    temp.child("box.json.tmp").assert(predicate::path::missing());
}

// ─── Test 4: unsubscribe link resolution ────────────────────────────

#[test]
fn test_unsubscribe_link() {
    let mailbox = Mailbox::open(fixture("mailbox.json")).unwrap();

    let value = mailbox.unsubscribe_link("m1").unwrap();
    let link = unsubscribe::resolve(value, "localhost:3000", "https://mail.example.com");
    assert_eq!(
        link.as_deref(),
        Some("https://mail.example.com/api/unsubscribe?u=77")
    );

    assert!(matches!(
        mailbox.unsubscribe_link("m3"),
        Err(MailError::NoUnsubscribeLink(_))
    ));
}

// ─── Test 5: open errors ────────────────────────────────────────────

#[test]
fn test_open_errors() {
    let temp = assert_fs::TempDir::new().unwrap();

    let missing = Mailbox::open(temp.path().join("nope.json"));
    assert!(matches!(missing, Err(MailError::FileNotFound(_))));

    let bad = temp.child("bad.json");
    bad.write_str("{ \"messages\": [ { \"id\": 5 } ] }").unwrap();
    assert!(matches!(
        Mailbox::open(bad.path()),
        Err(MailError::InvalidMailbox { .. })
    ));
}

// ─── Test 6: navigate, read, move on ────────────────────────────────

#[test]
fn test_read_flow_with_selection() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("box.json");
    std::fs::copy(fixture("mailbox.json"), &path).unwrap();

    let mut mailbox = Mailbox::open(&path).unwrap();
    let mut selection = Selection::new(
        mailbox
            .list_unread()
            .iter()
            .map(|m| m.id.clone())
            .collect(),
    );

    selection.move_down();
    assert_eq!(selection.selected(), Some("m3"));

    let id = selection.selected().unwrap().to_string();
    mailbox.mark_as_read(&id).unwrap();
    selection.remove(&id);

    assert_eq!(selection.selected(), Some("m4"));
    assert_eq!(mailbox.list_unread().len(), 2);
}
