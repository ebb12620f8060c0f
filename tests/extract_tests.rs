//! Integration tests for multipart content extraction over provider-shaped JSON.

use std::path::Path;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use mailglance::model::message::{ExtractedContent, RawMessage};
use mailglance::model::part::{ContentKind, MessagePart, RawPart};
use mailglance::parser::body::{select_body, BodyPreference};
use mailglance::parser::extract::{extract_content, extract_content_with, TracingHook};
use mailglance::parser::message::{parse_message, payload_from_json};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

// ─── Test 1: multipart/alternative → both bodies ────────────────────

#[test]
fn test_alternative_payload() {
    let root = payload_from_json(&read_fixture("alternative_payload.json")).unwrap();
    let result = extract_content(root.as_ref());
    assert_eq!(
        result.content,
        ExtractedContent {
            text_content: "Hello\nWorld".into(),
            html_content: "<p>Hi</p>".into(),
        }
    );
    assert!(result.is_clean());
}

// ─── Test 2: nested message, attachments ignored ────────────────────

#[test]
fn test_nested_message_in_document_order() {
    let raw: RawMessage = serde_json::from_str(&read_fixture("nested_message.json")).unwrap();
    let root = raw.payload.as_ref().map(MessagePart::from_raw);
    let result = extract_content(root.as_ref());

    assert_eq!(
        result.content.text_content,
        "Your order #1042 has shipped.\n\nTracking: ZX-99"
    );
    assert_eq!(
        result.content.html_content,
        "<html><body><h1>Shipped</h1><p>Order #1042 is on its way.</p></body></html>"
    );
}

// ─── Test 3: one bad leaf does not hide the others ──────────────────

#[test]
fn test_malformed_leaf_is_skipped() {
    let root = payload_from_json(&read_fixture("malformed_leaf.json")).unwrap();
    let result = extract_content_with(root.as_ref(), &mut TracingHook);

    assert_eq!(result.content.text_content, "first part\nlast part");
    assert_eq!(result.content.html_content, "<b>still here</b>");
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].path.to_string(), "1");

    let err = result.into_strict().unwrap_err();
    assert!(err.to_string().contains("part 1"), "got: {err}");
}

// ─── Test 4: absent and empty inputs ────────────────────────────────

#[test]
fn test_absent_root_and_empty_tree() {
    assert!(extract_content(None).content.is_empty());

    let root = payload_from_json(r#"{"mimeType":"multipart/mixed","parts":[{"mimeType":"multipart/alternative","parts":[]}]}"#)
        .unwrap();
    let result = extract_content(root.as_ref());
    assert!(result.content.is_empty());
    assert!(result.is_clean());
}

// ─── Test 5: round trip through both base64 alphabets ───────────────

#[test]
fn test_round_trip_both_alphabets() {
    let original = "Line one\nZeile zwei: Grüße ✓\n<>?&";
    for encoded in [STANDARD.encode(original), URL_SAFE_NO_PAD.encode(original)] {
        let json = format!(r#"{{"mimeType":"text/plain","body":{{"data":"{encoded}"}}}}"#);
        let part: RawPart = serde_json::from_str(&json).unwrap();
        let result = extract_content(Some(&MessagePart::from(part)));
        assert_eq!(result.content.text_content, original);
    }
}

// ─── Test 6: summaries and body preference ──────────────────────────

#[test]
fn test_parse_message_summary() {
    let raw: RawMessage = serde_json::from_str(&read_fixture("nested_message.json")).unwrap();

    let parsed = parse_message(&raw, BodyPreference::Html);
    assert_eq!(parsed.summary.subject, "Your order has shipped");
    assert_eq!(parsed.summary.from, "Shop <orders@shop.example>");
    assert_eq!(parsed.summary.body_kind, ContentKind::Html);
    assert!(parsed.summary.unread);
    assert_eq!(parsed.summary.size, 18342);

    let text = select_body(&parsed.content, BodyPreference::Text);
    assert_eq!(text.kind, ContentKind::PlainText);
    assert!(text.content.starts_with("Your order #1042"));
}

// ─── Test 7: extraction is safe to run in parallel ──────────────────

#[test]
fn test_parallel_extraction() {
    let raw: RawMessage = serde_json::from_str(&read_fixture("nested_message.json")).unwrap();
    let root = raw.payload.as_ref().map(MessagePart::from_raw).unwrap();
    let expected = extract_content(Some(&root));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| extract_content(Some(&root))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
