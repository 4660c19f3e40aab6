// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the format codecs

use super::*;
use crate::Path;

#[test]
fn format_from_str() {
    assert_eq!("yaml".parse::<Format>().unwrap(), Format::Yaml);
    assert_eq!("YAML".parse::<Format>().unwrap(), Format::Yaml);
    assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
    assert_eq!("properties".parse::<Format>().unwrap(), Format::Properties);
    assert!("csv".parse::<Format>().is_err());
}

#[test]
fn yaml_decode_encode_round_trip() {
    let doc = "root:\n  sub1:\n    leaf3: abcd\n  list:\n    - 1\n    - 2\n";
    let node = decode_str(doc, Format::Yaml).unwrap();
    assert_eq!(
        node.lookup(&Path::parse("root.sub1.leaf3").unwrap()),
        Some(&Node::leaf("abcd"))
    );
    let text = encode_to_string(&node, Format::Yaml).unwrap();
    let reparsed = decode_str(&text, Format::Yaml).unwrap();
    assert_eq!(reparsed, node);
}

#[test]
fn json_decode() {
    let node = decode_str(r#"{"a": {"b": 2}}"#, Format::Json).unwrap();
    assert_eq!(
        node.lookup(&Path::parse("a.b").unwrap()),
        Some(&Node::leaf(2i64))
    );
}

#[test]
fn properties_decode_builds_nested_tree() {
    let doc = "# header comment\nroot.sub1.leaf2=abcdef\nroot.sub1.leaf1 = x\n\n";
    let node = decode_str(doc, Format::Properties).unwrap();
    assert_eq!(
        node.lookup(&Path::parse("root.sub1.leaf2").unwrap()),
        Some(&Node::leaf("abcdef"))
    );
    assert_eq!(
        node.lookup(&Path::parse("root.sub1.leaf1").unwrap()),
        Some(&Node::leaf("x"))
    );
}

#[test]
fn properties_decode_rejects_malformed_line() {
    assert!(decode_str("no separator here", Format::Properties).is_err());
}

#[test]
fn properties_encode_is_sorted() {
    let node = Node::from_plain(&serde_json::json!({"b": "2", "a": {"x": "1"}}));
    let text = encode_to_string(&node, Format::Properties).unwrap();
    assert_eq!(text, "a.x=1\nb=2\n");
}

#[test]
fn text_decode_wraps_leaf() {
    let node = decode_str("raw content", Format::Text).unwrap();
    assert_eq!(node, Node::leaf("raw content"));
}

#[test]
fn text_encode_requires_leaf() {
    assert_eq!(
        encode_to_string(&Node::leaf("plain"), Format::Text).unwrap(),
        "plain"
    );
    let err = encode_to_string(&Node::container(), Format::Text);
    assert!(matches!(err, Err(DomError::UnsupportedNode { .. })));
}
