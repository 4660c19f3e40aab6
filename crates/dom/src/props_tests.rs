// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for flatten/unflatten

use super::*;

#[test]
fn flatten_nested_containers() {
    let node = Node::from_plain(&serde_json::json!({
        "root": {"sub1": {"leaf1": "a"}, "sub2": "b"}
    }));
    let flat = flatten(&node);
    assert_eq!(
        flat,
        vec![
            ("root.sub1.leaf1".to_string(), Scalar::Str("a".into())),
            ("root.sub2".to_string(), Scalar::Str("b".into())),
        ]
    );
}

#[test]
fn flatten_lists_by_index() {
    let node = Node::from_plain(&serde_json::json!({"l": ["x", "y"]}));
    let flat = flatten(&node);
    assert_eq!(flat[0].0, "l[0]");
    assert_eq!(flat[1].0, "l[1]");
}

#[test]
fn flatten_escapes_dotted_keys() {
    let mut node = Node::container();
    node.set(
        &Path::from(vec![Segment::Key("a.b".into())]),
        Node::leaf("v"),
    );
    let flat = flatten(&node);
    assert_eq!(flat[0].0, "a\\.b");
}

#[test]
fn unflatten_round_trips() {
    let node = Node::from_plain(&serde_json::json!({
        "root": {"sub": {"leaf": "v"}, "list": ["a", "b"]}
    }));
    let flat = flatten(&node);
    let rebuilt = unflatten(flat.iter().map(|(k, v)| (k.as_str(), v.clone()))).unwrap();
    assert_eq!(rebuilt, node);
}

#[test]
fn unflatten_rejects_bad_key() {
    let err = unflatten([("a..b", Scalar::Str("v".into()))]);
    assert!(err.is_err());
}
