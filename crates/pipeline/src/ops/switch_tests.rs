// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the switch operation

use super::*;
use crate::model::ValOrRef;
use crate::ops::{OpSpec, SetOp};
use indexmap::IndexMap;
use tl_dom::{Node, Path};

fn set_result(value: &str) -> ActionSpec {
    let mut data = serde_json::Map::new();
    data.insert("result".to_string(), serde_json::json!(value));
    ActionSpec {
        ops: OpSpec {
            set: Some(SetOp {
                data: Some(data),
                ..SetOp::default()
            }),
            ..OpSpec::default()
        },
        ..ActionSpec::default()
    }
}

fn winner_switch() -> SwitchOp {
    let mut cases = IndexMap::new();
    cases.insert("Alice".to_string(), set_result("Alice is winner"));
    cases.insert("Bob".to_string(), set_result("Bob is winner"));
    SwitchOp {
        expr: ValOrRef::val("{{ name }}"),
        cases: Some(cases),
        default: Some(Box::new(set_result("No winner"))),
    }
}

fn result(ctx: &Context) -> Option<Node> {
    ctx.data().lookup(&Path::parse("result").unwrap()).cloned()
}

#[test]
fn first_matching_case_runs() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"name": "Bob"})));
    winner_switch().run(&ctx).unwrap();
    assert_eq!(result(&ctx), Some(Node::leaf("Bob is winner")));
}

#[test]
fn default_runs_when_no_case_matches() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"name": "Charlie"})));
    winner_switch().run(&ctx).unwrap();
    assert_eq!(result(&ctx), Some(Node::leaf("No winner")));
}

#[test]
fn no_case_and_no_default_fails() {
    let ctx = Context::default();
    let op = SwitchOp {
        expr: ValOrRef::val("x"),
        cases: None,
        default: None,
    };
    assert!(matches!(op.run(&ctx), Err(PipelineError::NoMatchingCase)));
}

#[test]
fn case_keys_are_templated() {
    let ctx = Context::new(Node::from_plain(
        &serde_json::json!({"name": "prod", "target": "prod"}),
    ));
    let mut cases = IndexMap::new();
    cases.insert("{{ target }}".to_string(), set_result("matched"));
    let op = SwitchOp {
        expr: ValOrRef::val("{{ name }}"),
        cases: Some(cases),
        default: None,
    };
    op.run(&ctx).unwrap();
    assert_eq!(result(&ctx), Some(Node::leaf("matched")));
}
