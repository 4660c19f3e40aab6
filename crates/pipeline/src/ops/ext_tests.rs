// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the ext operation

use super::*;
use crate::ext::ActionFactory;
use crate::model::ActionSpec;
use crate::ops::{OpSpec, SetOp};
use std::rc::Rc;
use tl_dom::{Node, Path};

struct MarkerFactory;

impl ActionFactory for MarkerFactory {
    fn for_args(
        &self,
        _ctx: &Context,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> ActionSpec {
        let mut data = serde_json::Map::new();
        data.insert(
            "mark".to_string(),
            args.get("value").cloned().unwrap_or(serde_json::json!("none")),
        );
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
}

#[test]
fn unknown_function_fails() {
    let ctx = Context::default();
    let op = ExtOp {
        function: "nope".into(),
        args: None,
    };
    assert!(matches!(op.run(&ctx), Err(PipelineError::NoSuchFunction(_))));
}

#[test]
fn factory_action_executes_with_args() {
    let ctx = Context::default();
    ctx.register_action_factory("marker", Rc::new(MarkerFactory));
    let mut args = serde_json::Map::new();
    args.insert("value".to_string(), serde_json::json!("hit"));
    let op = ExtOp {
        function: "marker".into(),
        args: Some(args),
    };
    op.run(&ctx).unwrap();
    let tree = ctx.data();
    assert_eq!(
        tree.lookup(&Path::parse("mark").unwrap()),
        Some(&Node::leaf("hit"))
    );
}
