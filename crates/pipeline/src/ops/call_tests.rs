// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for call and define

use super::*;
use crate::model::{ActionSpec, ValOrRef};
use crate::ops::{DefineOp, OpSpec, TemplateOp};
use tl_dom::Path;

fn callable_body() -> ActionSpec {
    // copies .args.x into seen
    ActionSpec {
        ops: OpSpec {
            template: Some(TemplateOp {
                template: "{{ args.x }}".into(),
                path: Some(ValOrRef::val("seen")),
                ..TemplateOp::default()
            }),
            ..OpSpec::default()
        },
        ..ActionSpec::default()
    }
}

fn lookup(ctx: &Context, path: &str) -> Option<Node> {
    ctx.data().lookup(&Path::parse(path).unwrap()).cloned()
}

#[test]
fn call_unregistered_fails() {
    let ctx = Context::default();
    let op = CallOp {
        name: "nope".into(),
        ..CallOp::default()
    };
    assert!(matches!(op.run(&ctx), Err(PipelineError::NotRegistered(_))));
}

#[test]
fn define_then_call_passes_args_and_cleans_up() {
    let ctx = Context::default();
    let define = DefineOp {
        name: "f".into(),
        action: Box::new(callable_body()),
    };
    define.run(&ctx).unwrap();

    let mut args = serde_json::Map::new();
    args.insert("x".to_string(), serde_json::json!(1));
    let call = CallOp {
        name: "f".into(),
        args: Some(args),
        args_path: None,
    };
    call.run(&ctx).unwrap();

    assert_eq!(lookup(&ctx, "seen"), Some(Node::leaf("1")));
    assert!(lookup(&ctx, "args").is_none());
}

#[test]
fn redefining_fails() {
    let ctx = Context::default();
    let define = DefineOp {
        name: "f".into(),
        action: Box::new(ActionSpec::default()),
    };
    define.run(&ctx).unwrap();
    assert!(matches!(
        define.run(&ctx),
        Err(PipelineError::AlreadyDefined(_))
    ));
}

#[test]
fn custom_args_path() {
    let ctx = Context::default();
    let body = ActionSpec {
        ops: OpSpec {
            template: Some(TemplateOp {
                template: "{{ params.x }}".into(),
                path: Some(ValOrRef::val("seen")),
                ..TemplateOp::default()
            }),
            ..OpSpec::default()
        },
        ..ActionSpec::default()
    };
    DefineOp {
        name: "g".into(),
        action: Box::new(body),
    }
    .run(&ctx)
    .unwrap();

    let mut args = serde_json::Map::new();
    args.insert("x".to_string(), serde_json::json!("v"));
    CallOp {
        name: "g".into(),
        args: Some(args),
        args_path: Some("params".into()),
    }
    .run(&ctx)
    .unwrap();
    assert_eq!(lookup(&ctx, "seen"), Some(Node::leaf("v")));
    assert!(lookup(&ctx, "params").is_none());
}

#[test]
fn args_are_rendered_against_snapshot() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"v": "rendered"})));
    DefineOp {
        name: "h".into(),
        action: Box::new(callable_body()),
    }
    .run(&ctx)
    .unwrap();
    let mut args = serde_json::Map::new();
    args.insert("x".to_string(), serde_json::json!("{{ v }}"));
    CallOp {
        name: "h".into(),
        args: Some(args),
        args_path: None,
    }
    .run(&ctx)
    .unwrap();
    assert_eq!(lookup(&ctx, "seen"), Some(Node::leaf("rendered")));
}

#[test]
fn args_removed_even_when_callable_fails() {
    let ctx = Context::default();
    let failing = ActionSpec {
        ops: OpSpec {
            abort: Some(crate::ops::AbortOp {
                message: "boom".into(),
            }),
            ..OpSpec::default()
        },
        ..ActionSpec::default()
    };
    DefineOp {
        name: "bad".into(),
        action: Box::new(failing),
    }
    .run(&ctx)
    .unwrap();
    let call = CallOp {
        name: "bad".into(),
        args: Some(serde_json::Map::new()),
        args_path: None,
    };
    assert!(call.run(&ctx).is_err());
    assert!(lookup(&ctx, "args").is_none());
}
