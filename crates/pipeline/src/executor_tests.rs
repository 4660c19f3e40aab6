// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the executor: gates, ordering, listener protocol

use super::*;
use crate::listener::log_tag;
use crate::model::ActionMeta;
use crate::ops::{AbortOp, OpSpec, SetOp, TemplateOp};
use crate::{Listener, ValOrRef};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;
use tl_dom::{Node, Path};

#[derive(Clone, Default)]
struct Recorder {
    events: Rc<RefCell<Vec<String>>>,
}

impl Listener for Recorder {
    fn on_before(&self, action: &ActionSpec) {
        self.events
            .borrow_mut()
            .push(format!("before:{}", action.meta.name.as_deref().unwrap_or("?")));
    }

    fn on_after(&self, action: &ActionSpec, error: Option<&PipelineError>) {
        self.events.borrow_mut().push(format!(
            "after:{}:{}",
            action.meta.name.as_deref().unwrap_or("?"),
            if error.is_some() { "err" } else { "ok" }
        ));
    }

    fn on_log(&self, values: &[String]) {
        if let Some(tag) = log_tag(values) {
            self.events.borrow_mut().push(format!("tag:{tag}"));
        }
    }
}

fn named(name: &str, ops: OpSpec) -> ActionSpec {
    ActionSpec {
        meta: ActionMeta {
            name: Some(name.into()),
            ..ActionMeta::default()
        },
        ops,
        children: None,
    }
}

fn set_op(path: &str, value: &str) -> OpSpec {
    let mut data = serde_json::Map::new();
    data.insert("v".to_string(), serde_json::json!(value));
    OpSpec {
        set: Some(SetOp {
            data: Some(data),
            path: Some(path.into()),
            ..SetOp::default()
        }),
        ..OpSpec::default()
    }
}

fn lookup(ctx: &Context, path: &str) -> Option<Node> {
    ctx.data().lookup(&Path::parse(path).unwrap()).cloned()
}

#[test]
fn executes_ops_then_children() {
    let ctx = Context::default();
    let mut children = IndexMap::new();
    children.insert(
        "sub1".to_string(),
        named("sub1", set_op("child", "c")),
    );
    let action = ActionSpec {
        meta: ActionMeta::default(),
        ops: set_op("root", "r"),
        children: Some(children),
    };
    ctx.executor().execute(&action).unwrap();
    assert_eq!(lookup(&ctx, "root.v"), Some(Node::leaf("r")));
    assert_eq!(lookup(&ctx, "child.v"), Some(Node::leaf("c")));
}

#[test]
fn children_run_in_ascending_order() {
    let ctx = Context::default();
    let mut children = IndexMap::new();
    for (name, order) in [("a", 30), ("b", 10), ("c", 20)] {
        let mut child = named(name, set_op("last", name));
        child.meta.order = Some(order);
        children.insert(name.to_string(), child);
    }
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    let ctx = ctx.with_listener(Box::new(recorder));
    let action = ActionSpec {
        children: Some(children),
        ..ActionSpec::default()
    };
    ctx.executor().execute(&action).unwrap();
    let order: Vec<String> = events
        .borrow()
        .iter()
        .filter(|e| e.starts_with("before:") && !e.ends_with('?'))
        .cloned()
        .collect();
    assert_eq!(order, ["before:b", "before:c", "before:a"]);
    // last writer is the highest order
    assert_eq!(lookup(&ctx, "last.v"), Some(Node::leaf("a")));
}

#[test]
fn equal_orders_keep_document_order() {
    let ctx = Context::default();
    let mut children = IndexMap::new();
    for name in ["z", "a", "m"] {
        children.insert(name.to_string(), named(name, set_op("last", name)));
    }
    let action = ActionSpec {
        children: Some(children),
        ..ActionSpec::default()
    };
    ctx.executor().execute(&action).unwrap();
    assert_eq!(lookup(&ctx, "last.v"), Some(Node::leaf("m")));
}

#[test]
fn false_gate_skips_and_tags_log() {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"ENV": "dev"})))
        .with_listener(Box::new(recorder));
    let mut action = named("gated", set_op("hit", "x"));
    action.meta.when = Some("{{ ENV == \"prod\" }}".into());
    ctx.executor().execute(&action).unwrap();
    assert!(lookup(&ctx, "hit").is_none());
    let events = events.borrow();
    assert!(events.contains(&"tag:skip".to_string()));
    assert!(!events.iter().any(|e| e.starts_with("before:gated")));
}

#[test]
fn true_gate_runs_action() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"ENV": "prod"})));
    let mut action = named("gated", set_op("hit", "x"));
    action.meta.when = Some("{{ ENV == \"prod\" }}".into());
    ctx.executor().execute(&action).unwrap();
    assert_eq!(lookup(&ctx, "hit.v"), Some(Node::leaf("x")));
}

#[test]
fn invalid_gate_template_fails() {
    let ctx = Context::default();
    let mut action = named("gated", OpSpec::default());
    action.meta.when = Some("{{ Data.Unknown.Field }}".into());
    assert!(ctx.executor().execute(&action).is_err());
}

#[test]
fn failure_bubbles_through_on_after() {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    let ctx = Context::default().with_listener(Box::new(recorder));
    let mut children = IndexMap::new();
    children.insert(
        "boom".to_string(),
        named(
            "boom",
            OpSpec {
                abort: Some(AbortOp {
                    message: "stop".into(),
                }),
                ..OpSpec::default()
            },
        ),
    );
    let action = ActionSpec {
        meta: ActionMeta {
            name: Some("root".into()),
            ..ActionMeta::default()
        },
        children: Some(children),
        ..ActionSpec::default()
    };
    let err = ctx.executor().execute(&action);
    assert!(matches!(err, Err(PipelineError::Aborted(_))));
    let events = events.borrow();
    assert_eq!(
        *events,
        vec![
            "before:root".to_string(),
            "before:boom".to_string(),
            "after:boom:err".to_string(),
            "after:root:err".to_string(),
        ]
    );
}

#[test]
fn clone_happens_before_first_mutation() {
    // both ops in one action render against the entry snapshot
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"v": "entry"})));
    let mut data = serde_json::Map::new();
    data.insert("v".to_string(), serde_json::json!("mutated"));
    let action = ActionSpec {
        ops: OpSpec {
            set: Some(SetOp {
                data: Some(data),
                ..SetOp::default()
            }),
            template: Some(TemplateOp {
                template: "{{ v }}".into(),
                path: Some(ValOrRef::val("out")),
                ..TemplateOp::default()
            }),
            ..OpSpec::default()
        },
        ..ActionSpec::default()
    };
    ctx.executor().execute(&action).unwrap();
    // template ran after set, so the strict render sees the new value;
    // but its *cloned fields* were frozen at entry
    assert_eq!(lookup(&ctx, "out"), Some(Node::leaf("mutated")));
}

#[test]
fn nested_dispatch_is_reentrant() {
    let ctx = Context::default();
    let inner = named("inner", set_op("deep", "d"));
    let mut children = IndexMap::new();
    children.insert("inner".to_string(), inner);
    let outer = ActionSpec {
        children: Some(children),
        ..ActionSpec::default()
    };
    // executing from within an op-driven dispatch works the same
    ctx.executor().execute(&outer).unwrap();
    assert_eq!(lookup(&ctx, "deep.v"), Some(Node::leaf("d")));
}
