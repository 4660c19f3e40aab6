// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the template operation

use super::*;
use tl_dom::{Path, Scalar};

fn lookup(ctx: &Context, path: &str) -> Option<Node> {
    ctx.data().lookup(&Path::parse(path).unwrap()).cloned()
}

#[test]
fn empty_template_fails() {
    let op = TemplateOp {
        path: Some(ValOrRef::val("Out")),
        ..TemplateOp::default()
    };
    assert!(matches!(
        op.run(&Context::default()),
        Err(PipelineError::TemplateEmpty)
    ));
}

#[test]
fn missing_path_fails() {
    let op = TemplateOp {
        template: "x".into(),
        ..TemplateOp::default()
    };
    assert!(matches!(
        op.run(&Context::default()),
        Err(PipelineError::PathEmpty)
    ));
}

#[test]
fn renders_and_stores_string_leaf() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"who": "all"})));
    let op = TemplateOp {
        template: "hi {{ who }}".into(),
        path: Some(ValOrRef::val("Out")),
        ..TemplateOp::default()
    };
    op.run(&ctx).unwrap();
    assert_eq!(lookup(&ctx, "Out"), Some(Node::leaf("hi all")));
}

#[test]
fn parse_as_int64_stores_integer_leaf() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "{{ max(1, 3, 5) }}".into(),
        path: Some(ValOrRef::val("Out")),
        parse_as: Some(ParseTextAs::Int64),
        ..TemplateOp::default()
    };
    op.run(&ctx).unwrap();
    let Some(Node::Leaf(scalar)) = lookup(&ctx, "Out") else {
        panic!("expected leaf");
    };
    assert_eq!(scalar, Scalar::Int(5));
}

#[test]
fn parse_as_float64() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "2.5".into(),
        path: Some(ValOrRef::val("Out")),
        parse_as: Some(ParseTextAs::Float64),
        ..TemplateOp::default()
    };
    op.run(&ctx).unwrap();
    let Some(Node::Leaf(scalar)) = lookup(&ctx, "Out") else {
        panic!("expected leaf");
    };
    assert_eq!(scalar, Scalar::Float(2.5));
}

#[test]
fn parse_as_yaml_builds_subtree() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "a: 1\nb: [x]\n".into(),
        path: Some(ValOrRef::val("Out")),
        parse_as: Some(ParseTextAs::Yaml),
        ..TemplateOp::default()
    };
    op.run(&ctx).unwrap();
    assert_eq!(lookup(&ctx, "Out.a"), Some(Node::leaf(1i64)));
    assert_eq!(lookup(&ctx, "Out.b[0]"), Some(Node::leaf("x")));
}

#[test]
fn parse_failure_is_typed() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "not a number".into(),
        path: Some(ValOrRef::val("Out")),
        parse_as: Some(ParseTextAs::Int64),
        ..TemplateOp::default()
    };
    assert!(matches!(op.run(&ctx), Err(PipelineError::ParseValue(_))));
}

#[test]
fn trim_strips_whitespace() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "  padded  ".into(),
        path: Some(ValOrRef::val("Out")),
        trim: Some(true),
        ..TemplateOp::default()
    };
    op.run(&ctx).unwrap();
    assert_eq!(lookup(&ctx, "Out"), Some(Node::leaf("padded")));
}

#[test]
fn render_error_propagates() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "{{ missing.attr }}".into(),
        path: Some(ValOrRef::val("Out")),
        ..TemplateOp::default()
    };
    assert!(matches!(op.run(&ctx), Err(PipelineError::Render { .. })));
}

#[test]
fn clone_with_keeps_parse_as() {
    let ctx = Context::default();
    let op = TemplateOp {
        template: "{{ max(1, 2) }}".into(),
        path: Some(ValOrRef::val("Out")),
        parse_as: Some(ParseTextAs::Int64),
        ..TemplateOp::default()
    };
    let cloned = op.clone_with(&ctx);
    assert_eq!(cloned.parse_as, Some(ParseTextAs::Int64));
    assert_eq!(cloned.template, op.template);
}
