// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the operation bundle: catalog order, clone, display

use super::*;
use crate::model::ValOrRef;
use crate::Listener;
use std::cell::RefCell;
use std::rc::Rc;
use tl_dom::{Node, Path};

#[derive(Default)]
struct RecordingListener {
    logs: Rc<RefCell<Vec<String>>>,
}

impl Listener for RecordingListener {
    fn on_log(&self, values: &[String]) {
        self.logs.borrow_mut().push(values.join(" "));
    }
}

fn lookup(ctx: &Context, path: &str) -> Option<Node> {
    ctx.data().lookup(&Path::parse(path).unwrap()).cloned()
}

#[test]
fn empty_spec_is_a_no_op() {
    let spec = OpSpec::default();
    assert!(spec.is_empty());
    spec.run(&Context::default()).unwrap();
}

#[test]
fn set_runs_before_abort_and_abort_short_circuits_log() {
    let logs = Rc::new(RefCell::new(Vec::new()));
    let ctx = Context::default().with_listener(Box::new(RecordingListener {
        logs: Rc::clone(&logs),
    }));
    let mut data = serde_json::Map::new();
    data.insert("k".to_string(), serde_json::json!("v"));
    let spec = OpSpec {
        // declared out of order on purpose; execution follows the catalog
        log: Some(LogOp {
            message: "never reached".into(),
        }),
        abort: Some(AbortOp {
            message: "stop".into(),
        }),
        set: Some(SetOp {
            data: Some(data),
            ..SetOp::default()
        }),
        ..OpSpec::default()
    };
    let err = spec.run(&ctx);
    assert!(matches!(err, Err(PipelineError::Aborted(_))));
    // set (earlier in the catalog) already applied
    assert_eq!(lookup(&ctx, "k"), Some(Node::leaf("v")));
    // log (later in the catalog) never ran
    assert!(logs.borrow().iter().all(|l| !l.contains("never reached")));
}

#[test]
fn clone_with_resolves_each_present_op() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({
        "Path": "root.sub2",
        "Path3": "/root/sub3",
        "Shell": "/bin/sh"
    })));
    let spec = OpSpec {
        set: Some(SetOp {
            data: Some(serde_json::Map::new()),
            path: Some("{{ Path }}".into()),
            ..SetOp::default()
        }),
        patch: Some(PatchOp {
            op: PatchKind::Add,
            path: "{{ Path3 }}".into(),
            value: Some(serde_json::json!(1)),
            value_from: None,
            from: None,
        }),
        import: Some(ImportOp {
            file: "f".into(),
            path: Some("{{ Path }}".into()),
            mode: Some(ParseFileMode::Yaml),
            ..ImportOp::default()
        }),
        export: Some(ExportOp {
            file: ValOrRef::val("/tmp/file.yaml"),
            format: tl_dom::Format::Yaml,
            path: Some(ValOrRef::val("{{ Path }}")),
        }),
        template: Some(TemplateOp {
            template: "x".into(),
            path: Some(ValOrRef::val("{{ Path }}")),
            ..TemplateOp::default()
        }),
        env: Some(EnvOp {
            path: Some("{{ Path }}".into()),
            ..EnvOp::default()
        }),
        exec: Some(ExecOp {
            program: "{{ Shell }}".into(),
            ..ExecOp::default()
        }),
        log: Some(LogOp {
            message: "Path: {{ Path }}".into(),
        }),
        ..OpSpec::default()
    };
    let cloned = spec.clone_with(&ctx);
    assert_eq!(cloned.set.unwrap().path.as_deref(), Some("root.sub2"));
    assert_eq!(cloned.patch.unwrap().path, "/root/sub3");
    assert_eq!(cloned.import.unwrap().path.as_deref(), Some("root.sub2"));
    assert_eq!(
        cloned.export.unwrap().path,
        Some(ValOrRef::val("root.sub2"))
    );
    assert_eq!(
        cloned.template.unwrap().path,
        Some(ValOrRef::val("root.sub2"))
    );
    assert_eq!(cloned.env.unwrap().path.as_deref(), Some("root.sub2"));
    assert_eq!(cloned.exec.unwrap().program, "/bin/sh");
    assert_eq!(cloned.log.unwrap().message, "Path: root.sub2");
}

#[test]
fn clone_freezes_templates_against_later_mutation() {
    let ctx = Context::new(Node::from_plain(&serde_json::json!({"Path": "first"})));
    let spec = OpSpec {
        log: Some(LogOp {
            message: "{{ Path }}".into(),
        }),
        ..OpSpec::default()
    };
    let cloned = spec.clone_with(&ctx);
    ctx.data_mut()
        .set(&Path::parse("Path").unwrap(), Node::leaf("second"));
    // the clone keeps the value resolved at clone time
    assert_eq!(cloned.log.as_ref().unwrap().message, "first");
    let recloned = cloned.clone_with(&ctx);
    assert_eq!(recloned.log.unwrap().message, "first");
}

#[test]
fn display_lists_present_ops() {
    let spec = OpSpec {
        log: Some(LogOp {
            message: "hello".into(),
        }),
        abort: Some(AbortOp {
            message: "m".into(),
        }),
        ..OpSpec::default()
    };
    let text = spec.to_string();
    // abort precedes log in the catalog order
    let abort_at = text.find("Abort").unwrap();
    let log_at = text.find("Log").unwrap();
    assert!(abort_at < log_at);
}

#[test]
fn yaml_document_round_trip() {
    let doc = r#"
set:
  data:
    root:
      sub1:
        leaf1: 123
  path: result
"#;
    let spec: OpSpec = serde_yaml::from_str(doc).unwrap();
    let set = spec.set.as_ref().unwrap();
    assert_eq!(set.path.as_deref(), Some("result"));
    assert_eq!(
        set.data.as_ref().unwrap()["root"]["sub1"]["leaf1"],
        serde_json::json!(123)
    );
}
