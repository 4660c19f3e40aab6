// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Patch: apply a single RFC-6902 operation to the data tree
//!
//! Delegates to the external `json-patch` engine: the tree is materialized
//! as a plain value, patched, and decoded back.

use crate::ops::{parse_path, render_opt, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tl_dom::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchKind::Add => "add",
            PatchKind::Remove => "remove",
            PatchKind::Replace => "replace",
            PatchKind::Move => "move",
            PatchKind::Copy => "copy",
            PatchKind::Test => "test",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOp {
    pub op: PatchKind,
    pub path: String,
    pub value: Option<Value>,
    pub value_from: Option<String>,
    pub from: Option<String>,
}

impl Operation for PatchOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let path = ctx.render_lenient(&self.path);
        let value = match (&self.value, &self.value_from) {
            (Some(value), _) => Some(value.clone()),
            (None, Some(value_from)) => {
                let from_path = parse_path(&ctx.render_lenient(value_from))?;
                Some(
                    ctx.data()
                        .lookup(&from_path)
                        .map(Node::to_plain)
                        .unwrap_or(Value::Null),
                )
            }
            (None, None) => None,
        };

        ctx.log(&[format!("Patch[Op={},Path={path}]", self.op)]);
        let mut op = json!({"op": self.op, "path": path});
        if let Some(value) = value {
            op["value"] = value;
        }
        if let Some(from) = self.from.as_deref().filter(|f| !f.trim().is_empty()) {
            op["from"] = Value::String(from.to_string());
        }
        let patch: json_patch::Patch = serde_json::from_value(Value::Array(vec![op]))
            .map_err(|e| PipelineError::Patch(e.to_string()))?;

        let mut doc = ctx.data().to_plain();
        json_patch::patch(&mut doc, &patch).map_err(|e| PipelineError::Patch(e.to_string()))?;
        *ctx.data_mut() = Node::from_plain(&doc);
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        PatchOp {
            op: self.op,
            path: ctx.render_lenient(&self.path),
            value: self.value.clone(),
            value_from: render_opt(ctx, &self.value_from),
            from: render_opt(ctx, &self.from),
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Patch[Op={},Path={}]", self.op, self.path)
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
