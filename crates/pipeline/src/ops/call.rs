// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Call: invoke a callable registered by define
//!
//! Arguments render against the snapshot and are installed under the
//! (templated) args path for the callable's run; the subtree is removed
//! again on every exit path.

use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tl_dom::Node;

const DEFAULT_ARGS_PATH: &str = "args";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOp {
    pub name: String,
    pub args: Option<serde_json::Map<String, Value>>,
    pub args_path: Option<String>,
}

impl Operation for CallOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let Some(callable) = ctx.get_action(&self.name) else {
            return Err(PipelineError::NotRegistered(self.name.clone()));
        };
        let snapshot = ctx.snapshot();
        let args_path = self
            .args_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_ARGS_PATH);
        let args_path = parse_path(&ctx.render_lenient(args_path))?;
        let args = self.args.clone().unwrap_or_default();
        let rendered = ctx.engine().render_map_lenient(&args, &snapshot);
        ctx.data_mut()
            .set(&args_path, Node::from_plain(&Value::Object(rendered)));

        let result = ctx.executor().execute(&callable);
        ctx.data_mut().remove(&args_path);
        result
    }

    fn clone_with(&self, _ctx: &Context) -> Self {
        self.clone()
    }
}

impl fmt::Display for CallOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Call[Name={}, Args={}]",
            self.name,
            self.args.as_ref().map(serde_json::Map::len).unwrap_or(0)
        )
    }
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
