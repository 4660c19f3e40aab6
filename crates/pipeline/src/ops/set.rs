// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Set: store a plain nested mapping into the data tree

use crate::ops::{parse_path, render_opt, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tl_dom::Node;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetStrategy {
    #[default]
    Merge,
    Replace,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetOp {
    pub data: Option<serde_json::Map<String, Value>>,
    pub path: Option<String>,
    pub render: Option<bool>,
    pub strategy: Option<SetStrategy>,
}

impl Operation for SetOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let Some(data) = &self.data else {
            return Err(PipelineError::NoDataToSet);
        };
        let payload = if self.render.unwrap_or(false) {
            ctx.engine().render_map_lenient(data, &ctx.snapshot())
        } else {
            data.clone()
        };
        let incoming = Node::from_plain(&Value::Object(payload));
        let path = self.path.as_deref().map(str::trim).filter(|p| !p.is_empty());
        match (self.strategy.unwrap_or_default(), path) {
            (SetStrategy::Merge, Some(path)) => {
                let path = parse_path(path)?;
                let mut tree = ctx.data_mut();
                if tree.lookup(&path).is_some_and(Node::is_container) {
                    if let Some(dest) = tree.lookup_mut(&path) {
                        dest.merge(incoming);
                    }
                } else {
                    tree.set(&path, incoming);
                }
            }
            (SetStrategy::Merge, None) => {
                // at the root, keys are taken literally
                let mut tree = ctx.data_mut();
                tree.merge(incoming);
            }
            (SetStrategy::Replace, Some(path)) => {
                let path = parse_path(path)?;
                ctx.data_mut().set(&path, incoming);
            }
            (SetStrategy::Replace, None) => {
                // without a destination, each top-level key is a path
                let Some(entries) = incoming.as_container() else {
                    return Err(PipelineError::NotContainer);
                };
                let mut tree = ctx.data_mut();
                for (key, value) in entries {
                    tree.set(&parse_path(key)?, value.clone());
                }
            }
        }
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        SetOp {
            data: self.data.clone(),
            path: render_opt(ctx, &self.path),
            render: self.render,
            strategy: self.strategy,
        }
    }
}

impl fmt::Display for SetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set[Path={}]", self.path.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "set_tests.rs"]
mod tests;
