// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ForEach: run an action once per item of a source
//!
//! Exactly one source must be set: `item` (literal list), `query` (a
//! data-tree path: a leaf yields its value, a container its keys, a list
//! its items by value) or `glob` (file pattern). Each iteration binds the
//! current value under the iteration variable (default `forEach`), executes
//! the action, then removes the binding.

use crate::model::{ActionSpec, ValOrRef};
use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::Node;

const DEFAULT_VARIABLE: &str = "forEach";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForEachOp {
    pub item: Option<Vec<ValOrRef>>,
    pub query: Option<ValOrRef>,
    pub glob: Option<ValOrRef>,
    pub variable: Option<String>,
    pub action: Box<ActionSpec>,
}

impl ForEachOp {
    fn values(&self, ctx: &Context) -> Result<Vec<Node>, PipelineError> {
        match (&self.item, &self.query, &self.glob) {
            (Some(items), None, None) => Ok(items
                .iter()
                .map(|item| Node::leaf(item.resolve(ctx)))
                .collect()),
            (None, Some(query), None) => {
                let path = parse_path(&query.resolve(ctx))?;
                let tree = ctx.data();
                Ok(match tree.lookup(&path) {
                    None => Vec::new(),
                    Some(Node::Leaf(scalar)) => vec![Node::Leaf(scalar.clone())],
                    Some(Node::Container(map)) => {
                        map.keys().map(|k| Node::leaf(k.as_str())).collect()
                    }
                    Some(Node::List(items)) => items.clone(),
                })
            }
            (None, None, Some(glob)) => {
                let pattern = glob.resolve(ctx);
                let paths = glob::glob(&pattern)
                    .map_err(|e| PipelineError::ParseValue(format!("glob '{pattern}': {e}")))?;
                Ok(paths
                    .filter_map(Result::ok)
                    .map(|p| Node::leaf(p.to_string_lossy().into_owned()))
                    .collect())
            }
            _ => Err(PipelineError::ForEachSource),
        }
    }
}

impl Operation for ForEachOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let variable = self
            .variable
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_VARIABLE);
        let binding = parse_path(variable)?;
        for value in self.values(ctx)? {
            ctx.data_mut().set(&binding, value);
            let result = ctx.executor().execute(&self.action);
            ctx.data_mut().remove(&binding);
            result?;
        }
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        ForEachOp {
            item: self
                .item
                .as_ref()
                .map(|items| items.iter().map(|i| i.clone_with(ctx)).collect()),
            query: self.query.as_ref().map(|q| q.clone_with(ctx)),
            glob: self.glob.as_ref().map(|g| g.clone_with(ctx)),
            variable: self.variable.clone(),
            action: Box::new(self.action.clone_with(ctx)),
        }
    }
}

impl fmt::Display for ForEachOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForEach[")?;
        if let Some(items) = &self.item {
            write!(f, "items={}", items.len())?;
        }
        if let Some(query) = &self.query {
            write!(f, "query={query}")?;
        }
        if let Some(glob) = &self.glob {
            write!(f, "glob={glob}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "for_each_tests.rs"]
mod tests;
