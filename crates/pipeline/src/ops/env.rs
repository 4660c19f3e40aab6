// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Env: snapshot process environment variables into the data tree

use crate::ops::{parse_path, render_opt, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::{Node, Path};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvOp {
    pub path: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,
}

fn compile(pattern: &Option<String>) -> Result<Option<regex::Regex>, PipelineError> {
    match pattern {
        Some(pattern) => regex::Regex::new(pattern)
            .map(Some)
            .map_err(|e| PipelineError::ParseValue(format!("regex '{pattern}': {e}"))),
        None => Ok(None),
    }
}

impl Operation for EnvOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let include = compile(&self.include)?;
        let exclude = compile(&self.exclude)?;
        let prefix = match self.path.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => parse_path(path)?.child("Env"),
            None => Path::parse("Env").map_err(|e| PipelineError::dom("env path", e))?,
        };
        let mut tree = ctx.data_mut();
        for (name, value) in std::env::vars() {
            let included = include.as_ref().is_none_or(|re| re.is_match(&name));
            let excluded = exclude.as_ref().is_some_and(|re| re.is_match(&name));
            if included && !excluded {
                tree.set(&prefix.child(name.as_str()), Node::leaf(value));
            }
        }
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        EnvOp {
            path: render_opt(ctx, &self.path),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
        }
    }
}

impl fmt::Display for EnvOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Env[Path={},incl={},excl={}]",
            self.path.as_deref().unwrap_or_default(),
            self.include.as_deref().unwrap_or_default(),
            self.exclude.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
