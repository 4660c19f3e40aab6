// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ext: run an action materialized by a registered factory

use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtOp {
    pub function: String,
    pub args: Option<serde_json::Map<String, Value>>,
}

impl Operation for ExtOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let Some(factory) = ctx.get_action_factory(&self.function) else {
            return Err(PipelineError::NoSuchFunction(self.function.clone()));
        };
        let args = self.args.clone().unwrap_or_default();
        let action = factory.for_args(ctx, &args);
        ctx.executor().execute(&action)
    }

    fn clone_with(&self, _ctx: &Context) -> Self {
        self.clone()
    }
}

impl fmt::Display for ExtOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ext[func={},args={}]",
            self.function,
            self.args.as_ref().map(serde_json::Map::len).unwrap_or(0)
        )
    }
}

#[cfg(test)]
#[path = "ext_tests.rs"]
mod tests;
