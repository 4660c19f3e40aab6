// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loop: repeat an action while a boolean template holds
//!
//! `postAction` runs before `action` each iteration, so counter updates it
//! makes are observable by `action`. The engine imposes no iteration cap;
//! termination is the test template's (or an abort's) business.

use crate::model::ActionSpec;
use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopOp {
    pub init: Option<Box<ActionSpec>>,
    pub test: String,
    pub action: Box<ActionSpec>,
    pub post_action: Option<Box<ActionSpec>>,
}

impl Operation for LoopOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        if let Some(init) = &self.init {
            ctx.executor().execute(init)?;
        }
        loop {
            ctx.invalidate_snapshot();
            let snapshot = ctx.snapshot();
            let next = ctx
                .engine()
                .eval_bool(&self.test, &snapshot)
                .map_err(|e| PipelineError::render("loop test", e))?;
            if !next {
                return Ok(());
            }
            if let Some(post) = &self.post_action {
                ctx.executor().execute(post)?;
            }
            ctx.executor().execute(&self.action)?;
        }
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        LoopOp {
            init: self.init.as_ref().map(|a| Box::new(a.clone_with(ctx))),
            test: self.test.clone(),
            action: Box::new(self.action.clone_with(ctx)),
            post_action: self
                .post_action
                .as_ref()
                .map(|a| Box::new(a.clone_with(ctx))),
        }
    }
}

impl fmt::Display for LoopOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loop[test={}]", self.test)
    }
}

#[cfg(test)]
#[path = "loop_tests.rs"]
mod tests;
