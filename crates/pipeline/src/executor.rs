// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action executor
//!
//! `execute` runs one action: evaluate the `when` gate, announce the
//! listener, freeze the operation bundle against the current snapshot, run
//! the operations in catalog order, then recurse over child actions in
//! ascending `order` (ties keep document order). The first failure
//! short-circuits and bubbles up through `on_after`.

use crate::listener::LOG_TAG_PREFIX;
use crate::model::ActionSpec;
use crate::{Context, PipelineError};

/// Re-entrant dispatcher over a [`Context`]; obtained via
/// [`Context::executor`]. Operations use it for nested action dispatch.
pub struct Executor<'c> {
    ctx: &'c Context,
}

impl<'c> Executor<'c> {
    pub(crate) fn new(ctx: &'c Context) -> Self {
        Executor { ctx }
    }

    pub fn context(&self) -> &Context {
        self.ctx
    }

    /// Execute one action and its children.
    pub fn execute(&self, action: &ActionSpec) -> Result<(), PipelineError> {
        if let Some(when) = normalized_when(action) {
            let snapshot = self.ctx.snapshot();
            let pass = self
                .ctx
                .engine()
                .eval_bool(when, &snapshot)
                .map_err(|e| PipelineError::render(format!("when gate of {}", action.meta), e))?;
            if !pass {
                self.ctx.log(&[
                    format!("{LOG_TAG_PREFIX}skip"),
                    format!("skipping {action}"),
                ]);
                return Ok(());
            }
        }
        self.ctx.listener().on_before(action);
        let result = self.run_body(action);
        self.ctx.listener().on_after(action, result.as_ref().err());
        result
    }

    fn run_body(&self, action: &ActionSpec) -> Result<(), PipelineError> {
        // Resolve-once: templated fields freeze against the snapshot as it
        // stands on entry, before the first operation mutates the tree.
        let ops = action.ops.clone_with(self.ctx);
        tracing::debug!(target: "tl_pipeline", action = %action.meta, "executing {ops}");
        ops.run(self.ctx)?;

        let mut children: Vec<(&String, &ActionSpec)> =
            action.children.iter().flatten().collect();
        children.sort_by_key(|(_, child)| child.meta.order.unwrap_or(0));
        for (_, child) in children {
            self.execute(child)?;
        }
        Ok(())
    }
}

fn normalized_when(action: &ActionSpec) -> Option<&str> {
    action
        .meta
        .when
        .as_deref()
        .map(str::trim)
        .filter(|when| !when.is_empty())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
