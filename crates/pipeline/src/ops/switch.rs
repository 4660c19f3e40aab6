// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Switch: dispatch to the first case whose rendered key equals the
//! resolved expression

use crate::model::{ActionSpec, ChildActions, ValOrRef};
use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOp {
    pub expr: ValOrRef,
    pub cases: Option<ChildActions>,
    pub default: Option<Box<ActionSpec>>,
}

impl Operation for SwitchOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let expr = self.expr.resolve(ctx);
        if let Some(cases) = &self.cases {
            for (key, action) in cases {
                if ctx.render_lenient(key) == expr {
                    return ctx.executor().execute(action);
                }
            }
        }
        match &self.default {
            Some(default) => ctx.executor().execute(default),
            None => Err(PipelineError::NoMatchingCase),
        }
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        SwitchOp {
            expr: self.expr.clone_with(ctx),
            cases: self.cases.as_ref().map(|cases| {
                cases
                    .iter()
                    .map(|(key, action)| (key.clone(), action.clone_with(ctx)))
                    .collect()
            }),
            default: self.default.as_ref().map(|d| Box::new(d.clone_with(ctx))),
        }
    }
}

impl fmt::Display for SwitchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Switch[val={},cases={}]",
            self.expr,
            self.cases.as_ref().map(ChildActions::len).unwrap_or(0)
        )
    }
}

#[cfg(test)]
#[path = "switch_tests.rs"]
mod tests;
