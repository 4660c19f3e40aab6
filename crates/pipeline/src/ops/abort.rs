// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Abort: fail intentionally with a templated message

use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortOp {
    pub message: String,
}

impl Operation for AbortOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        Err(PipelineError::Aborted(ctx.render_lenient(&self.message)))
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        AbortOp {
            message: ctx.render_lenient(&self.message),
        }
    }
}

impl fmt::Display for AbortOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Abort[message={}]", self.message)
    }
}
