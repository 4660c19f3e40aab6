// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log: emit a templated message to the listener

use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogOp {
    pub message: String,
}

impl Operation for LogOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        ctx.log(&[ctx.render_lenient(&self.message)]);
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        LogOp {
            message: ctx.render_lenient(&self.message),
        }
    }
}

impl fmt::Display for LogOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut preview = self.message.as_str();
        if preview.len() > 25 {
            let mut cut = 25;
            while !preview.is_char_boundary(cut) {
                cut -= 1;
            }
            preview = &preview[..cut];
        }
        write!(f, "Log[message({})={}]", self.message.len(), preview)
    }
}
