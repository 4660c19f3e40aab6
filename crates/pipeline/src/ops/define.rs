// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Define: register a named callable action

use crate::model::ActionSpec;
use crate::ops::Operation;
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineOp {
    pub name: String,
    pub action: Box<ActionSpec>,
}

impl Operation for DefineOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        ctx.define_action(&self.name, (*self.action).clone())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        DefineOp {
            name: self.name.clone(),
            action: Box::new(self.action.clone_with(ctx)),
        }
    }
}

impl fmt::Display for DefineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Define[Name={}, Action={}]", self.name, self.action)
    }
}
