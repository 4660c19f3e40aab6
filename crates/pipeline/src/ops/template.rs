// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template: render a template and store the result in the data tree

use crate::model::ValOrRef;
use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::{Format, Node};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseTextAs {
    #[default]
    None,
    Yaml,
    Float64,
    Int64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOp {
    pub template: String,
    pub path: Option<ValOrRef>,
    pub trim: Option<bool>,
    pub parse_as: Option<ParseTextAs>,
}

impl Operation for TemplateOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        if self.template.is_empty() {
            return Err(PipelineError::TemplateEmpty);
        }
        let Some(path) = &self.path else {
            return Err(PipelineError::PathEmpty);
        };
        let path = path.resolve(ctx);
        if path.is_empty() {
            return Err(PipelineError::PathEmpty);
        }
        let snapshot = ctx.snapshot();
        let mut rendered = ctx
            .engine()
            .render(&self.template, &snapshot)
            .map_err(|e| PipelineError::render("template", e))?;
        if self.trim.unwrap_or(false) {
            rendered = rendered.trim().to_string();
        }
        let node = match self.parse_as.unwrap_or_default() {
            ParseTextAs::None => Node::leaf(rendered),
            ParseTextAs::Yaml => tl_dom::decode_str(&rendered, Format::Yaml)
                .map_err(|e| PipelineError::dom("parse rendered yaml", e))?,
            ParseTextAs::Float64 => Node::leaf(
                rendered
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| PipelineError::ParseValue(format!("'{rendered}': {e}")))?,
            ),
            ParseTextAs::Int64 => Node::leaf(
                rendered
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| PipelineError::ParseValue(format!("'{rendered}': {e}")))?,
            ),
        };
        let path = parse_path(&path)?;
        ctx.data_mut().set(&path, node);
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        TemplateOp {
            template: self.template.clone(),
            path: self.path.as_ref().map(|p| p.clone_with(ctx)),
            trim: self.trim,
            // parse_as survives the clone; the typed parse is part of the
            // operation, not of the template text
            parse_as: self.parse_as,
        }
    }
}

impl fmt::Display for TemplateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "Template[Path={path}]"),
            None => write!(f, "Template[]"),
        }
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
