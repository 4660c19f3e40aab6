// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TemplateFile: render a template file against the data tree

use crate::ops::{parse_path, render_opt, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::Node;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFileOp {
    pub file: String,
    pub output: String,
    /// Optional container path scoping the template data; defaults to the
    /// whole tree.
    pub path: Option<String>,
}

impl Operation for TemplateFileOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        if self.file.is_empty() {
            return Err(PipelineError::FileEmpty);
        }
        if self.output.is_empty() {
            return Err(PipelineError::OutputEmpty);
        }
        let (data, scope) = match &self.path {
            Some(path) => {
                let resolved = ctx.render_lenient(path);
                let node = ctx.data().lookup(&parse_path(&resolved)?).cloned();
                match node {
                    Some(node) if node.is_container() => (node.to_plain(), resolved),
                    _ => return Err(PipelineError::NotContainer),
                }
            }
            None => ((*ctx.snapshot()).clone(), "root".to_string()),
        };

        let in_file = ctx.render_lenient(&self.file);
        ctx.log(&[format!(
            "reading template file '{in_file}' with data from {scope}"
        )]);
        let template = std::fs::read_to_string(&in_file)
            .map_err(|e| PipelineError::io(format!("read '{in_file}'"), e))?;
        let rendered = ctx
            .engine()
            .render(&template, &data)
            .map_err(|e| PipelineError::render(format!("render '{in_file}'"), e))?;

        let out_file = ctx.render_lenient(&self.output);
        ctx.log(&[format!("writing rendered template to '{out_file}'")]);
        std::fs::write(&out_file, rendered)
            .map_err(|e| PipelineError::io(format!("write '{out_file}'"), e))
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        TemplateFileOp {
            file: ctx.render_lenient(&self.file),
            output: ctx.render_lenient(&self.output),
            path: render_opt(ctx, &self.path),
        }
    }
}

impl fmt::Display for TemplateFileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TemplateFile[File={},Output={}]", self.file, self.output)
    }
}

#[cfg(test)]
#[path = "template_file_tests.rs"]
mod tests;
