// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Export: write a subtree of the data tree to a file

use crate::model::ValOrRef;
use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::{Format, Node};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOp {
    pub file: ValOrRef,
    pub format: Format,
    pub path: Option<ValOrRef>,
}

impl Operation for ExportOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let source = match &self.path {
            Some(path) => {
                let resolved = path.resolve(ctx);
                ctx.data().lookup(&parse_path(&resolved)?).cloned()
            }
            None => Some(ctx.data().clone()),
        };
        let source = source.unwrap_or_else(|| match self.format {
            Format::Text => Node::leaf(""),
            _ => Node::container(),
        });
        if self.format == Format::Text && !source.is_leaf() {
            return Err(PipelineError::dom(
                "export",
                tl_dom::DomError::UnsupportedNode {
                    format: "text",
                    detail: format!("{source:?}"),
                },
            ));
        }

        let file = self.file.resolve(ctx);
        ctx.log(&[format!("opening file {file}")]);
        let writer = std::fs::File::create(&file)
            .map_err(|e| PipelineError::io(format!("create '{file}'"), e))?;
        tl_dom::encode(&source, writer, self.format)
            .map_err(|e| PipelineError::dom(format!("encode '{file}'"), e))
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        ExportOp {
            file: self.file.clone_with(ctx),
            format: self.format,
            path: self.path.as_ref().map(|p| p.clone_with(ctx)),
        }
    }
}

impl fmt::Display for ExportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Export[file={},format={}", self.file, self.format)?;
        if let Some(path) = &self.path {
            write!(f, ",path={path}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
