// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Import: read a file into the data tree

use crate::model::ValOrRef;
use crate::ops::{html2dom, parse_path, Operation};
use crate::{Context, PipelineError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::{Format, Node};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseFileMode {
    Binary,
    #[default]
    Text,
    Yaml,
    Json,
    Properties,
    Xml,
}

impl fmt::Display for ParseFileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseFileMode::Binary => "binary",
            ParseFileMode::Text => "text",
            ParseFileMode::Yaml => "yaml",
            ParseFileMode::Json => "json",
            ParseFileMode::Properties => "properties",
            ParseFileMode::Xml => "xml",
        };
        f.write_str(name)
    }
}

/// Options for the `xml` mode: a CSS selector picking the converted
/// subtree (defaults to the document root) and the conversion layout.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlImportOptions {
    pub query: Option<ValOrRef>,
    pub layout: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOp {
    pub file: String,
    pub path: Option<String>,
    pub mode: Option<ParseFileMode>,
    pub xml: Option<XmlImportOptions>,
}

impl ImportOp {
    fn parse_file(&self, ctx: &Context, file: &str) -> Result<Node, PipelineError> {
        let mode = self.mode.unwrap_or_default();
        let read = || {
            std::fs::read(file).map_err(|e| PipelineError::io(format!("read '{file}'"), e))
        };
        let read_text =
            || Ok::<String, PipelineError>(String::from_utf8_lossy(&read()?).into_owned());
        match mode {
            ParseFileMode::Binary => Ok(Node::leaf(BASE64.encode(read()?))),
            ParseFileMode::Text => Ok(Node::leaf(read_text()?)),
            ParseFileMode::Yaml => decode(file, &read()?, Format::Yaml),
            ParseFileMode::Json => decode(file, &read()?, Format::Json),
            ParseFileMode::Properties => decode(file, &read()?, Format::Properties),
            ParseFileMode::Xml => {
                let options = self.xml.as_ref();
                html2dom::check_layout(options.and_then(|o| o.layout.as_deref()))?;
                let query = html2dom::resolve_query(ctx, options.and_then(|o| o.query.as_ref()));
                html2dom::html_to_node(&read_text()?, &query)
            }
        }
    }
}

fn decode(file: &str, content: &[u8], format: Format) -> Result<Node, PipelineError> {
    tl_dom::decode(content, format).map_err(|e| PipelineError::dom(format!("decode '{file}'"), e))
}

impl Operation for ImportOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let file = ctx.render_lenient(&self.file);
        if file.trim().is_empty() {
            return Err(PipelineError::FileEmpty);
        }
        let mode = self.mode.unwrap_or_default();
        ctx.log(&[format!("Importing file {file} using mode {mode}")]);
        let value = self.parse_file(ctx, &file)?;
        let path = self
            .path
            .as_ref()
            .map(|p| ctx.render_lenient(p))
            .filter(|p| !p.is_empty());
        match path {
            Some(path) => {
                let path = parse_path(&path)?;
                ctx.data_mut().set(&path, value);
            }
            None => {
                let Node::Container(entries) = value else {
                    return Err(PipelineError::NotContainer);
                };
                let mut tree = ctx.data_mut();
                for (key, child) in entries {
                    tree.set(&parse_path(&key)?, child);
                }
            }
        }
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        ImportOp {
            file: ctx.render_lenient(&self.file),
            path: self.path.as_ref().map(|p| ctx.render_lenient(p)),
            mode: self.mode,
            xml: self.xml.clone(),
        }
    }
}

impl fmt::Display for ImportOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Import[file={},path={},mode={}]",
            self.file,
            self.path.as_deref().unwrap_or_default(),
            self.mode.unwrap_or_default()
        )
    }
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
