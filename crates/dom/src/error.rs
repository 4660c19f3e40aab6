// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the data model

use thiserror::Error;

/// Errors surfaced by path parsing, tree addressing and the codecs.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("invalid path '{path}': {reason}")]
    ParsePath { path: String, reason: String },
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("unsupported node for '{format}' output: {detail}")]
    UnsupportedNode { format: &'static str, detail: String },
    #[error("invalid properties line {line}: {text}")]
    InvalidProperties { line: usize, text: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl DomError {
    pub(crate) fn parse_path(path: &str, reason: impl Into<String>) -> Self {
        DomError::ParsePath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
