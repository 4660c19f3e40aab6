// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the pipeline engine

use thiserror::Error;
use tl_dom::DomError;
use tl_template::TemplateError;

/// Errors surfaced by operations and the executor.
///
/// Operation misconfiguration gets a dedicated variant; delegated failures
/// (rendering, path parsing, I/O, patching) carry a short context string
/// identifying the call site.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no data to set")]
    NoDataToSet,
    #[error("template is empty")]
    TemplateEmpty,
    #[error("path is empty")]
    PathEmpty,
    #[error("file is empty")]
    FileEmpty,
    #[error("output is empty")]
    OutputEmpty,
    #[error("source node is not a container")]
    NotContainer,
    #[error("'{0}' is empty")]
    FieldEmpty(&'static str),
    #[error("no leaf node at '{0}'")]
    NotLeaf(String),
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("aborted: {0}")]
    Aborted(String),
    #[error("callable '{0}' is not registered")]
    NotRegistered(String),
    #[error("callable '{0}' is already defined")]
    AlreadyDefined(String),
    #[error("no such function: {0}")]
    NoSuchFunction(String),
    #[error("exactly one of 'item', 'query' or 'glob' must be set")]
    ForEachSource,
    #[error("neither a matching case nor a default action is defined")]
    NoMatchingCase,
    #[error("no node matches query '{0}'")]
    QueryMiss(String),
    #[error("{context}: {source}")]
    Render {
        context: String,
        #[source]
        source: TemplateError,
    },
    #[error("{context}: {source}")]
    Dom {
        context: String,
        #[source]
        source: DomError,
    },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse value: {0}")]
    ParseValue(String),
    #[error("patch: {0}")]
    Patch(String),
    #[error("process '{program}' exited with code {code}")]
    Exec { program: String, code: i32 },
}

impl PipelineError {
    pub(crate) fn render(context: impl Into<String>, source: TemplateError) -> Self {
        PipelineError::Render {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn dom(context: impl Into<String>, source: DomError) -> Self {
        PipelineError::Dom {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PipelineError::Io {
            context: context.into(),
            source,
        }
    }
}
