// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type for the template engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("render: {0}")]
    Render(#[from] minijinja::Error),
    #[error("not a boolean literal: '{0}'")]
    NotABool(String),
}
