// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exec: run an external process

use crate::ops::{parse_path, render_opt, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::{Command, Stdio};
use tl_dom::Node;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecOp {
    pub program: String,
    pub args: Option<Vec<String>>,
    pub dir: Option<String>,
    /// Redirect target files, opened create-truncate.
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    /// Non-zero exit codes to tolerate.
    pub valid_exit_codes: Option<Vec<i32>>,
    pub save_exit_code_to: Option<String>,
}

fn redirect(target: &Option<String>, ctx: &Context) -> Result<Option<Stdio>, PipelineError> {
    match target {
        Some(target) => {
            let file = ctx.render_lenient(target);
            let out = std::fs::File::create(&file)
                .map_err(|e| PipelineError::io(format!("create '{file}'"), e))?;
            Ok(Some(Stdio::from(out)))
        }
        None => Ok(None),
    }
}

impl Operation for ExecOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let snapshot = ctx.snapshot();
        let program = ctx.render_lenient(&self.program);
        let args = self
            .args
            .as_deref()
            .map(|args| ctx.engine().render_slice_lenient(args, &snapshot))
            .unwrap_or_default();

        let mut cmd = Command::new(&program);
        cmd.args(&args);
        if let Some(dir) = render_opt(ctx, &self.dir).filter(|d| !d.is_empty()) {
            cmd.current_dir(dir);
        }
        if let Some(stdout) = redirect(&self.stdout, ctx)? {
            cmd.stdout(stdout);
        }
        if let Some(stderr) = redirect(&self.stderr, ctx)? {
            cmd.stderr(stderr);
        }

        ctx.log(&[format!(
            "prog={program},dir={},args=[{}]",
            self.dir.as_deref().unwrap_or_default(),
            args.join(" ")
        )]);
        let status = cmd
            .status()
            .map_err(|e| PipelineError::io(format!("spawn '{program}'"), e))?;
        // a signal death carries no code
        let code = status.code().unwrap_or(-1);
        if let Some(save_to) = &self.save_exit_code_to {
            let path = parse_path(&ctx.render_lenient(save_to))?;
            ctx.data_mut().set(&path, Node::leaf(i64::from(code)));
        }
        if status.success() || self.valid_exit_codes.as_deref().unwrap_or(&[]).contains(&code) {
            Ok(())
        } else {
            Err(PipelineError::Exec { program, code })
        }
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        let snapshot = ctx.snapshot();
        ExecOp {
            program: ctx.render_lenient(&self.program),
            args: self
                .args
                .as_deref()
                .map(|args| ctx.engine().render_slice_lenient(args, &snapshot)),
            dir: render_opt(ctx, &self.dir),
            stdout: render_opt(ctx, &self.stdout),
            stderr: render_opt(ctx, &self.stderr),
            valid_exit_codes: self.valid_exit_codes.clone(),
            save_exit_code_to: render_opt(ctx, &self.save_exit_code_to),
        }
    }
}

impl fmt::Display for ExecOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exec[Program={},Dir={},Args={}]",
            self.program,
            self.dir.as_deref().unwrap_or_default(),
            self.args.as_deref().map(<[String]>::len).unwrap_or(0)
        )
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
