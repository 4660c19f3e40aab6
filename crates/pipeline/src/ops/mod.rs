// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The operation catalog
//!
//! Every operation implements [`Operation`]: `run` applies it against the
//! context, `clone_with` returns a self-copy with templated fields resolved
//! against the current snapshot (resolve-once-per-execute), and `Display`
//! traces it. Within one [`OpSpec`] the operations run in the fixed catalog
//! order below; the field order of the struct is that contract.

pub mod abort;
pub mod call;
pub mod define;
pub mod env;
pub mod exec;
pub mod export;
pub mod ext;
pub mod for_each;
pub mod html2dom;
pub mod import;
pub mod log;
pub mod loop_op;
pub mod os;
pub mod patch;
pub mod set;
pub mod switch;
pub mod template;
pub mod template_file;

use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use abort::AbortOp;
pub use call::CallOp;
pub use define::DefineOp;
pub use env::EnvOp;
pub use exec::ExecOp;
pub use export::ExportOp;
pub use ext::ExtOp;
pub use for_each::ForEachOp;
pub use html2dom::Html2DomOp;
pub use import::{ImportOp, ParseFileMode, XmlImportOptions};
pub use log::LogOp;
pub use loop_op::LoopOp;
pub use os::OsOp;
pub use patch::{PatchKind, PatchOp};
pub use set::{SetOp, SetStrategy};
pub use switch::SwitchOp;
pub use template::{ParseTextAs, TemplateOp};
pub use template_file::TemplateFileOp;

pub(crate) trait Operation: fmt::Display {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError>;
    fn clone_with(&self, ctx: &Context) -> Self
    where
        Self: Sized;
}

/// The operation bundle carried by a single action.
///
/// Field order is the published execution order; an empty bundle is a
/// legal no-op.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpSpec {
    pub set: Option<SetOp>,
    pub patch: Option<PatchOp>,
    pub import: Option<ImportOp>,
    pub export: Option<ExportOp>,
    pub template: Option<TemplateOp>,
    pub template_file: Option<TemplateFileOp>,
    pub env: Option<EnvOp>,
    pub exec: Option<ExecOp>,
    pub os: Option<OsOp>,
    pub html2dom: Option<Html2DomOp>,
    pub abort: Option<AbortOp>,
    pub log: Option<LogOp>,
    #[serde(rename = "loop")]
    pub loop_op: Option<LoopOp>,
    pub for_each: Option<ForEachOp>,
    pub switch: Option<SwitchOp>,
    pub call: Option<CallOp>,
    pub define: Option<DefineOp>,
    pub ext: Option<ExtOp>,
}

impl OpSpec {
    pub fn is_empty(&self) -> bool {
        let mut count = 0;
        self.for_each_present(|_| count += 1);
        count == 0
    }

    /// Run the present operations in catalog order; the first failure
    /// short-circuits.
    pub(crate) fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        run_op(&self.set, ctx)?;
        run_op(&self.patch, ctx)?;
        run_op(&self.import, ctx)?;
        run_op(&self.export, ctx)?;
        run_op(&self.template, ctx)?;
        run_op(&self.template_file, ctx)?;
        run_op(&self.env, ctx)?;
        run_op(&self.exec, ctx)?;
        run_op(&self.os, ctx)?;
        run_op(&self.html2dom, ctx)?;
        run_op(&self.abort, ctx)?;
        run_op(&self.log, ctx)?;
        run_op(&self.loop_op, ctx)?;
        run_op(&self.for_each, ctx)?;
        run_op(&self.switch, ctx)?;
        run_op(&self.call, ctx)?;
        run_op(&self.define, ctx)?;
        run_op(&self.ext, ctx)?;
        Ok(())
    }

    /// Self-copy with each present operation's templated fields resolved.
    pub fn clone_with(&self, ctx: &Context) -> OpSpec {
        OpSpec {
            set: clone_op(&self.set, ctx),
            patch: clone_op(&self.patch, ctx),
            import: clone_op(&self.import, ctx),
            export: clone_op(&self.export, ctx),
            template: clone_op(&self.template, ctx),
            template_file: clone_op(&self.template_file, ctx),
            env: clone_op(&self.env, ctx),
            exec: clone_op(&self.exec, ctx),
            os: clone_op(&self.os, ctx),
            html2dom: clone_op(&self.html2dom, ctx),
            abort: clone_op(&self.abort, ctx),
            log: clone_op(&self.log, ctx),
            loop_op: clone_op(&self.loop_op, ctx),
            for_each: clone_op(&self.for_each, ctx),
            switch: clone_op(&self.switch, ctx),
            call: clone_op(&self.call, ctx),
            define: clone_op(&self.define, ctx),
            ext: clone_op(&self.ext, ctx),
        }
    }

    /// Visit the present operations in catalog order.
    fn for_each_present(&self, mut visit: impl FnMut(&dyn fmt::Display)) {
        visit_op(&self.set, &mut visit);
        visit_op(&self.patch, &mut visit);
        visit_op(&self.import, &mut visit);
        visit_op(&self.export, &mut visit);
        visit_op(&self.template, &mut visit);
        visit_op(&self.template_file, &mut visit);
        visit_op(&self.env, &mut visit);
        visit_op(&self.exec, &mut visit);
        visit_op(&self.os, &mut visit);
        visit_op(&self.html2dom, &mut visit);
        visit_op(&self.abort, &mut visit);
        visit_op(&self.log, &mut visit);
        visit_op(&self.loop_op, &mut visit);
        visit_op(&self.for_each, &mut visit);
        visit_op(&self.switch, &mut visit);
        visit_op(&self.call, &mut visit);
        visit_op(&self.define, &mut visit);
        visit_op(&self.ext, &mut visit);
    }
}

impl fmt::Display for OpSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.for_each_present(|op| parts.push(op.to_string()));
        write!(f, "Ops[{}]", parts.join(","))
    }
}

fn run_op<T: Operation>(op: &Option<T>, ctx: &Context) -> Result<(), PipelineError> {
    match op {
        Some(op) => op.run(ctx),
        None => Ok(()),
    }
}

fn clone_op<T: Operation>(op: &Option<T>, ctx: &Context) -> Option<T> {
    op.as_ref().map(|op| op.clone_with(ctx))
}

fn visit_op<T: Operation>(op: &Option<T>, visit: &mut impl FnMut(&dyn fmt::Display)) {
    if let Some(op) = op {
        visit(op);
    }
}

/// Parse a dotted data-tree path, wrapping failures with call-site context.
pub(crate) fn parse_path(text: &str) -> Result<tl_dom::Path, PipelineError> {
    tl_dom::Path::parse(text).map_err(|e| PipelineError::dom(format!("path '{text}'"), e))
}

/// Lenient render of an optional templated field.
pub(crate) fn render_opt(ctx: &Context, value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| ctx.render_lenient(v))
}

#[cfg(test)]
#[path = "op_spec_tests.rs"]
mod tests;
