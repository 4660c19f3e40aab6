// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output decorations: listener implementations rendering progress
//!
//! `default` prints indented `[Start]`/`[Done ]`/`[Error]`/`[Log  ]`/`[SKIP ]`
//! lines; `gitlab` wraps top-level actions in collapsible CI section markers.

use crate::color::{codes, paint};
use clap::ValueEnum;
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};
use tl_pipeline::{log_tag, ActionSpec, Listener, PipelineError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Decoration {
    #[default]
    Default,
    Gitlab,
}

/// Build the listener for the selected decoration.
pub fn for_decoration(decoration: Decoration, colorize: bool) -> Box<dyn Listener> {
    match decoration {
        Decoration::Default => Box::new(SimpleListener::new(colorize)),
        Decoration::Gitlab => Box::new(GitlabListener::new(colorize)),
    }
}

pub struct SimpleListener {
    colorize: bool,
    indent: Cell<usize>,
}

impl SimpleListener {
    pub fn new(colorize: bool) -> Self {
        SimpleListener {
            colorize,
            indent: Cell::new(0),
        }
    }

    fn indent_str(&self) -> String {
        " ".repeat(self.indent.get())
    }

    fn start_line(&self, action: &ActionSpec) -> String {
        format!(
            "{} {} {action}",
            paint(self.colorize, codes::START, "[Start]"),
            self.indent_str()
        )
    }

    fn end_line(&self, action: &ActionSpec, error: Option<&PipelineError>) -> String {
        match error {
            Some(_) => format!(
                "{} {} {action}",
                paint(self.colorize, codes::ERROR, "[Error]"),
                self.indent_str()
            ),
            None => format!(
                "{} {} {action}",
                paint(self.colorize, codes::DONE, "[Done ]"),
                self.indent_str()
            ),
        }
    }

    fn log_line(&self, values: &[String]) -> String {
        if log_tag(values) == Some("skip") {
            return paint(
                self.colorize,
                codes::MUTED,
                &format!("[SKIP ] {} {}", self.indent_str(), values[1..].join(" ")),
            );
        }
        paint(
            self.colorize,
            codes::INFO,
            &format!("[Log  ] {} {}", self.indent_str(), values.join(" ")),
        )
    }
}

impl Listener for SimpleListener {
    fn on_before(&self, action: &ActionSpec) {
        eprintln!("{}", self.start_line(action));
        self.indent.set(self.indent.get() + 1);
    }

    fn on_after(&self, action: &ActionSpec, error: Option<&PipelineError>) {
        self.indent.set(self.indent.get().saturating_sub(1));
        eprintln!("{}", self.end_line(action, error));
    }

    fn on_log(&self, values: &[String]) {
        eprintln!("{}", self.log_line(values));
    }
}

/// Collapsible job-log sections for GitLab CI.
///
/// Top-level actions open a section; nested ones fall back to the plain
/// rendering inside it.
pub struct GitlabListener {
    inner: SimpleListener,
    depth: Cell<usize>,
    serial: Cell<u64>,
    open: Cell<u64>,
}

impl GitlabListener {
    pub fn new(colorize: bool) -> Self {
        GitlabListener {
            inner: SimpleListener::new(colorize),
            depth: Cell::new(0),
            serial: Cell::new(0),
            open: Cell::new(0),
        }
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl Listener for GitlabListener {
    fn on_before(&self, action: &ActionSpec) {
        if self.depth.get() == 0 {
            let id = self.serial.get() + 1;
            self.serial.set(id);
            self.open.set(id);
            eprintln!(
                "\x1b[0Ksection_start:{}:action_{id}[collapsed=true]\r\x1b[0K{action}",
                Self::now()
            );
        } else {
            self.inner.on_before(action);
        }
        self.depth.set(self.depth.get() + 1);
    }

    fn on_after(&self, action: &ActionSpec, error: Option<&PipelineError>) {
        self.depth.set(self.depth.get().saturating_sub(1));
        if self.depth.get() == 0 {
            eprintln!(
                "\x1b[0Ksection_end:{}:action_{}\r\x1b[0K",
                Self::now(),
                self.open.get()
            );
        } else {
            self.inner.on_after(action, error);
        }
    }

    fn on_log(&self, values: &[String]) {
        self.inner.on_log(values);
    }
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
