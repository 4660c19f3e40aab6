// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tl - run a treeline pipeline from a file

mod color;
mod listener;
mod schema;
mod values;

use anyhow::{bail, Context as _};
use clap::Parser;
use color::{codes, paint, ColorChoice};
use listener::Decoration;
use std::path::PathBuf;
use std::process::ExitCode;
use tl_dom::Node;
use tl_pipeline::{Context, PipelineDoc};

#[derive(Parser)]
#[command(
    name = "tl",
    version,
    about = "Runs a pipeline from a file",
    long_about = "Runs a pipeline from a file.\n\n\
The file is validated against the pipeline JSON schema unless validation is \
explicitly disabled (--validate false). Initial values can be seeded with \
--set keyX=valueY."
)]
struct Cli {
    /// Pipeline file to run
    #[arg(long, value_name = "FILE")]
    file: PathBuf,

    /// Set a value in the data tree prior to the run (key=value)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Validate the pipeline file against the JSON schema before running
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    validate: bool,

    /// Output decoration
    #[arg(long, value_enum, default_value_t)]
    output: Decoration,

    /// Color output
    #[arg(long, value_enum, default_value_t)]
    color: ColorChoice,

    /// Write the final data tree to this file as YAML
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let colorize = color::should_colorize(cli.color);
    match run(&cli, colorize) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", paint(colorize, codes::ERROR, "error:"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, colorize: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("read '{}'", cli.file.display()))?;

    if cli.validate {
        banner(colorize, "[Schema] Validating document");
        let plain: serde_json::Value = serde_yaml::from_str(&text)
            .with_context(|| format!("parse '{}'", cli.file.display()))?;
        let violations = schema::validate(&plain)?;
        if !violations.is_empty() {
            eprintln!("{}", schema::render_violations(&violations));
            bail!("document failed schema validation");
        }
        banner(colorize, "[Schema] OK");
    }

    let doc: PipelineDoc = serde_yaml::from_str(&text)
        .with_context(|| format!("parse '{}'", cli.file.display()))?;

    banner(colorize, "[Values] Setting values");
    let mut data = Node::container();
    values::apply_vars(&mut data, doc.vars.as_ref())?;
    values::apply_values(&mut data, &cli.set)?;
    banner(colorize, "[Values] OK");

    let ctx = Context::new(data)
        .with_listener(listener::for_decoration(cli.output, colorize));
    let result = ctx.executor().execute(&doc.spec);
    ctx.close_services()?;
    result?;

    if let Some(export) = &cli.export {
        let out = std::fs::File::create(export)
            .with_context(|| format!("create '{}'", export.display()))?;
        tl_dom::encode(&ctx.into_data(), out, tl_dom::Format::Yaml)
            .with_context(|| format!("write '{}'", export.display()))?;
    }
    Ok(())
}

fn banner(colorize: bool, message: &str) {
    eprintln!("{}", paint(colorize, codes::INFO, message));
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
