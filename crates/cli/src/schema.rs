// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-run document validation against the embedded pipeline JSON schema

use anyhow::{anyhow, Context as _};

const PIPELINE_V1: &str = include_str!("../schemas/pipeline-v1.json");

/// One schema violation, located by instance and evaluation path.
#[derive(Debug)]
pub struct Violation {
    pub instance_location: String,
    pub evaluation_path: String,
    pub message: String,
}

/// Validate a parsed pipeline document.
///
/// Returns the collected violations; an empty list means the document is
/// valid.
pub fn validate(doc: &serde_json::Value) -> anyhow::Result<Vec<Violation>> {
    let schema: serde_json::Value =
        serde_json::from_str(PIPELINE_V1).context("parse embedded schema")?;
    let compiled = jsonschema::JSONSchema::compile(&schema)
        .map_err(|e| anyhow!("compile embedded schema: {e}"))?;
    let mut violations = Vec::new();
    if let Err(errors) = compiled.validate(doc) {
        for error in errors {
            violations.push(Violation {
                instance_location: error.instance_path.to_string(),
                evaluation_path: error.schema_path.to_string(),
                message: error.to_string(),
            });
        }
    }
    Ok(violations)
}

/// Render violations as an indented tree, one branch per instance location.
pub fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::new();
    for violation in violations {
        let location = if violation.instance_location.is_empty() {
            "(document)"
        } else {
            &violation.instance_location
        };
        out.push_str(&format!(
            "{} => {}\n    ERR: {}\n",
            location, violation.evaluation_path, violation.message
        ));
    }
    out
}
