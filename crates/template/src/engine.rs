// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Template engine: strict and lenient rendering, boolean evaluation

use crate::funcs;
use crate::TemplateError;
use minijinja::Environment;
use serde_json::Value;

/// Cheap probe for template markers.
///
/// Many operation parameters pass through lenient rendering whether they are
/// templated or not; only strings containing a closed `{{ … }}` pair are
/// handed to the engine.
pub fn possibly_template(input: &str) -> bool {
    match input.find("{{") {
        Some(open) => input[open..].find("}}").is_some_and(|close| close > 0),
        None => false,
    }
}

/// The expansion engine used for every templated operation parameter.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Engine with the default function library registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        funcs::register(&mut env);
        TemplateEngine { env }
    }

    /// Mutable access to the underlying environment, for callers that
    /// register extra functions before execution starts.
    pub fn env_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Strict render: any parse or evaluation failure propagates.
    pub fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.env.render_str(template, data)?)
    }

    /// Lenient render: on any failure the input is returned unchanged.
    pub fn render_lenient(&self, template: &str, data: &Value) -> String {
        if !possibly_template(template) {
            return template.to_string();
        }
        self.env
            .render_str(template, data)
            .unwrap_or_else(|_| template.to_string())
    }

    /// Lenient render over a slice of templates.
    pub fn render_slice_lenient(&self, templates: &[String], data: &Value) -> Vec<String> {
        templates
            .iter()
            .map(|t| self.render_lenient(t, data))
            .collect()
    }

    /// Lenient render over the string values of a map, recursing into
    /// nested maps and lists. Non-string values pass through untouched.
    pub fn render_map_lenient(
        &self,
        input: &serde_json::Map<String, Value>,
        data: &Value,
    ) -> serde_json::Map<String, Value> {
        input
            .iter()
            .map(|(k, v)| (k.clone(), self.render_any_lenient(v, data)))
            .collect()
    }

    /// Structural lenient render over any plain value.
    pub fn render_any_lenient(&self, input: &Value, data: &Value) -> Value {
        match input {
            Value::String(s) => Value::String(self.render_lenient(s, data)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|v| self.render_any_lenient(v, data))
                    .collect(),
            ),
            Value::Object(map) => Value::Object(self.render_map_lenient(map, data)),
            other => other.clone(),
        }
    }

    /// Strict render followed by boolean-literal parsing of the trimmed
    /// output. Accepts `true/false`, `t/f` and `1/0` in any case.
    pub fn eval_bool(&self, template: &str, data: &Value) -> Result<bool, TemplateError> {
        let rendered = self.render(template, data)?;
        match rendered.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            other => Err(TemplateError::NotABool(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
