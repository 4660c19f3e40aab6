// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The registered template function library
//!
//! Function names are part of the external surface and stay stable:
//!
//! - structural: `toYaml`, `dom2yaml`, `dom2json`, `dom2properties`,
//!   `diffTree`, `domdiff`, `unflatten`, `isEmpty`
//! - filesystem: `fileExists`, `fileNonEmpty`, `isDir`, `glob`, `fileGlob`,
//!   `mergeFiles`
//! - strings & encoding: `b64enc`, `b64dec`, `osBase`, `regexNamedExtract`,
//!   `urlParseQuery`, `tpl`
//! - numeric (string-coercing): `add`, `mul`, `max`, `min`
//!
//! General-purpose string/number helpers beyond these come from the
//! minijinja builtin filter set (`|int`, `|upper`, `|default(..)`, …).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use minijinja::value::{Rest, Value};
use minijinja::{Environment, Error, ErrorKind, State};
use serde_json::Value as Json;
use std::path::Path as FsPath;
use tl_dom::{props, Format, Node, Path};

/// Register the default function library on `env`.
pub fn register(env: &mut Environment<'static>) {
    env.add_function("toYaml", to_yaml);
    env.add_function("dom2yaml", to_yaml);
    env.add_function("dom2json", dom2json);
    env.add_function("dom2properties", dom2properties);
    env.add_function("diffTree", diff_tree);
    env.add_function("domdiff", diff_tree);
    env.add_function("unflatten", unflatten);
    env.add_function("isEmpty", is_empty);
    env.add_function("fileExists", file_exists);
    env.add_function("fileNonEmpty", file_non_empty);
    env.add_function("isDir", is_dir);
    env.add_function("glob", glob_fn);
    env.add_function("fileGlob", glob_fn);
    env.add_function("mergeFiles", merge_files);
    env.add_function("b64enc", b64enc);
    env.add_function("b64dec", b64dec);
    env.add_function("osBase", os_base);
    env.add_function("regexNamedExtract", regex_named_extract);
    env.add_function("urlParseQuery", url_parse_query);
    env.add_function("tpl", tpl);
    env.add_function("add", add);
    env.add_function("mul", mul);
    env.add_function("max", max_fn);
    env.add_function("min", min_fn);
}

fn invalid_op(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}

fn to_json_value(value: &Value) -> Result<Json, Error> {
    serde_json::to_value(value).map_err(|e| invalid_op(format!("not serializable: {e}")))
}

fn to_yaml(value: Value) -> Result<String, Error> {
    let plain = to_json_value(&value)?;
    let text = serde_yaml::to_string(&plain).map_err(|e| invalid_op(e.to_string()))?;
    Ok(text.trim_end_matches('\n').to_string())
}

fn dom2json(value: Value) -> Result<String, Error> {
    let plain = to_json_value(&value)?;
    serde_json::to_string(&plain).map_err(|e| invalid_op(e.to_string()))
}

fn dom2properties(value: Value) -> Result<String, Error> {
    let node = Node::from_plain(&to_json_value(&value)?);
    let lines: Vec<String> = props::flatten(&node)
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    Ok(lines.join("\n"))
}

// diffTree flattens both sides and reports adds/deletes/changes by path.
// Non-container arguments yield an empty result rather than an error.
fn diff_tree(left: Value, right: Value) -> Result<Value, Error> {
    let (Json::Object(_), Json::Object(_)) = (to_json_value(&left)?, to_json_value(&right)?)
    else {
        return Ok(Value::from_serialize(Vec::<Json>::new()));
    };
    let lflat = props::flatten(&Node::from_plain(&to_json_value(&left)?));
    let rflat = props::flatten(&Node::from_plain(&to_json_value(&right)?));
    let mut out = Vec::new();
    for (key, lval) in &lflat {
        match rflat.iter().find(|(k, _)| k == key) {
            None => out.push(serde_json::json!({"type": "delete", "path": key})),
            Some((_, rval)) if rval != lval => out.push(serde_json::json!({
                "type": "change", "path": key, "value": rval.to_plain()
            })),
            Some(_) => {}
        }
    }
    for (key, rval) in &rflat {
        if !lflat.iter().any(|(k, _)| k == key) {
            out.push(serde_json::json!({
                "type": "add", "path": key, "value": rval.to_plain()
            }));
        }
    }
    Ok(Value::from_serialize(&out))
}

fn unflatten(value: Value) -> Result<Value, Error> {
    let Json::Object(map) = to_json_value(&value)? else {
        return Err(invalid_op("unflatten expects a mapping"));
    };
    let mut root = Node::container();
    for (key, entry) in &map {
        let path = Path::parse(key).map_err(|e| invalid_op(e.to_string()))?;
        root.set(&path, Node::from_plain(entry));
    }
    Ok(Value::from_serialize(root.to_plain()))
}

fn is_empty(value: Value) -> bool {
    value.is_none() || value.is_undefined() || value.as_str() == Some("")
}

fn file_exists(path: String) -> bool {
    std::fs::metadata(&path).is_ok()
}

fn file_non_empty(path: String) -> bool {
    std::fs::metadata(&path).is_ok_and(|m| m.len() > 0)
}

fn is_dir(path: String) -> bool {
    std::fs::metadata(&path).is_ok_and(|m| m.is_dir())
}

fn glob_fn(pattern: String) -> Result<Value, Error> {
    let paths = glob::glob(&pattern).map_err(|e| invalid_op(e.to_string()))?;
    let matched: Vec<String> = paths
        .filter_map(Result::ok)
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    Ok(Value::from_serialize(&matched))
}

// File format is taken from the extension; anything unrecognized reads as YAML.
fn merge_files(files: Vec<String>) -> Result<Value, Error> {
    let mut merged = Node::container();
    for file in &files {
        let format = match FsPath::new(file)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("yaml")
        {
            "json" => Format::Json,
            "properties" => Format::Properties,
            _ => Format::Yaml,
        };
        let reader = std::fs::File::open(file)
            .map_err(|e| invalid_op(format!("open '{file}': {e}")))?;
        let node = tl_dom::decode(reader, format)
            .map_err(|e| invalid_op(format!("decode '{file}': {e}")))?;
        merged.merge(node);
    }
    Ok(Value::from_serialize(merged.to_plain()))
}

fn b64enc(input: String) -> String {
    BASE64.encode(input.as_bytes())
}

fn b64dec(input: String) -> Result<String, Error> {
    let bytes = BASE64
        .decode(input.as_bytes())
        .map_err(|e| invalid_op(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| invalid_op(e.to_string()))
}

fn os_base(path: String) -> String {
    FsPath::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or(path)
}

fn regex_named_extract(pattern: String, input: String) -> Result<Value, Error> {
    let re = regex::Regex::new(&pattern).map_err(|e| invalid_op(e.to_string()))?;
    let Some(captures) = re.captures(&input) else {
        return Ok(Value::from(()));
    };
    let mut out = serde_json::Map::new();
    for name in re.capture_names().flatten() {
        if let Some(m) = captures.name(name) {
            out.insert(name.to_string(), Json::from(m.as_str()));
        }
    }
    Ok(Value::from_serialize(&out))
}

fn url_parse_query(query: String) -> Result<Value, Error> {
    let mut out: serde_json::Map<String, Json> = serde_json::Map::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = url_decode(key)?;
        let value = url_decode(value)?;
        let entry = out.entry(key).or_insert_with(|| Json::Array(Vec::new()));
        if let Json::Array(items) = entry {
            items.push(Json::from(value));
        }
    }
    Ok(Value::from_serialize(&out))
}

fn url_decode(input: &str) -> Result<String, Error> {
    let mut out = Vec::with_capacity(input.len());
    let mut bytes = input.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'+' => out.push(b' '),
            b'%' => {
                let hi = bytes.next().and_then(hex_digit);
                let lo = bytes.next().and_then(hex_digit);
                match (hi, lo) {
                    (Some(h), Some(l)) => out.push(h * 16 + l),
                    _ => return Err(invalid_op(format!("invalid percent escape in '{input}'"))),
                }
            }
            other => out.push(other),
        }
    }
    String::from_utf8(out).map_err(|e| invalid_op(e.to_string()))
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn tpl(state: &State, template: String, data: Value) -> Result<String, Error> {
    state.env().render_str(&template, data)
}

enum Num {
    Int(i64),
    Float(f64),
}

// Numeric helpers coerce numeric strings so counters stored as text
// (the common case after a Template step) keep working.
fn coerce_num(value: &Value) -> Result<Num, Error> {
    if let Ok(i) = i64::try_from(value.clone()) {
        return Ok(Num::Int(i));
    }
    if let Ok(f) = f64::try_from(value.clone()) {
        return Ok(Num::Float(f));
    }
    if let Some(s) = value.as_str() {
        let t = s.trim();
        if let Ok(i) = t.parse::<i64>() {
            return Ok(Num::Int(i));
        }
        if let Ok(f) = t.parse::<f64>() {
            return Ok(Num::Float(f));
        }
    }
    Err(invalid_op(format!("not a number: {value:?}")))
}

fn fold_nums(
    args: &[Value],
    init: Num,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> Result<Value, Error> {
    let mut acc = init;
    for arg in args {
        acc = match (acc, coerce_num(arg)?) {
            (Num::Int(a), Num::Int(b)) => Num::Int(int_op(a, b)),
            (Num::Int(a), Num::Float(b)) => Num::Float(float_op(a as f64, b)),
            (Num::Float(a), Num::Int(b)) => Num::Float(float_op(a, b as f64)),
            (Num::Float(a), Num::Float(b)) => Num::Float(float_op(a, b)),
        };
    }
    Ok(match acc {
        Num::Int(i) => Value::from(i),
        Num::Float(f) => Value::from(f),
    })
}

fn add(args: Rest<Value>) -> Result<Value, Error> {
    fold_nums(&args, Num::Int(0), |a, b| a.wrapping_add(b), |a, b| a + b)
}

fn mul(args: Rest<Value>) -> Result<Value, Error> {
    fold_nums(&args, Num::Int(1), |a, b| a.wrapping_mul(b), |a, b| a * b)
}

fn extremum(args: &[Value], pick_right: impl Fn(f64, f64) -> bool) -> Result<Value, Error> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| invalid_op("expected at least one argument"))?;
    let mut acc = coerce_num(first)?;
    for arg in rest {
        let next = coerce_num(arg)?;
        let (a, b) = (num_as_f64(&acc), num_as_f64(&next));
        if pick_right(a, b) {
            acc = next;
        }
    }
    Ok(match acc {
        Num::Int(i) => Value::from(i),
        Num::Float(f) => Value::from(f),
    })
}

fn num_as_f64(n: &Num) -> f64 {
    match n {
        Num::Int(i) => *i as f64,
        Num::Float(f) => *f,
    }
}

fn max_fn(args: Rest<Value>) -> Result<Value, Error> {
    extremum(&args, |a, b| b > a)
}

fn min_fn(args: Rest<Value>) -> Result<Value, Error> {
    extremum(&args, |a, b| b < a)
}

#[cfg(test)]
#[path = "funcs_tests.rs"]
mod tests;
