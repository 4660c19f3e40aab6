// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-format codecs: YAML, JSON, properties and raw text

use crate::node::{Node, Scalar};
use crate::{props, DomError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, BufReader, Read, Write};
use std::str::FromStr;

/// Serialization format for [`encode`] / [`decode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Yaml,
    Json,
    Properties,
    Text,
}

impl FromStr for Format {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "properties" => Ok(Format::Properties),
            "text" => Ok(Format::Text),
            other => Err(DomError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Properties => "properties",
            Format::Text => "text",
        };
        f.write_str(name)
    }
}

/// Decode a document into a tree.
pub fn decode(reader: impl Read, format: Format) -> Result<Node, DomError> {
    match format {
        Format::Yaml => Ok(serde_yaml::from_reader(reader)?),
        Format::Json => Ok(serde_json::from_reader(reader)?),
        Format::Properties => decode_properties(reader),
        Format::Text => {
            let mut text = String::new();
            let mut reader = reader;
            reader.read_to_string(&mut text)?;
            Ok(Node::leaf(text))
        }
    }
}

/// Decode from an in-memory string.
pub fn decode_str(text: &str, format: Format) -> Result<Node, DomError> {
    decode(text.as_bytes(), format)
}

/// Encode a tree to a writer.
///
/// `Text` requires a leaf source; anything else is [`DomError::UnsupportedNode`].
pub fn encode(node: &Node, mut writer: impl Write, format: Format) -> Result<(), DomError> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_writer(writer, node)?),
        Format::Json => Ok(serde_json::to_writer_pretty(writer, node)?),
        Format::Properties => {
            for (key, value) in props::flatten(node) {
                writeln!(writer, "{key}={value}")?;
            }
            Ok(())
        }
        Format::Text => match node.as_leaf() {
            Some(scalar) => {
                write!(writer, "{scalar}")?;
                Ok(())
            }
            None => Err(DomError::UnsupportedNode {
                format: "text",
                detail: format!("{node:?}"),
            }),
        },
    }
}

/// Encode to an in-memory string.
pub fn encode_to_string(node: &Node, format: Format) -> Result<String, DomError> {
    let mut buf = Vec::new();
    encode(node, &mut buf, format)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn decode_properties(reader: impl Read) -> Result<Node, DomError> {
    let mut pairs = Vec::new();
    for (number, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') || text.starts_with('!') {
            continue;
        }
        let Some((key, value)) = text.split_once('=') else {
            return Err(DomError::InvalidProperties {
                line: number + 1,
                text: text.to_string(),
            });
        };
        pairs.push((key.trim().to_string(), Scalar::Str(value.trim().to_string())));
    }
    props::unflatten(pairs.iter().map(|(k, v)| (k.as_str(), v.clone())))
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
