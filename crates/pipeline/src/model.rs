// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative pipeline document model
//!
//! The document shape mirrors the YAML a user writes: an action carries its
//! metadata (`name`, `order`, `when`), its operation fields and an optional
//! `children` mapping, all at the same level.

use crate::ops::OpSpec;
use crate::Context;
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tl_dom::Node;

/// Child actions keyed by name. Insertion order breaks `order` ties.
pub type ChildActions = IndexMap<String, ActionSpec>;

/// Top-level pipeline document: optional seed variables plus the root action.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDoc {
    #[serde(default)]
    pub vars: Option<serde_json::Map<String, serde_json::Value>>,
    pub spec: ActionSpec,
}

/// Action metadata: an optional display name, an execution order among
/// siblings (default 0) and a boolean `when` gate template.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub name: Option<String>,
    pub order: Option<i64>,
    pub when: Option<String>,
}

impl fmt::Display for ActionMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(format!("name={name}"));
        }
        if let Some(order) = self.order {
            parts.push(format!("order={order}"));
        }
        if let Some(when) = self.when.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            parts.push(format!("when={when}"));
        }
        write!(f, "[{}]", parts.join(","))
    }
}

/// One named node of the pipeline tree.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    #[serde(flatten)]
    pub meta: ActionMeta,
    #[serde(flatten)]
    pub ops: OpSpec,
    #[serde(default)]
    pub children: Option<ChildActions>,
}

impl ActionSpec {
    /// Self-copy with every templated operation parameter resolved against
    /// the current snapshot (recursing into child actions).
    pub fn clone_with(&self, ctx: &Context) -> ActionSpec {
        ActionSpec {
            meta: self.meta.clone(),
            ops: self.ops.clone_with(ctx),
            children: self.children.as_ref().map(|children| {
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.clone_with(ctx)))
                    .collect()
            }),
        }
    }
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.meta, self.ops)?;
        if let Some(children) = &self.children {
            let mut names: Vec<&str> = children.keys().map(String::as_str).collect();
            names.sort_unstable();
            write!(f, "{{{}}}", names.join(","))?;
        }
        Ok(())
    }
}

/// A scalar carrier that is either a literal (possibly templated) or a
/// data-tree reference resolved against live state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValOrRef {
    Val(String),
    Ref(String),
}

impl ValOrRef {
    pub fn val(text: impl Into<String>) -> Self {
        ValOrRef::Val(text.into())
    }

    /// Resolve to a string: a rendered literal, or the text of the node at
    /// the referenced path (leaves render their scalar, other nodes compact
    /// JSON, an absent node the empty string).
    pub fn resolve(&self, ctx: &Context) -> String {
        match self {
            ValOrRef::Val(text) => ctx.render_lenient(text),
            ValOrRef::Ref(path) => match tl_dom::Path::parse(path) {
                Ok(path) => ctx
                    .data()
                    .lookup(&path)
                    .map(node_to_string)
                    .unwrap_or_default(),
                Err(_) => String::new(),
            },
        }
    }

    /// Resolve-and-freeze: the clone carries the resolved literal.
    pub fn clone_with(&self, ctx: &Context) -> ValOrRef {
        ValOrRef::Val(self.resolve(ctx))
    }
}

pub(crate) fn node_to_string(node: &Node) -> String {
    match node.as_leaf() {
        Some(scalar) => scalar.to_string(),
        None => serde_json::to_string(&node.to_plain()).unwrap_or_default(),
    }
}

impl fmt::Display for ValOrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValOrRef::Val(v) => write!(f, "val={v}"),
            ValOrRef::Ref(r) => write!(f, "ref={r}"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValOrRefRaw {
    Mapping {
        #[serde(default)]
        val: Option<String>,
        #[serde(default, rename = "ref")]
        reference: Option<String>,
    },
    Bare(String),
}

impl<'de> Deserialize<'de> for ValOrRef {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match ValOrRefRaw::deserialize(d)? {
            ValOrRefRaw::Mapping {
                val: Some(v),
                reference: None,
            } => Ok(ValOrRef::Val(v)),
            ValOrRefRaw::Mapping {
                val: None,
                reference: Some(r),
            } => Ok(ValOrRef::Ref(r)),
            ValOrRefRaw::Mapping { .. } => Err(D::Error::custom(
                "exactly one of 'val' or 'ref' is required",
            )),
            ValOrRefRaw::Bare(s) => Ok(ValOrRef::Val(s)),
        }
    }
}

impl Serialize for ValOrRef {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        match self {
            ValOrRef::Val(v) => s.serialize_str(v),
            ValOrRef::Ref(r) => {
                let mut map = s.serialize_map(Some(1))?;
                map.serialize_entry("ref", r)?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
