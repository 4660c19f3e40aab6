// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data tree nodes: containers, lists and scalar leaves
//!
//! `Node` round-trips through serde untagged, so YAML/JSON documents decode
//! straight into the tree and back. Containers keep insertion order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::path::{Path, Segment};

/// A scalar leaf value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Int(i) => serde_json::Value::from(*i),
            Scalar::Float(f) => serde_json::Value::from(*f),
            Scalar::Str(s) => serde_json::Value::from(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// One node of the data tree.
///
/// Untagged variant order matters: scalars are tried before lists and
/// containers so that plain values never deserialize as structures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(Scalar),
    List(Vec<Node>),
    Container(IndexMap<String, Node>),
}

impl Default for Node {
    fn default() -> Self {
        Node::container()
    }
}

impl Node {
    /// New empty container.
    pub fn container() -> Node {
        Node::Container(IndexMap::new())
    }

    /// New empty list.
    pub fn list() -> Node {
        Node::List(Vec::new())
    }

    /// New leaf holding `value`.
    pub fn leaf(value: impl Into<Scalar>) -> Node {
        Node::Leaf(value.into())
    }

    /// Null-scalar leaf, used for list holes.
    pub fn null() -> Node {
        Node::Leaf(Scalar::Null)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Node::Container(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_container(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Container(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut IndexMap<String, Node>> {
        match self {
            Node::Container(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Direct child of a container by key.
    pub fn child(&self, key: &str) -> Option<&Node> {
        self.as_container().and_then(|map| map.get(key))
    }

    /// Address a node by path. Pure: never modifies the tree.
    pub fn lookup(&self, path: &Path) -> Option<&Node> {
        let mut cur = self;
        for segment in path.segments() {
            cur = match (segment, cur) {
                (Segment::Key(k), Node::Container(map)) => map.get(k)?,
                (Segment::Index(i), Node::List(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(cur)
    }

    /// Mutable counterpart of [`Node::lookup`].
    pub fn lookup_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let mut cur = self;
        for segment in path.segments() {
            cur = match (segment, cur) {
                (Segment::Key(k), Node::Container(map)) => map.get_mut(k)?,
                (Segment::Index(i), Node::List(items)) => items.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(cur)
    }

    /// Store `value` at `path`, creating intermediate containers and lists
    /// as the segment kinds require. Indexing past the end of a list
    /// extends it with null holes. Mismatched intermediates are replaced.
    pub fn set(&mut self, path: &Path, value: Node) {
        set_at(self, path.segments(), value);
    }

    /// Remove and return the node at `path`.
    pub fn remove(&mut self, path: &Path) -> Option<Node> {
        let (last, parents) = path.segments().split_last()?;
        let mut cur = self;
        for segment in parents {
            cur = match (segment, cur) {
                (Segment::Key(k), Node::Container(map)) => map.get_mut(k)?,
                (Segment::Index(i), Node::List(items)) => items.get_mut(*i)?,
                _ => return None,
            };
        }
        match (last, cur) {
            (Segment::Key(k), Node::Container(map)) => map.shift_remove(k),
            (Segment::Index(i), Node::List(items)) if *i < items.len() => Some(items.remove(*i)),
            _ => None,
        }
    }

    /// Recursive key-wise merge. Where both sides are containers the keys
    /// merge recursively; in every other pairing the right side wins.
    /// Lists are not merged element-wise.
    pub fn merge(&mut self, other: Node) {
        match other {
            Node::Container(entries) if self.is_container() => {
                if let Node::Container(map) = self {
                    for (key, incoming) in entries {
                        match map.get_mut(&key) {
                            Some(existing)
                                if existing.is_container() && incoming.is_container() =>
                            {
                                existing.merge(incoming);
                            }
                            _ => {
                                map.insert(key, incoming);
                            }
                        }
                    }
                }
            }
            other => *self = other,
        }
    }

    /// Plain nested value view of the tree (the template snapshot shape).
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Node::Leaf(scalar) => scalar.to_plain(),
            Node::List(items) => {
                serde_json::Value::Array(items.iter().map(Node::to_plain).collect())
            }
            Node::Container(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_plain()))
                    .collect(),
            ),
        }
    }

    /// Decode a plain nested value into a tree.
    pub fn from_plain(value: &serde_json::Value) -> Node {
        match value {
            serde_json::Value::Null => Node::Leaf(Scalar::Null),
            serde_json::Value::Bool(b) => Node::Leaf(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Leaf(Scalar::Int(i)),
                None => Node::Leaf(Scalar::Float(n.as_f64().unwrap_or(0.0))),
            },
            serde_json::Value::String(s) => Node::Leaf(Scalar::Str(s.clone())),
            serde_json::Value::Array(items) => {
                Node::List(items.iter().map(Node::from_plain).collect())
            }
            serde_json::Value::Object(map) => Node::Container(
                map.iter()
                    .map(|(k, v)| (k.clone(), Node::from_plain(v)))
                    .collect(),
            ),
        }
    }

    fn make_container(&mut self) -> &mut IndexMap<String, Node> {
        if !self.is_container() {
            *self = Node::container();
        }
        match self {
            Node::Container(map) => map,
            _ => unreachable!(),
        }
    }

    fn make_list(&mut self) -> &mut Vec<Node> {
        if !self.is_list() {
            *self = Node::list();
        }
        match self {
            Node::List(items) => items,
            _ => unreachable!(),
        }
    }
}

fn set_at(node: &mut Node, segments: &[Segment], value: Node) {
    match segments.split_first() {
        None => *node = value,
        Some((Segment::Key(key), rest)) => {
            let map = node.make_container();
            if rest.is_empty() {
                map.insert(key.clone(), value);
            } else {
                let child = map.entry(key.clone()).or_insert_with(Node::container);
                set_at(child, rest, value);
            }
        }
        Some((Segment::Index(index), rest)) => {
            let items = node.make_list();
            if items.len() <= *index {
                items.resize(*index + 1, Node::null());
            }
            if rest.is_empty() {
                items[*index] = value;
            } else {
                set_at(&mut items[*index], rest, value);
            }
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
