// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flattened dotted-key view of a tree (java-properties style)
//!
//! `a: {b: {c: v}}` flattens to `a.b.c=v`; list items flatten through their
//! index (`l[0]=x`). Keys containing literal dots are escaped, so flatten
//! and [`unflatten`] round-trip.

use crate::node::{Node, Scalar};
use crate::path::{Path, Segment};
use crate::DomError;

/// Flatten a tree into sorted `(dotted path, scalar)` pairs.
pub fn flatten(node: &Node) -> Vec<(String, Scalar)> {
    let mut out = Vec::new();
    walk(node, &mut Vec::new(), &mut out);
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn walk(node: &Node, trail: &mut Vec<Segment>, out: &mut Vec<(String, Scalar)>) {
    match node {
        Node::Leaf(scalar) => {
            if !trail.is_empty() {
                let path = Path::from(trail.clone());
                out.push((path.to_string(), scalar.clone()));
            }
        }
        Node::List(items) => {
            for (index, item) in items.iter().enumerate() {
                trail.push(Segment::Index(index));
                walk(item, trail, out);
                trail.pop();
            }
        }
        Node::Container(map) => {
            for (key, child) in map {
                trail.push(Segment::Key(key.clone()));
                walk(child, trail, out);
                trail.pop();
            }
        }
    }
}

/// Rebuild a tree from flattened `key=value` pairs.
pub fn unflatten<'a>(
    pairs: impl IntoIterator<Item = (&'a str, Scalar)>,
) -> Result<Node, DomError> {
    let mut root = Node::container();
    for (key, value) in pairs {
        let path = Path::parse(key)?;
        root.set(&path, Node::Leaf(value));
    }
    Ok(root)
}

#[cfg(test)]
#[path = "props_tests.rs"]
mod tests;
