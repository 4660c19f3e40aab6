// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Html2Dom: parse HTML text from a leaf into a data subtree
//!
//! Parsing is permissive: malformed markup never fails, an unmatched
//! query does. Elements become containers (or lists when a sibling name
//! recurs), attributes land in an `Attrs` child container and text content
//! in a `Value` leaf.

use crate::model::ValOrRef;
use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use tl_dom::Node;

const ATTRS_KEY: &str = "Attrs";
const VALUE_KEY: &str = "Value";

pub(crate) const DEFAULT_QUERY: &str = "html";

/// Only the default layout exists today; anything else is a typo.
pub(crate) fn check_layout(layout: Option<&str>) -> Result<(), PipelineError> {
    match layout.filter(|l| !l.is_empty()) {
        Some("default") | None => Ok(()),
        Some(other) => Err(PipelineError::InvalidLayout(other.to_string())),
    }
}

/// Resolve an optional selector; empty or absent falls back to the
/// document root.
pub(crate) fn resolve_query(ctx: &Context, query: Option<&ValOrRef>) -> String {
    match query {
        Some(query) => {
            let resolved = query.resolve(ctx);
            if resolved.is_empty() {
                DEFAULT_QUERY.to_string()
            } else {
                resolved
            }
        }
        None => DEFAULT_QUERY.to_string(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Html2DomOp {
    pub from: String,
    pub to: String,
    /// CSS selector; the first match is converted. Defaults to `html`.
    pub query: Option<ValOrRef>,
    pub layout: Option<String>,
}

/// Parse `html` permissively and convert the first node matching the
/// CSS `selector` into a data subtree.
pub(crate) fn html_to_node(html: &str, selector: &str) -> Result<Node, PipelineError> {
    let document = Html::parse_document(html);
    let compiled = Selector::parse(selector)
        .map_err(|e| PipelineError::ParseValue(format!("selector '{selector}': {e}")))?;
    let Some(element) = document.select(&compiled).next() else {
        return Err(PipelineError::QueryMiss(selector.to_string()));
    };
    let mut root = IndexMap::new();
    convert_element(&mut root, element);
    Ok(Node::Container(root))
}

fn convert_element(parent: &mut IndexMap<String, Node>, element: ElementRef) {
    let name = element.value().name().to_string();
    let mut body = IndexMap::new();
    let attrs: IndexMap<String, Node> = element
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), Node::leaf(v)))
        .collect();
    if !attrs.is_empty() {
        body.insert(ATTRS_KEY.to_string(), Node::Container(attrs));
    }
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            convert_element(&mut body, child_element);
        } else if let Some(text) = child.value().as_text() {
            if !text.trim().is_empty() {
                body.insert(VALUE_KEY.to_string(), Node::leaf(text.to_string()));
            }
        }
    }
    insert_sibling(parent, name, Node::Container(body));
}

// a recurring sibling name turns the entry into a list
fn insert_sibling(parent: &mut IndexMap<String, Node>, name: String, node: Node) {
    match parent.get_mut(&name) {
        Some(Node::List(items)) => items.push(node),
        Some(existing) => {
            let first = existing.clone();
            *existing = Node::List(vec![first, node]);
        }
        None => {
            parent.insert(name, node);
        }
    }
}

impl Operation for Html2DomOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        let from = ctx.render_lenient(&self.from);
        let to = ctx.render_lenient(&self.to);
        if from.is_empty() {
            return Err(PipelineError::FieldEmpty("from"));
        }
        if to.is_empty() {
            return Err(PipelineError::FieldEmpty("to"));
        }
        check_layout(self.layout.as_deref())?;
        let query = resolve_query(ctx, self.query.as_ref());

        let html = {
            let tree = ctx.data();
            let node = tree.lookup(&parse_path(&from)?).cloned();
            match node.as_ref().and_then(Node::as_leaf) {
                Some(scalar) => scalar.to_string(),
                None => return Err(PipelineError::NotLeaf(from.clone())),
            }
        };
        let converted = html_to_node(&html, &query)?;
        let to_path = parse_path(&to)?;
        ctx.data_mut().set(&to_path, converted);
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        Html2DomOp {
            from: ctx.render_lenient(&self.from),
            to: ctx.render_lenient(&self.to),
            query: self.query.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl fmt::Display for Html2DomOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Html2Dom[from={},to={}", self.from, self.to)?;
        if let Some(query) = &self.query {
            write!(f, ",query={query}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[path = "html2dom_tests.rs"]
mod tests;
