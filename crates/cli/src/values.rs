// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seeding the data tree: document `vars` and `--set` overrides

use anyhow::{bail, Context as _};
use tl_dom::{Node, Path};

/// Place document `vars` under the `vars` container.
pub fn apply_vars(
    tree: &mut Node,
    vars: Option<&serde_json::Map<String, serde_json::Value>>,
) -> anyhow::Result<()> {
    let Some(vars) = vars else {
        return Ok(());
    };
    let prefix = Path::parse("vars").context("vars prefix")?;
    for (key, value) in vars {
        tree.set(&prefix.child(key.as_str()), Node::from_plain(value));
    }
    Ok(())
}

/// Apply `key=value` pairs from `--set`; the key is a data-tree path.
pub fn apply_values(tree: &mut Node, values: &[String]) -> anyhow::Result<()> {
    for pair in values {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("invalid --set value '{pair}', expected key=value");
        };
        let path = Path::parse(key).with_context(|| format!("--set key '{key}'"))?;
        tree.set(&path, Node::leaf(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(tree: &Node, path: &str) -> Option<&Node> {
        tree.lookup(&Path::parse(path).unwrap())
    }

    #[test]
    fn vars_land_under_vars_container() {
        let mut tree = Node::container();
        let vars = match serde_json::json!({"ENV": "prod", "n": 3}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        apply_vars(&mut tree, Some(&vars)).unwrap();
        assert_eq!(lookup(&tree, "vars.ENV"), Some(&Node::leaf("prod")));
        assert_eq!(lookup(&tree, "vars.n"), Some(&Node::leaf(3i64)));
    }

    #[test]
    fn set_values_use_path_keys() {
        let mut tree = Node::container();
        apply_values(
            &mut tree,
            &["a.b=1".to_string(), "c=x=y".to_string()],
        )
        .unwrap();
        assert_eq!(lookup(&tree, "a.b"), Some(&Node::leaf("1")));
        // only the first '=' separates key from value
        assert_eq!(lookup(&tree, "c"), Some(&Node::leaf("x=y")));
    }

    #[test]
    fn malformed_set_value_fails() {
        let mut tree = Node::container();
        assert!(apply_values(&mut tree, &["nodelimiter".to_string()]).is_err());
    }
}
