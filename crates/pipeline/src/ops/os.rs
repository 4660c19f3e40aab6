// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Os: bundle of filesystem primitives
//!
//! Sub-fields execute in declaration order: mkdir, chdir, chmod, getcwd,
//! hostname, link, remove, rename, touch, userhome, readdir, stat, copy.
//! The query-like members write their result under `storeTo`.

use crate::model::ValOrRef;
use crate::ops::{parse_path, Operation};
use crate::{Context, PipelineError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::{SystemTime, UNIX_EPOCH};
use tl_dom::Node;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsMkdir {
    pub path: ValOrRef,
    pub mode: Option<u32>,
    pub recursive: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPathArg {
    pub path: ValOrRef,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsChmod {
    pub path: ValOrRef,
    pub mode: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsStore {
    pub store_to: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsLink {
    pub from: ValOrRef,
    pub to: ValOrRef,
    pub symbolic: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsRemove {
    pub path: ValOrRef,
    pub recursive: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsFromTo {
    pub from: ValOrRef,
    pub to: ValOrRef,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsQuery {
    pub path: ValOrRef,
    pub store_to: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OsOp {
    pub mkdir: Option<OsMkdir>,
    pub chdir: Option<OsPathArg>,
    pub chmod: Option<OsChmod>,
    pub getcwd: Option<OsStore>,
    pub hostname: Option<OsStore>,
    pub link: Option<OsLink>,
    pub remove: Option<OsRemove>,
    pub rename: Option<OsFromTo>,
    pub touch: Option<OsPathArg>,
    pub userhome: Option<OsStore>,
    pub readdir: Option<OsQuery>,
    pub stat: Option<OsQuery>,
    pub copy: Option<OsFromTo>,
}

fn io_err(what: &str, path: &str, e: std::io::Error) -> PipelineError {
    PipelineError::io(format!("{what} '{path}'"), e)
}

fn store(ctx: &Context, store_to: &str, node: Node) -> Result<(), PipelineError> {
    let path = parse_path(&ctx.render_lenient(store_to))?;
    ctx.data_mut().set(&path, node);
    Ok(())
}

fn epoch_seconds(t: SystemTime) -> i64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

impl OsOp {
    fn run_mkdir(&self, ctx: &Context, spec: &OsMkdir) -> Result<(), PipelineError> {
        let path = spec.path.resolve(ctx);
        ctx.log(&[format!("mkdir: creating directory {path}")]);
        if spec.recursive.unwrap_or(false) {
            fs::create_dir_all(&path).map_err(|e| io_err("mkdir", &path, e))?;
        } else {
            fs::create_dir(&path).map_err(|e| io_err("mkdir", &path, e))?;
        }
        if let Some(mode) = spec.mode {
            fs::set_permissions(&path, fs::Permissions::from_mode(mode))
                .map_err(|e| io_err("chmod", &path, e))?;
        }
        Ok(())
    }

    fn run_remove(&self, ctx: &Context, spec: &OsRemove) -> Result<(), PipelineError> {
        let path = spec.path.resolve(ctx);
        ctx.log(&[format!("remove: {path}")]);
        let meta = fs::symlink_metadata(&path).map_err(|e| io_err("stat", &path, e))?;
        if meta.is_dir() {
            if spec.recursive.unwrap_or(false) {
                fs::remove_dir_all(&path).map_err(|e| io_err("remove", &path, e))
            } else {
                fs::remove_dir(&path).map_err(|e| io_err("remove", &path, e))
            }
        } else {
            fs::remove_file(&path).map_err(|e| io_err("remove", &path, e))
        }
    }

    fn run_readdir(&self, ctx: &Context, spec: &OsQuery) -> Result<(), PipelineError> {
        let path = spec.path.resolve(ctx);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&path).map_err(|e| io_err("readdir", &path, e))? {
            let entry = entry.map_err(|e| io_err("readdir", &path, e))?;
            let meta = entry.metadata().map_err(|e| io_err("stat", &path, e))?;
            entries.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "dir": meta.is_dir(),
                "size": meta.len(),
            }));
        }
        entries.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
        store(ctx, &spec.store_to, Node::from_plain(&json!(entries)))
    }

    fn run_stat(&self, ctx: &Context, spec: &OsQuery) -> Result<(), PipelineError> {
        let path = spec.path.resolve(ctx);
        let meta = fs::metadata(&path).map_err(|e| io_err("stat", &path, e))?;
        let mtime = meta.modified().map(epoch_seconds).unwrap_or(0);
        store(
            ctx,
            &spec.store_to,
            Node::from_plain(&json!({
                "mode": meta.permissions().mode() & 0o7777,
                "size": meta.len(),
                "mtime": mtime,
            })),
        )
    }

    fn run_copy(&self, ctx: &Context, spec: &OsFromTo) -> Result<(), PipelineError> {
        let from = spec.from.resolve(ctx);
        let to = spec.to.resolve(ctx);
        ctx.log(&[format!("copy: {from} -> {to}")]);
        let meta = fs::metadata(&from).map_err(|e| io_err("stat", &from, e))?;
        if !meta.is_dir() {
            fs::copy(&from, &to).map_err(|e| io_err("copy", &from, e))?;
            return Ok(());
        }
        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry.map_err(|e| {
                PipelineError::io(format!("walk '{from}'"), e.into())
            })?;
            let rel = entry
                .path()
                .strip_prefix(&from)
                .unwrap_or_else(|_| entry.path());
            let target = std::path::Path::new(&to).join(rel);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| io_err("mkdir", &target.to_string_lossy(), e))?;
            } else {
                fs::copy(entry.path(), &target)
                    .map_err(|e| io_err("copy", &target.to_string_lossy(), e))?;
            }
        }
        Ok(())
    }
}

impl Operation for OsOp {
    fn run(&self, ctx: &Context) -> Result<(), PipelineError> {
        if let Some(spec) = &self.mkdir {
            self.run_mkdir(ctx, spec)?;
        }
        if let Some(spec) = &self.chdir {
            let path = spec.path.resolve(ctx);
            ctx.log(&[format!("chdir: changing directory to {path}")]);
            std::env::set_current_dir(&path).map_err(|e| io_err("chdir", &path, e))?;
        }
        if let Some(spec) = &self.chmod {
            let path = spec.path.resolve(ctx);
            ctx.log(&[format!("chmod: changing mode of {path} to {:o}", spec.mode)]);
            fs::set_permissions(&path, fs::Permissions::from_mode(spec.mode))
                .map_err(|e| io_err("chmod", &path, e))?;
        }
        if let Some(spec) = &self.getcwd {
            let cwd = std::env::current_dir().map_err(|e| io_err("getcwd", ".", e))?;
            store(ctx, &spec.store_to, Node::leaf(cwd.to_string_lossy().into_owned()))?;
        }
        if let Some(spec) = &self.hostname {
            let name = hostname::get().map_err(|e| io_err("hostname", "", e))?;
            store(ctx, &spec.store_to, Node::leaf(name.to_string_lossy().into_owned()))?;
        }
        if let Some(spec) = &self.link {
            let from = spec.from.resolve(ctx);
            let to = spec.to.resolve(ctx);
            if spec.symbolic.unwrap_or(false) {
                std::os::unix::fs::symlink(&from, &to).map_err(|e| io_err("symlink", &to, e))?;
            } else {
                fs::hard_link(&from, &to).map_err(|e| io_err("link", &to, e))?;
            }
        }
        if let Some(spec) = &self.remove {
            self.run_remove(ctx, spec)?;
        }
        if let Some(spec) = &self.rename {
            let from = spec.from.resolve(ctx);
            let to = spec.to.resolve(ctx);
            fs::rename(&from, &to).map_err(|e| io_err("rename", &from, e))?;
        }
        if let Some(spec) = &self.touch {
            let path = spec.path.resolve(ctx);
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| io_err("touch", &path, e))?;
            file.set_modified(SystemTime::now())
                .map_err(|e| io_err("touch", &path, e))?;
        }
        if let Some(spec) = &self.userhome {
            let home = dirs::home_dir().unwrap_or_default();
            store(ctx, &spec.store_to, Node::leaf(home.to_string_lossy().into_owned()))?;
        }
        if let Some(spec) = &self.readdir {
            self.run_readdir(ctx, spec)?;
        }
        if let Some(spec) = &self.stat {
            self.run_stat(ctx, spec)?;
        }
        if let Some(spec) = &self.copy {
            self.run_copy(ctx, spec)?;
        }
        Ok(())
    }

    fn clone_with(&self, ctx: &Context) -> Self {
        let val = |v: &ValOrRef| v.clone_with(ctx);
        let dest = |s: &OsStore| OsStore {
            store_to: ctx.render_lenient(&s.store_to),
        };
        OsOp {
            mkdir: self.mkdir.as_ref().map(|s| OsMkdir {
                path: val(&s.path),
                mode: s.mode,
                recursive: s.recursive,
            }),
            chdir: self.chdir.as_ref().map(|s| OsPathArg { path: val(&s.path) }),
            chmod: self.chmod.as_ref().map(|s| OsChmod {
                path: val(&s.path),
                mode: s.mode,
            }),
            getcwd: self.getcwd.as_ref().map(&dest),
            hostname: self.hostname.as_ref().map(&dest),
            link: self.link.as_ref().map(|s| OsLink {
                from: val(&s.from),
                to: val(&s.to),
                symbolic: s.symbolic,
            }),
            remove: self.remove.as_ref().map(|s| OsRemove {
                path: val(&s.path),
                recursive: s.recursive,
            }),
            rename: self.rename.as_ref().map(|s| OsFromTo {
                from: val(&s.from),
                to: val(&s.to),
            }),
            touch: self.touch.as_ref().map(|s| OsPathArg { path: val(&s.path) }),
            userhome: self.userhome.as_ref().map(&dest),
            readdir: self.readdir.as_ref().map(|s| OsQuery {
                path: val(&s.path),
                store_to: ctx.render_lenient(&s.store_to),
            }),
            stat: self.stat.as_ref().map(|s| OsQuery {
                path: val(&s.path),
                store_to: ctx.render_lenient(&s.store_to),
            }),
            copy: self.copy.as_ref().map(|s| OsFromTo {
                from: val(&s.from),
                to: val(&s.to),
            }),
        }
    }
}

impl fmt::Display for OsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(m) = &self.mkdir {
            parts.push(format!("mkdir[{}]", m.path));
        }
        if let Some(c) = &self.chdir {
            parts.push(format!("chdir[{}]", c.path));
        }
        if let Some(c) = &self.chmod {
            parts.push(format!("chmod[{}]", c.path));
        }
        if self.getcwd.is_some() {
            parts.push("getcwd".to_string());
        }
        if self.hostname.is_some() {
            parts.push("hostname".to_string());
        }
        if let Some(l) = &self.link {
            parts.push(format!("link[{}->{}]", l.from, l.to));
        }
        if let Some(r) = &self.remove {
            parts.push(format!("remove[{}]", r.path));
        }
        if let Some(r) = &self.rename {
            parts.push(format!("rename[{}->{}]", r.from, r.to));
        }
        if let Some(t) = &self.touch {
            parts.push(format!("touch[{}]", t.path));
        }
        if self.userhome.is_some() {
            parts.push("userhome".to_string());
        }
        if let Some(r) = &self.readdir {
            parts.push(format!("readdir[{}]", r.path));
        }
        if let Some(s) = &self.stat {
            parts.push(format!("stat[{}]", s.path));
        }
        if let Some(c) = &self.copy {
            parts.push(format!("copy[{}->{}]", c.from, c.to));
        }
        write!(f, "OS[{}]", parts.join(","))
    }
}

#[cfg(test)]
#[path = "os_tests.rs"]
mod tests;
