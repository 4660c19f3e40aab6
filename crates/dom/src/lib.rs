// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tl-dom: hierarchical data model for the treeline pipeline engine
//!
//! The data tree ("DOM") is a tree of [`Node`]s: containers (keyed, ordered),
//! lists and scalar leaves. Nodes are addressed by dotted [`Path`]s with
//! bracket list indexing (`a.b[2].c`) and escaped-dot literals (`a.b\.c`).
//! The crate also carries the file-format codecs (YAML, JSON, properties,
//! text) used to move subtrees in and out of the DOM.

pub mod codec;
mod error;
pub mod node;
pub mod path;
pub mod props;

pub use codec::{decode, decode_str, encode, encode_to_string, Format};
pub use error::DomError;
pub use node::{Node, Scalar};
pub use path::{Path, Segment};
