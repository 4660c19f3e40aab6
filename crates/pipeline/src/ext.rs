// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extensibility surface: action factories and pluggable services
//!
//! The callable registry (`define`/`call`) lives on the context; this module
//! carries the traits a host implements to extend the engine.

use crate::model::ActionSpec;
use crate::{Context, PipelineError};

/// Factory behind the `ext` operation: materializes an action for the
/// given plain-value arguments.
pub trait ActionFactory {
    fn for_args(
        &self,
        ctx: &Context,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> ActionSpec;
}

/// Named lifecycle object registered on the context. Providers own the
/// semantics; the engine only guarantees `init` on registration and `close`
/// on teardown.
pub trait Service {
    fn init(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}
