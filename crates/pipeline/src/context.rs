// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-execution context: data tree, snapshot, engine, registries
//!
//! The snapshot is a cached plain-value view of the data tree consumed by
//! the template engine. Mutating the tree through [`Context::data_mut`]
//! drops the cache, so the next render observes the mutation. The context
//! is single-threaded by design; it must not be shared between concurrent
//! callers.

use crate::executor::Executor;
use crate::ext::{ActionFactory, Service};
use crate::listener::{Listener, NullListener};
use crate::model::ActionSpec;
use crate::PipelineError;
use indexmap::IndexMap;
use serde_json::Value;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use tl_dom::Node;
use tl_template::TemplateEngine;

pub struct Context {
    data: RefCell<Node>,
    snapshot: RefCell<Option<Rc<Value>>>,
    engine: TemplateEngine,
    listener: Box<dyn Listener>,
    callables: RefCell<IndexMap<String, ActionSpec>>,
    factories: RefCell<IndexMap<String, Rc<dyn ActionFactory>>>,
    services: RefCell<IndexMap<String, Box<dyn Service>>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Node::container())
    }
}

impl Context {
    /// Context over a caller-provided data tree.
    pub fn new(data: Node) -> Self {
        Context {
            data: RefCell::new(data),
            snapshot: RefCell::new(None),
            engine: TemplateEngine::new(),
            listener: Box::new(NullListener),
            callables: RefCell::new(IndexMap::new()),
            factories: RefCell::new(IndexMap::new()),
            services: RefCell::new(IndexMap::new()),
        }
    }

    pub fn with_listener(mut self, listener: Box<dyn Listener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_engine(mut self, engine: TemplateEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Read access to the data tree.
    pub fn data(&self) -> Ref<'_, Node> {
        self.data.borrow()
    }

    /// Write access to the data tree. Taking the guard invalidates the
    /// snapshot, so invalidation cannot be forgotten by a new operation.
    pub fn data_mut(&self) -> RefMut<'_, Node> {
        self.invalidate_snapshot();
        self.data.borrow_mut()
    }

    /// Hand the data tree back to the caller.
    pub fn into_data(self) -> Node {
        self.data.into_inner()
    }

    /// The cached plain-value view of the data tree.
    pub fn snapshot(&self) -> Rc<Value> {
        let mut cache = self.snapshot.borrow_mut();
        match cache.as_ref() {
            Some(snapshot) => Rc::clone(snapshot),
            None => {
                let rebuilt = Rc::new(self.data.borrow().to_plain());
                *cache = Some(Rc::clone(&rebuilt));
                rebuilt
            }
        }
    }

    /// Drop the cached snapshot; the next [`Context::snapshot`] rebuilds.
    pub fn invalidate_snapshot(&self) {
        self.snapshot.borrow_mut().take();
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Re-entrant dispatch handle for nested action execution.
    pub fn executor(&self) -> Executor<'_> {
        Executor::new(self)
    }

    pub(crate) fn listener(&self) -> &dyn Listener {
        self.listener.as_ref()
    }

    /// Emit a log record to the listener, mirrored to `tracing`.
    pub fn log(&self, values: &[String]) {
        tracing::debug!(target: "tl_pipeline", "{}", values.join(" "));
        self.listener.on_log(values);
    }

    /// Lenient render of `template` against the current snapshot.
    pub fn render_lenient(&self, template: &str) -> String {
        self.engine.render_lenient(template, &self.snapshot())
    }

    // --- callable registry -------------------------------------------------

    /// Register a callable. Redefining a name fails.
    pub fn define_action(&self, name: &str, action: ActionSpec) -> Result<(), PipelineError> {
        let mut callables = self.callables.borrow_mut();
        if callables.contains_key(name) {
            return Err(PipelineError::AlreadyDefined(name.to_string()));
        }
        callables.insert(name.to_string(), action);
        Ok(())
    }

    pub fn get_action(&self, name: &str) -> Option<ActionSpec> {
        self.callables.borrow().get(name).cloned()
    }

    // --- action-factory registry -------------------------------------------

    pub fn register_action_factory(&self, name: &str, factory: Rc<dyn ActionFactory>) {
        self.factories.borrow_mut().insert(name.to_string(), factory);
    }

    pub fn get_action_factory(&self, name: &str) -> Option<Rc<dyn ActionFactory>> {
        self.factories.borrow().get(name).cloned()
    }

    // --- service registry --------------------------------------------------

    /// Register and initialize a named service. Its lifetime is bound to
    /// this context; [`Context::close_services`] tears it down.
    pub fn register_service(
        &self,
        name: &str,
        mut service: Box<dyn Service>,
    ) -> Result<(), PipelineError> {
        service.init()?;
        self.services.borrow_mut().insert(name.to_string(), service);
        Ok(())
    }

    pub fn has_service(&self, name: &str) -> bool {
        self.services.borrow().contains_key(name)
    }

    /// Run `f` against the named service, if registered.
    pub fn with_service<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut dyn Service) -> R,
    ) -> Option<R> {
        self.services
            .borrow_mut()
            .get_mut(name)
            .map(|service| f(service.as_mut()))
    }

    /// Close all registered services in reverse registration order.
    pub fn close_services(&self) -> Result<(), PipelineError> {
        let mut services = self.services.borrow_mut();
        while let Some((_, mut service)) = services.pop() {
            service.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
