//! Named coercion handlers and their inverse table
//!
//! A [`HandlerRegistry`] is filled once while a converter is being built and
//! is read-only afterwards. Inverse names are recorded in both directions, so
//! registering `a` with inverse `b` also makes `b`'s inverse `a`.

use crate::error::{Error, Result};
use crate::value::Object;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// A named field transform invoked by a mapping rule's `method`.
///
/// `source` is the subject tree, `output` the tree being built, `field` the
/// source field name (with any `#suffix` already removed) and `rule` the
/// mapping rule object. Handlers write through [`crate::value::set_field`].
pub trait CoercionHandler: Send + Sync {
    fn process(&self, source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()>;
}

impl<F> CoercionHandler for F
where
    F: Fn(&Object, &mut Object, &str, &Object) -> Result<()> + Send + Sync,
{
    fn process(&self, source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
        self(source, output, field, rule)
    }
}

/// Wrap a closure as a shareable handler
pub fn from_fn<F>(f: F) -> Arc<dyn CoercionHandler>
where
    F: Fn(&Object, &mut Object, &str, &Object) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Registry of coercion handlers keyed by method name
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn CoercionHandler>>,
    inverses: HashMap<String, String>,
}

impl HandlerRegistry {
    /// Create a registry with no handlers
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry holding the six built-in handlers
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        super::handlers::register_builtins(&mut registry);
        registry
    }

    /// Register a handler under `name`, optionally pairing it with an inverse.
    ///
    /// Fails when `name` is already taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        inverse: Option<&str>,
        handler: Arc<dyn CoercionHandler>,
    ) -> Result<()> {
        let name = name.into();

        if self.handlers.contains_key(&name) {
            return Err(Error::Configuration {
                message: format!("Handler '{}' is already registered", name),
            });
        }

        self.insert(name, inverse, handler);
        Ok(())
    }

    pub(super) fn insert(&mut self, name: String, inverse: Option<&str>, handler: Arc<dyn CoercionHandler>) {
        if let Some(inverse) = inverse {
            self.inverses.insert(name.clone(), inverse.to_string());
            self.inverses.insert(inverse.to_string(), name.clone());
        }

        tracing::debug!(method = %name, inverse = ?inverse, "Registered coercion handler");
        self.handlers.insert(name, handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn CoercionHandler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Registered inverse of a method, if any
    pub fn inverse_of(&self, name: &str) -> Option<&str> {
        self.inverses.get(name).map(String::as_str)
    }

    /// Method names with their inverse, sorted by name
    pub fn methods(&self) -> BTreeMap<&str, Option<&str>> {
        self.handlers
            .keys()
            .map(|name| (name.as_str(), self.inverse_of(name)))
            .collect()
    }

    /// Run the handler registered as `method` for `field`.
    ///
    /// Unknown methods fail with [`Error::MethodNotFound`].
    pub fn dispatch(
        &self,
        method: &str,
        source: &Object,
        output: &mut Object,
        field: &str,
        rule: &Object,
    ) -> Result<()> {
        let handler = self.get(method).ok_or_else(|| Error::MethodNotFound {
            method: method.to_string(),
            field: field.to_string(),
        })?;

        tracing::trace!(method, field, "Dispatching coercion handler");
        handler.process(source, output, field, rule)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}
