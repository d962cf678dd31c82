//! Conversion engine
//!
//! A [`Converter`] turns a subject [`Object`] into a new object according to a
//! mapping configuration, itself an [`Object`]. Mapping entries are either a
//! string (rename, with dot paths for nesting) or a field rule object with
//! `field`, `method`, `default`, `required` and `type` sub-keys.
//!
//! Two traversal strategies exist:
//!
//! - [`Strategy::SourceDriven`] walks the subject's fields ([`source`]).
//! - [`Strategy::MappingDriven`] walks the mapping's entries and applies
//!   default, required and type checks ([`mapping`]).
//!
//! A subject whose `root` key holds a list is converted element by element
//! and the results are returned under `root`. The first failing element
//! aborts the whole call.
//!
//! # Example
//!
//! ```
//! use reshape_core::{codec, Converter};
//!
//! let subject = codec::decode(r#"{"name": "Ada", "active": true}"#).unwrap();
//! let mapping = codec::decode(
//!     r#"{"name": "person.name", "active": {"field": "flag", "method": "boolToInt"}}"#,
//! ).unwrap();
//!
//! let out = Converter::shared()
//!     .convert(Some(&subject), Some(&mapping), false)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(codec::encode(&out).unwrap(), r#"{"person":{"name":"Ada"},"flag":1}"#);
//! ```

pub mod handlers;
pub mod inverter;
pub mod mapping;
pub mod ordering;
pub mod registry;
pub mod rules;
pub mod source;


use crate::error::{Error, Result};
use crate::value::{Object, Value};
use registry::{CoercionHandler, HandlerRegistry};
use rules::FIELD_ROOT;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

static SHARED: OnceLock<Converter> = OnceLock::new();

/// Which side of the conversion drives traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Iterate subject fields and look them up in the mapping
    #[default]
    SourceDriven,
    /// Iterate mapping entries and look them up in the subject
    MappingDriven,
}

/// Options for [`Converter::convert_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Copy subject fields the mapping does not mention
    pub include_all: bool,
    pub strategy: Strategy,
}

impl ConvertOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            include_all: false,
            strategy,
        }
    }

    pub fn include_all(mut self, include_all: bool) -> Self {
        self.include_all = include_all;
        self
    }
}

/// The conversion engine. Cheap to clone; the handler registry is shared
/// and never changes after [`ConverterBuilder::build`].
#[derive(Debug, Clone)]
pub struct Converter {
    registry: Arc<HandlerRegistry>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    /// A converter with the built-in handlers
    pub fn new() -> Self {
        Self {
            registry: Arc::new(HandlerRegistry::with_builtins()),
        }
    }

    /// Start configuring a converter with extra handlers
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// Process-wide converter with the built-in handlers, created on first use
    pub fn shared() -> &'static Converter {
        SHARED.get_or_init(Converter::new)
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Source-driven conversion.
    ///
    /// A missing subject yields `None`. A missing mapping yields a copy of the
    /// subject.
    pub fn convert(
        &self,
        subject: Option<&Object>,
        mapping: Option<&Object>,
        include_all: bool,
    ) -> Result<Option<Object>> {
        let Some(subject) = subject else {
            return Ok(None);
        };
        let Some(mapping) = mapping else {
            tracing::warn!("Conversion mapping was missing, copying subject");
            return Ok(Some(subject.clone()));
        };

        tracing::debug!(fields = subject.len(), rules = mapping.len(), include_all, "Converting subject");

        match root_list(subject) {
            Some(items) => {
                let converted = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let element = root_element(index, item)?;
                        source::convert_single(&self.registry, element, mapping, include_all)
                            .map(Value::Object)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(wrap_root(converted)))
            }
            None => source::convert_single(&self.registry, subject, mapping, include_all).map(Some),
        }
    }

    /// Mapping-driven conversion.
    ///
    /// Field rules with a `default` write it into `subject` when the field is
    /// null, so the subject is taken mutably.
    pub fn convert_by_mapping(
        &self,
        subject: Option<&mut Object>,
        mapping: Option<&Object>,
        include_all: bool,
    ) -> Result<Option<Object>> {
        let Some(subject) = subject else {
            return Ok(None);
        };
        let Some(mapping) = mapping else {
            tracing::warn!("Conversion mapping was missing, copying subject");
            return Ok(Some(subject.clone()));
        };

        tracing::debug!(fields = subject.len(), rules = mapping.len(), include_all, "Converting subject by mapping");

        match root_list_mut(subject) {
            Some(items) => {
                let converted = items
                    .iter_mut()
                    .enumerate()
                    .map(|(index, item)| {
                        let element = root_element_mut(index, item)?;
                        mapping::convert_single(&self.registry, element, mapping, include_all)
                            .map(Value::Object)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(wrap_root(converted)))
            }
            None => mapping::convert_single(&self.registry, subject, mapping, include_all).map(Some),
        }
    }

    /// Convert with an explicit strategy
    pub fn convert_with(
        &self,
        subject: Option<&mut Object>,
        mapping: Option<&Object>,
        options: ConvertOptions,
    ) -> Result<Option<Object>> {
        match options.strategy {
            Strategy::SourceDriven => self.convert(subject.as_deref(), mapping, options.include_all),
            Strategy::MappingDriven => self.convert_by_mapping(subject, mapping, options.include_all),
        }
    }

    /// Derive the reverse mapping using this converter's inverse table
    pub fn reverse_mapping(&self, mapping: &Object) -> Result<Object> {
        inverter::reverse_mapping(&self.registry, mapping)
    }
}

/// One-time configuration of a [`Converter`]'s handlers
pub struct ConverterBuilder {
    include_builtins: bool,
    handlers: Vec<(String, Option<String>, Arc<dyn CoercionHandler>)>,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Self {
            include_builtins: true,
            handlers: Vec::new(),
        }
    }

    /// Leave the built-in handlers out
    pub fn without_builtins(mut self) -> Self {
        self.include_builtins = false;
        self
    }

    /// Register a handler, optionally paired with an inverse method name
    pub fn register_handler(
        mut self,
        name: impl Into<String>,
        inverse: Option<&str>,
        handler: Arc<dyn CoercionHandler>,
    ) -> Self {
        self.handlers
            .push((name.into(), inverse.map(str::to_string), handler));
        self
    }

    /// Freeze the registry. Fails if a method name is registered twice.
    pub fn build(self) -> Result<Converter> {
        let mut registry = if self.include_builtins {
            HandlerRegistry::with_builtins()
        } else {
            HandlerRegistry::empty()
        };

        for (name, inverse, handler) in self.handlers {
            registry.register(name, inverse.as_deref(), handler)?;
        }

        Ok(Converter {
            registry: Arc::new(registry),
        })
    }
}

fn root_list(subject: &Object) -> Option<&Vec<Value>> {
    match subject.get(FIELD_ROOT) {
        Some(Value::List(items)) => Some(items),
        _ => None,
    }
}

fn root_list_mut(subject: &mut Object) -> Option<&mut Vec<Value>> {
    match subject.get_mut(FIELD_ROOT) {
        Some(Value::List(items)) => Some(items),
        _ => None,
    }
}

fn root_element(index: usize, item: &Value) -> Result<&Object> {
    item.as_object().ok_or_else(|| Error::InvalidListRoot {
        index,
        actual: item.value_type().to_string(),
    })
}

fn root_element_mut(index: usize, item: &mut Value) -> Result<&mut Object> {
    let actual = item.value_type();
    item.as_object_mut().ok_or_else(|| Error::InvalidListRoot {
        index,
        actual: actual.to_string(),
    })
}

fn wrap_root(items: Vec<Value>) -> Object {
    let mut output = Object::new();
    output.insert(FIELD_ROOT, Value::List(items));
    output
}
