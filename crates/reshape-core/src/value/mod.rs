//! Dynamic value model the conversion engine operates on
//!
//! A [`Value`] is a closed tagged union over the runtime types a subject or a
//! mapping configuration can hold. [`Object`] is the insertion-ordered map at
//! the heart of both. Typed accessors on [`Object`] return a
//! [`Error::TypeMismatch`] instead of guessing when the stored variant differs.

pub mod path;

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::fmt;

pub use path::set_field;

/// A single node of a dynamic value tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    String(String),
    DateTime(DateTime<FixedOffset>),
    Object(Object),
    List(Vec<Value>),
    StringArray(Vec<String>),
}

/// Runtime type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Long,
    Double,
    String,
    DateTime,
    Object,
    ArrayList,
    StringArray,
}

impl ValueType {
    /// Stable lowercase name, as used by `type` rules
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::DateTime => "datetime",
            ValueType::Object => "object",
            ValueType::ArrayList => "arraylist",
            ValueType::StringArray => "stringarray",
        }
    }

    /// Resolve a `type` rule name. Only the names a mapping may validate
    /// against are recognised.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ValueType::String),
            "integer" => Some(ValueType::Integer),
            "long" => Some(ValueType::Long),
            "object" => Some(ValueType::Object),
            "boolean" => Some(ValueType::Boolean),
            "arraylist" => Some(ValueType::ArrayList),
            "stringarray" => Some(ValueType::StringArray),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Runtime type of this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::DateTime(_) => ValueType::DateTime,
            Value::Object(_) => ValueType::Object,
            Value::List(_) => ValueType::ArrayList,
            Value::StringArray(_) => ValueType::StringArray,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Entries of a string array, also accepting a list made only of strings
    pub fn as_str_entries(&self) -> Option<Vec<&str>> {
        match self {
            Value::StringArray(items) => Some(items.iter().map(String::as_str).collect()),
            Value::List(items) => items.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StringArray(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Insertion-ordered map of field name to [`Value`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    fields: IndexMap<String, Value>,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $expected:expr) => {
        $(#[$doc])*
        pub fn $name(&self, key: &str) -> Result<Option<$ty>> {
            match self.fields.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::$variant(v)) => Ok(Some(v)),
                Some(other) => Err(self.mismatch(key, $expected, other)),
            }
        }
    };
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields.get_mut(key)
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Runtime type of a field; absent fields report [`ValueType::Null`]
    pub fn value_type(&self, key: &str) -> ValueType {
        self.fields
            .get(key)
            .map(Value::value_type)
            .unwrap_or(ValueType::Null)
    }

    /// Present and not null
    pub fn is_set(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(v) if !v.is_null())
    }

    /// Absent or null
    pub fn is_null(&self, key: &str) -> bool {
        !self.is_set(key)
    }

    /// Value of a field, with absent fields read as [`Value::Null`]
    pub fn get_or_null(&self, key: &str) -> Value {
        self.fields.get(key).cloned().unwrap_or(Value::Null)
    }

    typed_getter!(get_str, String, &String, ValueType::String);
    typed_getter!(get_i32, Integer, &i32, ValueType::Integer);
    typed_getter!(get_i64, Long, &i64, ValueType::Long);
    typed_getter!(get_bool, Bool, &bool, ValueType::Boolean);
    typed_getter!(get_object, Object, &Object, ValueType::Object);
    typed_getter!(get_list, List, &Vec<Value>, ValueType::ArrayList);
    typed_getter!(get_string_array, StringArray, &Vec<String>, ValueType::StringArray);
    typed_getter!(get_datetime, DateTime, &DateTime<FixedOffset>, ValueType::DateTime);

    /// Return the nested object at `key`, replacing any non-object value
    /// with a fresh empty object first.
    pub fn object_entry(&mut self, key: &str) -> &mut Object {
        let slot = self
            .fields
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Object::new()));

        if !matches!(slot, Value::Object(_)) {
            *slot = Value::Object(Object::new());
        }

        match slot {
            Value::Object(obj) => obj,
            _ => unreachable!("slot was just replaced with an object"),
        }
    }

    fn mismatch(&self, key: &str, expected: ValueType, actual: &Value) -> Error {
        Error::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual: actual.value_type().to_string(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
