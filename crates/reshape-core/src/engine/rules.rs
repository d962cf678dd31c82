//! Typed view over the entries of a mapping configuration

use crate::error::Result;
use crate::value::{Object, Value, ValueType};

/// Output path sub-key of a field rule
pub const FIELD_FIELD: &str = "field";
/// Coercion method sub-key of a field rule
pub const FIELD_METHOD: &str = "method";
/// Default value sub-key of a field rule
pub const FIELD_DEFAULT: &str = "default";
/// Required marker sub-key of a field rule
pub const FIELD_REQUIRED: &str = "required";
/// Expected type sub-key of a field rule
pub const FIELD_TYPE: &str = "type";

/// Mapping key listing fields the subject must carry
pub const CONTROL_REQUIRED: &str = "$required";
/// Subject key holding a list to convert element by element
pub const FIELD_ROOT: &str = "root";
/// Subject key holding a sort specification
pub const FIELD_ORDER_BY: &str = "orderBy";

/// How a mapping treats one key
#[derive(Debug, Clone, Copy)]
pub enum MappingEntry<'a> {
    /// Copy the value to the named output path
    Rename(&'a str),
    /// Apply a field rule
    Rule(FieldRule<'a>),
    /// No rename or rule for this key
    Unmapped,
}

impl<'a> MappingEntry<'a> {
    pub fn of(mapping: &'a Object, key: &str) -> Self {
        Self::from_value(mapping.get(key))
    }

    pub fn from_value(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::String(target)) => MappingEntry::Rename(target),
            Some(Value::Object(rule)) => MappingEntry::Rule(FieldRule::new(rule)),
            _ => MappingEntry::Unmapped,
        }
    }

    /// Output field name this entry maps to, if it names one
    pub fn target(&self) -> Result<Option<&'a str>> {
        match self {
            MappingEntry::Rename(target) => Ok(Some(*target)),
            MappingEntry::Rule(rule) => rule.field(),
            MappingEntry::Unmapped => Ok(None),
        }
    }
}

/// A mapping entry expressed as an object with `field`, `method`,
/// `default`, `required` and `type` sub-keys
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<'a> {
    rule: &'a Object,
}

impl<'a> FieldRule<'a> {
    pub fn new(rule: &'a Object) -> Self {
        Self { rule }
    }

    pub fn as_object(&self) -> &'a Object {
        self.rule
    }

    /// Output path, if the rule names one
    pub fn field(&self) -> Result<Option<&'a str>> {
        Ok(self.rule.get_str(FIELD_FIELD)?.map(String::as_str))
    }

    /// Output path, falling back to the source field name
    pub fn target_or(&self, source_field: &'a str) -> Result<&'a str> {
        Ok(self.field()?.unwrap_or(source_field))
    }

    pub fn method(&self) -> Result<Option<&'a str>> {
        Ok(self.rule.get_str(FIELD_METHOD)?.map(String::as_str))
    }

    /// Value substituted for a null source field
    pub fn default_value(&self) -> Option<&'a Value> {
        self.rule.get(FIELD_DEFAULT).filter(|v| !v.is_null())
    }

    /// Present with any non-null value, `false` included
    pub fn is_required(&self) -> bool {
        self.rule.is_set(FIELD_REQUIRED)
    }

    pub fn type_name(&self) -> Result<Option<&'a str>> {
        Ok(self.rule.get_str(FIELD_TYPE)?.map(String::as_str))
    }
}

/// Whether `subject[field]` has the runtime type named by `type_name`.
/// Unknown type names never match.
pub fn matches_type(subject: &Object, field: &str, type_name: &str) -> bool {
    ValueType::from_type_name(type_name)
        .map(|expected| subject.value_type(field) == expected)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::object_from_json;
    use serde_json::json;

    #[test]
    fn test_entry_kinds() {
        let mapping = object_from_json(json!({
            "name": "fullName",
            "active": {"field": "enabled", "method": "boolToInt"},
            "orderBy": true
        }))
        .unwrap();

        assert!(matches!(MappingEntry::of(&mapping, "name"), MappingEntry::Rename("fullName")));
        assert!(matches!(MappingEntry::of(&mapping, "active"), MappingEntry::Rule(_)));
        assert!(matches!(MappingEntry::of(&mapping, "orderBy"), MappingEntry::Unmapped));
        assert!(matches!(MappingEntry::of(&mapping, "missing"), MappingEntry::Unmapped));

        assert_eq!(MappingEntry::of(&mapping, "active").target().unwrap(), Some("enabled"));
    }

    #[test]
    fn test_required_flag() {
        let rule = object_from_json(json!({"required": true})).unwrap();
        assert!(FieldRule::new(&rule).is_required());

        let rule = object_from_json(json!({"required": "yes"})).unwrap();
        assert!(FieldRule::new(&rule).is_required());

        let rule = object_from_json(json!({"required": false})).unwrap();
        assert!(FieldRule::new(&rule).is_required());

        let rule = object_from_json(json!({"required": null})).unwrap();
        assert!(!FieldRule::new(&rule).is_required());
    }

    #[test]
    fn test_default_ignores_null() {
        let rule = object_from_json(json!({"default": null})).unwrap();
        assert!(FieldRule::new(&rule).default_value().is_none());

        let rule = object_from_json(json!({"default": 0})).unwrap();
        assert_eq!(FieldRule::new(&rule).default_value(), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_matches_type() {
        let subject = object_from_json(json!({
            "name": "Ada",
            "age": 36,
            "tags": ["a"],
            "rows": [{"x": 1}]
        }))
        .unwrap();

        assert!(matches_type(&subject, "name", "string"));
        assert!(matches_type(&subject, "age", "integer"));
        assert!(!matches_type(&subject, "age", "long"));
        assert!(matches_type(&subject, "tags", "stringarray"));
        assert!(matches_type(&subject, "rows", "arraylist"));
        assert!(!matches_type(&subject, "name", "text"));
        assert!(!matches_type(&subject, "missing", "string"));
    }

    #[test]
    fn test_method_must_be_text() {
        let rule = object_from_json(json!({"method": 5})).unwrap();
        assert!(FieldRule::new(&rule).method().is_err());
    }
}
