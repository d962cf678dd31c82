//! Mapping-driven conversion: walk the mapping's entries and pull each one
//! from the subject.
//!
//! The mapping is the authoritative list of output fields. Field rules may
//! substitute a `default`, enforce `required`, and check `type` before the
//! value is written or handed to a coercion method. A `#suffix` on a mapping
//! key is dropped to find the source field, so one source field can feed
//! several rules.

use super::ordering;
use super::registry::HandlerRegistry;
use super::rules::{matches_type, FieldRule, CONTROL_REQUIRED, FIELD_ORDER_BY};
use crate::error::{Error, Result};
use crate::value::path::strip_suffix;
use crate::value::{set_field, Object, Value};

/// Convert one subject object.
///
/// Defaults are written into `subject` itself before the field is processed.
pub fn convert_single(
    registry: &HandlerRegistry,
    subject: &mut Object,
    mapping: &Object,
    include_all: bool,
) -> Result<Object> {
    let mut output = Object::new();

    for (key, entry) in mapping.iter() {
        if key == CONTROL_REQUIRED {
            continue;
        }

        match entry {
            Value::String(target) => set_field(&mut output, target, subject.get_or_null(key)),
            Value::Object(rule) => {
                apply_rule(registry, subject, &mut output, strip_suffix(key), FieldRule::new(rule))?
            }
            _ if include_all => {
                if key == FIELD_ORDER_BY {
                    ordering::apply(subject, mapping, &mut output)?;
                } else {
                    output.insert(key, subject.get_or_null(key));
                }
            }
            _ => {}
        }
    }

    Ok(output)
}

fn apply_rule(
    registry: &HandlerRegistry,
    subject: &mut Object,
    output: &mut Object,
    field: &str,
    rule: FieldRule<'_>,
) -> Result<()> {
    if let Some(default) = rule.default_value() {
        if subject.is_null(field) {
            tracing::trace!(field, "Substituting default value");
            subject.insert(field, default.clone());
        }
    }

    if rule.is_required() && subject.is_null(field) {
        return Err(Error::RequiredField {
            field: field.to_string(),
        });
    }

    if let Some(type_name) = rule.type_name()? {
        if !matches_type(subject, field, type_name) {
            return Err(Error::TypeValidation {
                field: field.to_string(),
                expected: type_name.to_string(),
            });
        }
    }

    match rule.method()? {
        Some(method) => registry.dispatch(method, subject, output, field, rule.as_object()),
        None => {
            set_field(output, rule.target_or(field)?, subject.get_or_null(field));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::object_from_json;
    use serde_json::json;

    fn obj(value: serde_json::Value) -> Object {
        object_from_json(value).unwrap()
    }

    #[test]
    fn test_mapping_order_drives_output() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"a": 1, "b": 2}));
        let mapping = object_from_json_ordered(&[("b", json!("second")), ("a", json!("first"))]);

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn test_absent_renamed_field_is_written_as_null() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = Object::new();
        let mapping = obj(json!({"name": "fullName"}));

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert!(out.contains_key("fullName"));
        assert!(!out.is_set("fullName"));
    }

    #[test]
    fn test_default_fills_absent_and_mutates_subject() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"name": "Ada"}));
        let mapping = obj(json!({"count": {"field": "stats.count", "default": 0}}));

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();

        let stats = out.get_object("stats").unwrap().unwrap();
        assert_eq!(stats.get("count"), Some(&Value::Integer(0)));
        assert_eq!(subject.get("count"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_explicit_value_beats_default() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"count": 9}));
        let mapping = obj(json!({"count": {"field": "total", "default": 0}}));

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert_eq!(out.get("total"), Some(&Value::Integer(9)));
    }

    #[test]
    fn test_required_fails_per_field() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"name": null}));
        let mapping = obj(json!({
            "name": {"field": "n", "required": true},
            "id": {"field": "i", "required": true}
        }));

        let err = convert_single(&registry, &mut subject, &mapping, false).unwrap_err();
        assert!(matches!(err, Error::RequiredField { .. }));
        assert!(err.to_string().ends_with("IS Required"));
        assert_eq!(err.code(), Some(415));
    }

    #[test]
    fn test_required_false_still_requires_field() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = Object::new();
        let mapping = obj(json!({"id": {"field": "i", "required": false}}));

        let err = convert_single(&registry, &mut subject, &mapping, false).unwrap_err();
        assert!(matches!(err, Error::RequiredField { .. }));
        assert_eq!(err.to_string(), "id IS Required");
    }

    #[test]
    fn test_default_satisfies_required() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = Object::new();
        let mapping = obj(json!({"status": {"field": "s", "required": true, "default": "new"}}));

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert_eq!(out.get("s"), Some(&Value::from("new")));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"age": "36"}));
        let mapping = obj(json!({"age": {"field": "a", "type": "integer"}}));

        let err = convert_single(&registry, &mut subject, &mapping, false).unwrap_err();
        assert_eq!(err.to_string(), "age Expected Type integer");
    }

    #[test]
    fn test_unknown_type_name_always_fails() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"age": 36}));
        let mapping = obj(json!({"age": {"field": "a", "type": "number"}}));

        let err = convert_single(&registry, &mut subject, &mapping, false).unwrap_err();
        assert!(matches!(err, Error::TypeValidation { .. }));
    }

    #[test]
    fn test_suffix_lets_one_field_feed_two_rules() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"active": true}));
        let mapping = obj(json!({
            "active": {"field": "enabled"},
            "active#asInt": {"field": "enabledFlag", "method": "boolToInt"}
        }));

        let out = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert_eq!(out.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(out.get("enabledFlag"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_unknown_method_fails_with_stripped_field() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"active": true}));
        let mapping = obj(json!({"active#x": {"field": "e", "method": "nope"}}));

        let err = convert_single(&registry, &mut subject, &mapping, false).unwrap_err();
        assert_eq!(err.to_string(), "Method <nope> for Field <active> Does Not Exist");
    }

    #[test]
    fn test_include_all_uses_marker_entries() {
        let registry = HandlerRegistry::with_builtins();
        let mut subject = obj(json!({"name": "Ada", "page": 2, "orderBy": ["-name"]}));
        let mapping = obj(json!({
            "$required": ["name"],
            "name": {"field": "full_name"},
            "page": true,
            "orderBy": true
        }));

        let out = convert_single(&registry, &mut subject, &mapping, true).unwrap();
        assert_eq!(out.get("page"), Some(&Value::Integer(2)));
        assert_eq!(out.get("orderBy"), Some(&Value::StringArray(vec!["-full_name".to_string()])));
        assert!(!out.contains_key("$required"));

        let without = convert_single(&registry, &mut subject, &mapping, false).unwrap();
        assert!(!without.contains_key("page"));
    }

    fn object_from_json_ordered(entries: &[(&str, serde_json::Value)]) -> Object {
        entries
            .iter()
            .map(|(k, v)| (*k, crate::codec::from_json(v.clone()).unwrap()))
            .collect()
    }
}
