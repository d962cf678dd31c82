//! Derive the reverse of a mapping configuration

use super::registry::HandlerRegistry;
use super::rules::{FieldRule, CONTROL_REQUIRED, FIELD_FIELD, FIELD_METHOD};
use crate::error::Result;
use crate::value::{Object, Value};

/// Build the mapping that converts output trees back into subjects.
///
/// A rename `k -> v` becomes `v -> k`. A rule keyed `k` with `field: f` is
/// re-keyed under `f`, keeps its other sub-keys, points `field` back at `k`,
/// and swaps `method` for its registered inverse (null when there is none).
/// `$required` is dropped. A rule whose `field` or `method` is not text fails
/// with `TypeMismatch`, as it would during conversion.
pub fn reverse_mapping(registry: &HandlerRegistry, mapping: &Object) -> Result<Object> {
    let mut reversed = Object::new();

    for (key, entry) in mapping.iter() {
        if key == CONTROL_REQUIRED {
            continue;
        }

        match entry {
            Value::String(target) => {
                reversed.insert(target.clone(), key);
            }
            Value::Object(rule) => {
                let forward = FieldRule::new(rule);
                let target = forward.field()?.unwrap_or(key);
                let inverse_method = forward
                    .method()?
                    .and_then(|m| registry.inverse_of(m))
                    .map(str::to_string);

                let mut inverse = rule.clone();
                inverse.insert(FIELD_FIELD, key);
                inverse.insert(FIELD_METHOD, inverse_method);

                reversed.insert(target, inverse);
            }
            _ => {}
        }
    }

    Ok(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::object_from_json;
    use serde_json::json;

    #[test]
    fn test_renames_are_flipped() {
        let registry = HandlerRegistry::with_builtins();
        let mapping = object_from_json(json!({"name": "fullName", "city": "address.city"})).unwrap();

        let reversed = reverse_mapping(&registry, &mapping).unwrap();
        assert_eq!(
            reversed,
            object_from_json(json!({"fullName": "name", "address.city": "city"})).unwrap()
        );
    }

    #[test]
    fn test_rules_use_inverse_method() {
        let registry = HandlerRegistry::with_builtins();
        let mapping = object_from_json(json!({
            "$required": ["active"],
            "active": {"field": "is_active", "method": "boolToInt", "type": "boolean"}
        }))
        .unwrap();

        let reversed = reverse_mapping(&registry, &mapping).unwrap();

        assert!(!reversed.contains_key("$required"));
        let rule = reversed.get_object("is_active").unwrap().unwrap();
        assert_eq!(rule.get("field"), Some(&Value::from("active")));
        assert_eq!(rule.get("method"), Some(&Value::from("intToBool")));
        assert_eq!(rule.get("type"), Some(&Value::from("boolean")));
    }

    #[test]
    fn test_unregistered_method_inverts_to_null() {
        let registry = HandlerRegistry::with_builtins();
        let mapping = object_from_json(json!({"x": {"field": "y", "method": "custom"}})).unwrap();

        let reversed = reverse_mapping(&registry, &mapping).unwrap();
        let rule = reversed.get_object("y").unwrap().unwrap();
        assert!(rule.contains_key("method"));
        assert!(!rule.is_set("method"));
    }

    #[test]
    fn test_non_text_rule_keys_fail() {
        let registry = HandlerRegistry::with_builtins();

        let mapping = object_from_json(json!({"x": {"field": 3}})).unwrap();
        let err = reverse_mapping(&registry, &mapping).unwrap_err();
        assert!(matches!(err, crate::error::Error::TypeMismatch { .. }));

        let mapping = object_from_json(json!({"x": {"field": "y", "method": ["boolToInt"]}})).unwrap();
        assert!(reverse_mapping(&registry, &mapping).is_err());
    }
}
