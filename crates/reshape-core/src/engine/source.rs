//! Source-driven conversion: walk the subject's fields and look each one up
//! in the mapping.

use super::ordering;
use super::registry::HandlerRegistry;
use super::rules::{MappingEntry, CONTROL_REQUIRED, FIELD_ORDER_BY};
use crate::error::{Error, Result};
use crate::value::{set_field, Object};

/// Convert one subject object.
///
/// `$required` is checked up front and every missing field is reported in a
/// single error.
pub fn convert_single(
    registry: &HandlerRegistry,
    subject: &Object,
    mapping: &Object,
    include_all: bool,
) -> Result<Object> {
    check_required(subject, mapping)?;

    let mut output = Object::new();

    for (field, value) in subject.iter() {
        match MappingEntry::of(mapping, field) {
            MappingEntry::Rename(target) => set_field(&mut output, target, value.clone()),
            MappingEntry::Rule(rule) => {
                if let Some(method) = rule.method()? {
                    registry.dispatch(method, subject, &mut output, field, rule.as_object())?;
                }
            }
            MappingEntry::Unmapped if include_all => {
                if field == FIELD_ORDER_BY {
                    ordering::apply(subject, mapping, &mut output)?;
                } else {
                    output.insert(field, value.clone());
                }
            }
            MappingEntry::Unmapped => {}
        }
    }

    Ok(output)
}

fn check_required(subject: &Object, mapping: &Object) -> Result<()> {
    let Ok(Some(required)) = mapping.get_string_array(CONTROL_REQUIRED) else {
        return Ok(());
    };

    let missing: Vec<String> = required
        .iter()
        .filter(|field| !subject.is_set(field))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!(missing = ?missing, "Subject is missing required fields");
        Err(Error::required_fields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::object_from_json;
    use crate::value::Value;
    use serde_json::json;

    fn obj(value: serde_json::Value) -> Object {
        object_from_json(value).unwrap()
    }

    #[test]
    fn test_renames_and_nests() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"name": "Ada", "city": "London", "ignored": 1}));
        let mapping = obj(json!({"name": "fullName", "city": "address.city"}));

        let out = convert_single(&registry, &subject, &mapping, false).unwrap();

        assert_eq!(out, obj(json!({"fullName": "Ada", "address": {"city": "London"}})));
    }

    #[test]
    fn test_rule_without_method_is_skipped() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"name": "Ada"}));
        let mapping = obj(json!({"name": {"field": "fullName"}}));

        let out = convert_single(&registry, &subject, &mapping, true).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_required_reports_every_missing_field() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"id": null, "other": 1}));
        let mapping = obj(json!({"$required": ["id", "name", "other"]}));

        let err = convert_single(&registry, &subject, &mapping, false).unwrap_err();
        match err {
            Error::RequiredFields { fields, message } => {
                assert_eq!(fields, vec!["id", "name"]);
                assert_eq!(message, "id IS REQUIRED\nname IS REQUIRED");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_required_is_checked_before_any_field() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"flag": "x"}));
        let mapping = obj(json!({
            "$required": ["id"],
            "flag": {"field": "f", "method": "noSuchMethod"}
        }));

        let err = convert_single(&registry, &subject, &mapping, false).unwrap_err();
        assert!(matches!(err, Error::RequiredFields { .. }));
    }

    #[test]
    fn test_include_all_copies_and_rewrites_order_by() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"name": "Ada", "extra": true, "orderBy": ["-name", "extra"]}));
        let mapping = obj(json!({"name": "n"}));

        let out = convert_single(&registry, &subject, &mapping, true).unwrap();

        assert_eq!(out.get("extra"), Some(&Value::Bool(true)));
        assert_eq!(
            out.get("orderBy"),
            Some(&Value::StringArray(vec!["-n".to_string(), "extra".to_string()]))
        );
    }

    #[test]
    fn test_unknown_method_fails() {
        let registry = HandlerRegistry::with_builtins();
        let subject = obj(json!({"flag": true}));
        let mapping = obj(json!({"flag": {"field": "f", "method": "toYesNo"}}));

        let err = convert_single(&registry, &subject, &mapping, false).unwrap_err();
        assert!(matches!(err, Error::MethodNotFound { ref method, ref field }
            if method == "toYesNo" && field == "flag"));
        assert_eq!(err.code(), Some(415));
    }
}
