//! JSON text encoding and decoding for the value model
//!
//! Built on `serde_json` through hand-written `Serialize`/`Deserialize`
//! impls so object field order survives a round trip.
//!
//! Decoding picks the narrowest variant: integers that fit in 32 bits become
//! [`Value::Integer`], larger ones [`Value::Long`], fractional numbers
//! [`Value::Double`]. A non-empty array made only of strings becomes a
//! [`Value::StringArray`]; every other array is a [`Value::List`].

use crate::error::{Error, Result};
use crate::value::{Object, Value};
use chrono::SecondsFormat;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// Encode an object as compact JSON text
pub fn encode(obj: &Object) -> Result<String> {
    Ok(serde_json::to_string(obj)?)
}

/// Encode an object as indented JSON text
pub fn encode_pretty(obj: &Object) -> Result<String> {
    Ok(serde_json::to_string_pretty(obj)?)
}

/// Decode JSON text whose top level is an object
pub fn decode(text: &str) -> Result<Object> {
    Ok(serde_json::from_str(text)?)
}

/// Convert a `serde_json` value into the value model
pub fn from_json(value: serde_json::Value) -> Result<Value> {
    Ok(serde_json::from_value(value)?)
}

/// Convert a `serde_json` object into an [`Object`]
pub fn object_from_json(value: serde_json::Value) -> Result<Object> {
    match from_json(value)? {
        Value::Object(obj) => Ok(obj),
        other => Err(Error::TypeMismatch {
            key: "$".to_string(),
            expected: "object".to_string(),
            actual: other.value_type().to_string(),
        }),
    }
}

/// Format a date-time the way the engine writes them as text
pub fn format_datetime(value: &chrono::DateTime<chrono::FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(n) => serializer.serialize_i32(*n),
            Value::Long(n) => serializer.serialize_i64(*n),
            Value::Double(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => serializer.serialize_str(&format_datetime(dt)),
            Value::Object(obj) => obj.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::StringArray(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<Value, D::Error> {
        Deserialize::deserialize(d)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(match i32::try_from(v) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Long(v),
        })
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        if let Ok(n) = i32::try_from(v) {
            Ok(Value::Integer(n))
        } else if let Ok(n) = i64::try_from(v) {
            Ok(Value::Long(n))
        } else {
            Ok(Value::Double(v as f64))
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }

        let all_strings = !items.is_empty() && items.iter().all(|v| matches!(v, Value::String(_)));
        if all_strings {
            let strings = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            Ok(Value::StringArray(strings))
        } else {
            Ok(Value::List(items))
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut obj = Object::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            obj.insert(key, value);
        }
        Ok(Value::Object(obj))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        d.deserialize_any(ValueVisitor)
    }
}

impl<'de> Deserialize<'de> for Object {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        match d.deserialize_any(ValueVisitor)? {
            Value::Object(obj) => Ok(obj),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.value_type().name()),
                &"a JSON object",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;
    use chrono::DateTime;

    #[test]
    fn test_decode_keeps_field_order() {
        let obj = decode(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(encode(&obj).unwrap(), r#"{"z":1,"a":2,"m":3}"#);
    }

    #[test]
    fn test_decode_number_widths() {
        let obj = decode(r#"{"small": 7, "big": 9007199254740993, "ratio": 0.5}"#).unwrap();
        assert_eq!(obj.value_type("small"), ValueType::Integer);
        assert_eq!(obj.value_type("big"), ValueType::Long);
        assert_eq!(obj.value_type("ratio"), ValueType::Double);
    }

    #[test]
    fn test_decode_arrays() {
        let obj = decode(r#"{"tags": ["a", "b"], "rows": [{"id": 1}], "empty": [], "mixed": ["a", 1]}"#)
            .unwrap();
        assert_eq!(obj.value_type("tags"), ValueType::StringArray);
        assert_eq!(obj.value_type("rows"), ValueType::ArrayList);
        assert_eq!(obj.value_type("empty"), ValueType::ArrayList);
        assert_eq!(obj.value_type("mixed"), ValueType::ArrayList);
    }

    #[test]
    fn test_decode_rejects_non_object_top_level() {
        assert!(matches!(decode("[1, 2]"), Err(Error::Json { .. })));
        assert!(matches!(decode("{not json"), Err(Error::Json { .. })));
    }

    #[test]
    fn test_datetime_encodes_as_rfc3339() {
        let mut obj = Object::new();
        let dt = DateTime::parse_from_rfc3339("2025-05-02T10:30:00+02:00").unwrap();
        obj.insert("at", dt);
        assert_eq!(encode(&obj).unwrap(), r#"{"at":"2025-05-02T10:30:00+02:00"}"#);
    }

    #[test]
    fn test_object_from_json() {
        let obj = object_from_json(serde_json::json!({"a": {"b": null}})).unwrap();
        let inner = obj.get_object("a").unwrap().unwrap();
        assert!(inner.contains_key("b"));
        assert!(!inner.is_set("b"));

        assert!(object_from_json(serde_json::json!("text")).is_err());
    }
}
