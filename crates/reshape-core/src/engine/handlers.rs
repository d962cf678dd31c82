//! Built-in coercion handlers
//!
//! | method         | inverse        |
//! |----------------|----------------|
//! | `json2String`  | `string2Json`  |
//! | `string2Json`  | `json2String`  |
//! | `boolToInt`    | `intToBool`    |
//! | `intToBool`    | `boolToInt`    |
//! | `stringToDate` | `dateToString` |
//! | `dateToString` | `stringToDate` |
//!
//! A null or absent source field is a no-op for every handler. `intToBool`
//! is lossy on string input: anything other than `"true"` becomes `false`.
//!
//! `json2String` followed by `string2Json` goes through JSON text, so values
//! come back as the decoder reads them: a `Long` within `i32` range returns
//! as `Integer`, an empty `StringArray` as `List`, and a nested `DateTime`
//! as `String`.

use super::registry::{from_fn, HandlerRegistry};
use super::rules::FieldRule;
use crate::codec;
use crate::error::{Error, Result};
use crate::value::{set_field, Object, Value};
use chrono::{DateTime, FixedOffset};

pub const JSON_TO_STRING: &str = "json2String";
pub const STRING_TO_JSON: &str = "string2Json";
pub const BOOL_TO_INT: &str = "boolToInt";
pub const INT_TO_BOOL: &str = "intToBool";
pub const STRING_TO_DATE: &str = "stringToDate";
pub const DATE_TO_STRING: &str = "dateToString";

/// Time appended to a bare `yyyy-MM-dd` date before parsing
const MIDNIGHT_UTC: &str = "T00:00:00.000Z";
const BARE_DATE_LEN: usize = 10;
/// ISO offset date-time shapes: seconds and fraction are optional
const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

pub(super) fn register_builtins(registry: &mut HandlerRegistry) {
    registry.insert(JSON_TO_STRING.to_string(), Some(STRING_TO_JSON), from_fn(json_to_string));
    registry.insert(STRING_TO_JSON.to_string(), Some(JSON_TO_STRING), from_fn(string_to_json));
    registry.insert(BOOL_TO_INT.to_string(), Some(INT_TO_BOOL), from_fn(bool_to_int));
    registry.insert(INT_TO_BOOL.to_string(), Some(BOOL_TO_INT), from_fn(int_to_bool));
    registry.insert(STRING_TO_DATE.to_string(), Some(DATE_TO_STRING), from_fn(string_to_date));
    registry.insert(DATE_TO_STRING.to_string(), Some(STRING_TO_DATE), from_fn(date_to_string));
}

fn write(output: &mut Object, field: &str, rule: &Object, value: impl Into<Value>) -> Result<()> {
    let target = FieldRule::new(rule).target_or(field)?;
    set_field(output, target, value);
    Ok(())
}

/// Serialize an object field to JSON text
pub fn json_to_string(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    match source.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Object(obj)) => {
            let text = match codec::encode(obj) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::error!(field, error = %e, "Error encoding object to JSON");
                    None
                }
            };
            write(output, field, rule, text)
        }
        Some(_) => Err(Error::coercion(field, format!("Field<{}>: MUST be an Object", field))),
    }
}

/// Parse a JSON text field into a nested object
pub fn string_to_json(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    match source.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(text)) => {
            let parsed = match codec::decode(text) {
                Ok(obj) => Some(obj),
                Err(e) => {
                    tracing::error!(field, error = %e, "Error parsing JSON text to object");
                    None
                }
            };
            write(output, field, rule, parsed)
        }
        Some(_) => Err(Error::coercion(field, format!("Field<{}>: MUST be a String", field))),
    }
}

/// `true` becomes 1, `false` becomes 0
pub fn bool_to_int(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    match source.get(field) {
        Some(Value::Bool(flag)) => write(output, field, rule, i32::from(*flag)),
        _ => Ok(()),
    }
}

/// Non-zero integers and the exact string `"true"` become `true`
pub fn int_to_bool(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    let flag = match source.get(field) {
        Some(Value::Integer(n)) => *n != 0,
        Some(Value::Long(n)) => *n != 0,
        Some(Value::String(s)) => s == "true",
        _ => return Ok(()),
    };
    write(output, field, rule, flag)
}

/// Parse an offset date-time; a bare date is read as midnight UTC
pub fn string_to_date(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    let Some(Value::String(text)) = source.get(field) else {
        return Ok(());
    };

    match parse_offset_date_time(text) {
        Some(dt) => write(output, field, rule, dt),
        None => Err(Error::coercion(
            field,
            format!(
                "Field ({}) Cannot Be Parsed to DateTime. Expected Format: yyyy-MM-ddTHH:mm:ss.SSSX",
                field
            ),
        )),
    }
}

fn parse_offset_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    let mut text = if text.chars().count() == BARE_DATE_LEN {
        format!("{}{}", text, MIDNIGHT_UTC)
    } else {
        text.to_string()
    };
    if text.ends_with(['Z', 'z']) {
        text.pop();
        text.push_str("+00:00");
    }

    OFFSET_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(&text, format).ok())
}

/// Format a date-time as ISO-8601 text
pub fn date_to_string(source: &Object, output: &mut Object, field: &str, rule: &Object) -> Result<()> {
    match source.get(field) {
        Some(Value::DateTime(dt)) => write(output, field, rule, codec::format_datetime(dt)),
        _ => Ok(()),
    }
}
