//! Dot-path writes into an output tree
//!
//! `a.b.c` addresses field `c` of object `b` of object `a`. Every write the
//! engine or a coercion handler makes into an output tree goes through
//! [`set_field`].

use super::{Object, Value};

/// Separator between nested field names
pub const PATH_SEPARATOR: char = '.';

/// Write `value` at the dot-separated `path` inside `target`.
///
/// Intermediate segments are created as empty objects when missing. An
/// intermediate segment holding anything other than an object is replaced by
/// a fresh object. A path without a dot writes at the top level.
pub fn set_field(target: &mut Object, path: &str, value: impl Into<Value>) {
    let value = value.into();

    match path.split_once(PATH_SEPARATOR) {
        None => {
            target.insert(path, value);
        }
        Some((head, rest)) => {
            set_field(target.object_entry(head), rest, value);
        }
    }
}

/// Field name with any `#suffix` disambiguator removed
pub fn strip_suffix(key: &str) -> &str {
    match key.find('#') {
        Some(idx) => &key[..idx],
        None => key,
    }
}
