//! `orderBy` rewrite through a rename mapping
//!
//! A sort specification written in caller-facing names, such as
//! `["-name", "age"]`, is translated into the names the mapping writes to.
//! A leading `-` marks a descending key and is carried over.

use super::rules::{MappingEntry, FIELD_ORDER_BY};
use crate::error::{Error, Result};
use crate::value::{Object, Value};

const DESCENDING: char = '-';

/// Sort keys held by the subject's `orderBy`, if any
pub fn order_by_entries(subject: &Object) -> Result<Option<Vec<&str>>> {
    match subject.get(FIELD_ORDER_BY) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_str_entries().map(Some).ok_or_else(|| Error::TypeMismatch {
            key: FIELD_ORDER_BY.to_string(),
            expected: "stringarray".to_string(),
            actual: value.value_type().to_string(),
        }),
    }
}

/// Translate each sort key through `mapping`, keeping order and direction.
///
/// Keys the mapping does not rename are kept as they are.
pub fn rewrite_order_by(entries: &[&str], mapping: &Object) -> Result<Vec<String>> {
    entries
        .iter()
        .map(|entry| {
            let (descending, name) = match entry.strip_prefix(DESCENDING) {
                Some(rest) => (true, rest),
                None => (false, *entry),
            };

            let target = MappingEntry::of(mapping, name).target()?.unwrap_or(name);

            Ok(if descending {
                format!("{}{}", DESCENDING, target)
            } else {
                target.to_string()
            })
        })
        .collect()
}

/// Write the rewritten `orderBy` of `subject` into `output`
pub(super) fn apply(subject: &Object, mapping: &Object, output: &mut Object) -> Result<()> {
    if let Some(entries) = order_by_entries(subject)? {
        output.insert(FIELD_ORDER_BY, rewrite_order_by(&entries, mapping)?);
    }
    Ok(())
}
