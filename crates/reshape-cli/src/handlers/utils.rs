//! Shared utilities for command handlers

use crate::config::is_yaml;
use crate::error::{Error, Result};
use reshape_core::{codec, Object};
use std::fs;
use std::path::Path;

/// Load a JSON or YAML object from `path`, keeping field order
pub fn load_object(path: &Path) -> Result<Object> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "Read input file");

    if is_yaml(path) {
        serde_yaml::from_str::<Object>(&content).map_err(|e| {
            tracing::debug!(error = %e, "YAML parse failed");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "YAML".to_string(),
            }
        })
    } else {
        codec::decode(&content).map_err(|e| {
            tracing::debug!(error = %e, "JSON parse failed");
            Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "JSON".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reshape_core::Value;

    #[test]
    fn test_load_json_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subject.json");
        fs::write(&path, r#"{"zeta": 1, "alpha": {"b": true, "a": null}}"#).unwrap();

        let obj = load_object(&path).unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        let nested = obj.get_object("alpha").unwrap().unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.yml");
        fs::write(&path, "name: person.name\nactive:\n  field: flag\n  method: boolToInt\n").unwrap();

        let obj = load_object(&path).unwrap();
        assert_eq!(obj.get("name"), Some(&Value::from("person.name")));
        let rule = obj.get_object("active").unwrap().unwrap();
        assert_eq!(rule.get("method"), Some(&Value::from("boolToInt")));
    }

    #[test]
    fn test_non_object_input_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = load_object(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { ref expected, .. } if expected == "JSON"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_object(Path::new("nope.json")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
