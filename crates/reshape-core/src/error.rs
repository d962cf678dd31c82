//! Error types for the Reshape core library
//!
//! Every failure raised by the conversion engine is a variant of [`Error`].
//! Conversion failures carry the domain status code an upstream request
//! layer reports to its caller, see [`Error::code`].

use thiserror::Error;

/// Status code for a batched `$required` failure
pub const CODE_BAD_REQUEST: u16 = 400;
/// Status code for a coercion handler rejecting its input
pub const CODE_COERCION: u16 = 410;
/// Status code for per-field validation and unknown methods
pub const CODE_UNSUPPORTED: u16 = 415;

/// Main error type for Reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// One or more `$required` fields are missing from the subject
    #[error("{message}")]
    RequiredFields {
        fields: Vec<String>,
        message: String,
    },

    /// A mapping rule marked `required` found no value
    #[error("{field} IS Required")]
    RequiredField { field: String },

    /// A mapping rule's `type` did not match the subject value
    #[error("{field} Expected Type {expected}")]
    TypeValidation { field: String, expected: String },

    /// A mapping rule names a method that is not registered
    #[error("Method <{method}> for Field <{field}> Does Not Exist")]
    MethodNotFound { method: String, field: String },

    /// A coercion handler rejected the value it was given
    #[error("{message}")]
    Coercion { field: String, message: String },

    /// A typed accessor was used against a differently typed value
    #[error("Type mismatch for '{key}': expected {expected}, found {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// An element of a `root` list is not an object
    #[error("Element {index} of root list is {actual}, expected object")]
    InvalidListRoot { index: usize, actual: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Engine configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build the batched required-field error from the missing field names
    pub fn required_fields(fields: Vec<String>) -> Self {
        let message = fields
            .iter()
            .map(|f| format!("{} IS REQUIRED", f))
            .collect::<Vec<_>>()
            .join("\n");

        Error::RequiredFields { fields, message }
    }

    /// Build a coercion error for a field
    pub fn coercion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Coercion {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Domain status code attached to conversion failures
    pub fn code(&self) -> Option<u16> {
        match self {
            Error::RequiredFields { .. } => Some(CODE_BAD_REQUEST),
            Error::Coercion { .. } => Some(CODE_COERCION),
            Error::RequiredField { .. }
            | Error::TypeValidation { .. }
            | Error::MethodNotFound { .. } => Some(CODE_UNSUPPORTED),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_message_joins_lines() {
        let err = Error::required_fields(vec!["id".to_string(), "name".to_string()]);
        assert_eq!(err.to_string(), "id IS REQUIRED\nname IS REQUIRED");
        assert_eq!(err.code(), Some(400));
    }

    #[test]
    fn test_method_not_found_display() {
        let err = Error::MethodNotFound {
            method: "toUpper".to_string(),
            field: "name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Method <toUpper> for Field <name> Does Not Exist"
        );
        assert_eq!(err.code(), Some(415));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::coercion("x", "bad").code(), Some(410));
        assert_eq!(
            Error::Configuration { message: "dup".into() }.code(),
            None
        );
    }
}
