//! Reshape Core - Declarative object-to-object conversion
//!
//! This crate converts JSON-shaped objects into new objects according to a
//! mapping configuration that is itself a JSON-shaped object.
//!
//! # Main Components
//!
//! - **Value Model**: An ordered [`Object`] of typed [`Value`]s with dot-path writes
//! - **Codec**: JSON text to and from the value model
//! - **Conversion Engine**: Source-driven and mapping-driven traversal
//! - **Coercion Handlers**: Named, invertible value transformations
//! - **Mapping Inversion**: Derive the reverse mapping of a configuration
//!
//! # Example
//!
//! ```
//! use reshape_core::{codec, Converter, Result};
//!
//! fn example() -> Result<()> {
//!     let subject = codec::decode(r#"{"first": "Ada", "lang": "en"}"#)?;
//!     let mapping = codec::decode(r#"{"first": "name.given"}"#)?;
//!
//!     let converter = Converter::new();
//!     let out = converter.convert(Some(&subject), Some(&mapping), true)?;
//!     assert_eq!(
//!         codec::encode(&out.unwrap_or_default())?,
//!         r#"{"name":{"given":"Ada"},"lang":"en"}"#
//!     );
//!
//!     let reverse = converter.reverse_mapping(&mapping)?;
//!     assert_eq!(codec::encode(&reverse)?, r#"{"name.given":"first"}"#);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod value;

// Re-export main types for convenience
pub use engine::registry::{from_fn, CoercionHandler, HandlerRegistry};
pub use engine::{ConvertOptions, Converter, ConverterBuilder, Strategy};
pub use error::{Error, Result};
pub use value::{set_field, Object, Value, ValueType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
