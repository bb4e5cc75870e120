//! Declarative object-to-mapping serialization
//!
//! This library turns plain data objects (JSON values, maps, or any type
//! implementing [`Record`]) into ordered JSON mappings, driven by composable
//! schemas of typed fields.
//!
//! - [`Field`]: how one value is read and coerced.
//! - [`Schema`]: an ordered field set, composable with other schemas.
//! - [`Serializer`]: a schema bound to a source, with cached output.
//!
//! ```
//! use barq::{Field, Schema, Serializer, Source};
//! use serde_json::json;
//!
//! let schema = Schema::builder("Item")
//!     .field("a", Field::str())
//!     .field("b", Field::int())
//!     .field("c", Field::float())
//!     .field("e", Field::bool().attr("d"))
//!     .field("total", Field::method_named("compute_total"))
//!     .method("compute_total", |_, obj: &Source| {
//!         let b = obj.get("b")?.map(Source::into_value).transpose()?;
//!         Ok(json!(b.and_then(|v| v.as_i64()).unwrap_or_default() * 10))
//!     })
//!     .build()
//!     .unwrap();
//!
//! let serializer = Serializer::new(schema, json!({"a": "a", "b": 1, "c": 2.3, "d": false}));
//! assert_eq!(
//!     serializer.data().unwrap(),
//!     &json!({"a": "a", "b": 1, "c": 2.3, "e": false, "total": 10})
//! );
//! ```

pub mod error;
pub mod field;
pub mod schema;
pub mod serializer;
pub mod source;

// Re-export main types
pub use error::{ErrorKind, Result, SerializeError};
pub use field::{
    Access, Coerce, Coercion, Field, Getter, NestedField, DEFAULT_DATETIME_FORMAT,
    DEFAULT_DATE_FORMAT,
};
pub use schema::{MethodFn, Schema, SchemaBuilder};
pub use serializer::{SerializeOptions, Serializer};
pub use source::{Producer, Record, SharedRecord, Source};
