//! Schema declaration and composition.
//!
//! This module defines schemas, their builder, and the deterministic merge of
//! field sets across composed schemas.

mod composition;
mod types;

pub use types::{MethodFn, Schema, SchemaBuilder};
