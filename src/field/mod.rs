//! Field descriptors, getters and coercions.
//!
//! This module defines how a single output value is declared, read from a
//! source object, and converted.

mod coerce;
mod getter;
mod types;

pub use coerce::{Coerce, Coercion, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
pub use getter::Getter;
pub use types::{Access, Field, NestedField};
