//! Record trait definition
//!
//! Provides a unified lookup interface over mapping-like and attribute-like
//! inputs.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::Source;

/// Abstraction over objects that expose named attributes.
///
/// Mapping-like inputs (JSON objects, hash maps) and user structs share this
/// one capability, so field getters never need reflection. Implement it on
/// your own types to serialize them attribute-style:
///
/// ```
/// use barq::{Record, Source};
/// use serde_json::json;
///
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// impl Record for User {
///     fn get(&self, name: &str) -> Option<Source> {
///         match name {
///             "id" => Some(json!(self.id).into()),
///             "name" => Some(json!(self.name).into()),
///             _ => None,
///         }
///     }
/// }
/// ```
///
/// Output is plain JSON, so an attribute that is itself a record (a
/// [`Source::Record`] or producer) is only readable through a nested-schema
/// field ([`Field::nested`](crate::Field::nested)). Plain fields reading it
/// fail with a type error.
pub trait Record: Send + Sync {
    /// Look up an attribute by name.
    ///
    /// Returns `None` when the attribute does not exist at all. An attribute
    /// that exists but holds `null` must be returned as `Some`.
    fn get(&self, name: &str) -> Option<Source>;
}

/// A shared, dynamically dispatched record.
pub type SharedRecord = Arc<dyn Record>;

impl Record for Map<String, Value> {
    fn get(&self, name: &str) -> Option<Source> {
        Map::get(self, name).cloned().map(Source::Value)
    }
}

impl Record for HashMap<String, Value> {
    fn get(&self, name: &str) -> Option<Source> {
        HashMap::get(self, name).cloned().map(Source::Value)
    }
}

impl Record for BTreeMap<String, Value> {
    fn get(&self, name: &str) -> Option<Source> {
        BTreeMap::get(self, name).cloned().map(Source::Value)
    }
}

impl Record for HashMap<String, Source> {
    fn get(&self, name: &str) -> Option<Source> {
        HashMap::get(self, name).cloned()
    }
}

impl<R: Record + ?Sized> Record for Arc<R> {
    fn get(&self, name: &str) -> Option<Source> {
        (**self).get(name)
    }
}
