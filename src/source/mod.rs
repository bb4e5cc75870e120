//! Source abstractions for serialization input
//!
//! A [`Source`] is whatever a serializer is bound to: a JSON value, an
//! attribute-style [`Record`], an ordered list of sources, or a zero-argument
//! producer that yields the real source on demand.

mod traits;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SerializeError};

pub use traits::{Record, SharedRecord};

/// A zero-argument function producing a [`Source`].
#[derive(Clone)]
pub struct Producer(Arc<dyn Fn() -> Source + Send + Sync>);

impl Producer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Source + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn invoke(&self) -> Source {
        (self.0)()
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer(..)")
    }
}

/// Input bound to a serializer.
#[derive(Clone)]
pub enum Source {
    /// A JSON value. Objects are looked up by key.
    Value(Value),
    /// An attribute-style object.
    Record(SharedRecord),
    /// An ordered sequence of sources.
    List(Vec<Source>),
    /// A zero-argument producer, invoked when the serializer runs in `call` mode.
    Producer(Producer),
}

impl Source {
    /// The `null` source.
    pub fn null() -> Self {
        Source::Value(Value::Null)
    }

    /// Wrap an attribute-style record.
    pub fn record<R: Record + 'static>(record: R) -> Self {
        Source::Record(Arc::new(record))
    }

    /// Wrap a zero-argument producer.
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Source + Send + Sync + 'static,
    {
        Source::Producer(Producer::new(f))
    }

    /// Build a list source from anything convertible into sources.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        Source::List(items.into_iter().map(Into::into).collect())
    }

    /// Adapt any `Serialize` type into a source through its JSON form.
    ///
    /// Structs become objects keyed by their field names, so they can be
    /// read attribute-style without a hand-written [`Record`] impl.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Source::Value)
            .map_err(|e| SerializeError::Type(format!("cannot represent source: {}", e)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Source::Value(Value::Null))
    }

    /// Short name of the source shape, used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Source::Value(Value::Null) => "null",
            Source::Value(Value::Bool(_)) => "boolean",
            Source::Value(Value::Number(_)) => "number",
            Source::Value(Value::String(_)) => "string",
            Source::Value(Value::Array(_)) => "array",
            Source::Value(Value::Object(_)) => "object",
            Source::Record(_) => "record",
            Source::List(_) => "list",
            Source::Producer(_) => "producer",
        }
    }

    /// Look up an attribute or key.
    ///
    /// `Ok(None)` means the attribute is absent. Sources that have no
    /// attributes at all (scalars, sequences, producers) fail with a type
    /// error.
    pub fn get(&self, name: &str) -> Result<Option<Source>> {
        match self {
            Source::Value(Value::Object(map)) => Ok(map.get(name).cloned().map(Source::Value)),
            Source::Record(record) => Ok(record.get(name)),
            other => Err(SerializeError::Type(format!(
                "cannot look up '{}' on {}",
                name,
                other.describe()
            ))),
        }
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Source::Value(value) => Ok(value),
            Source::List(items) => items
                .into_iter()
                .map(Source::into_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(SerializeError::Type(format!(
                "{} is not a plain value",
                other.describe()
            ))),
        }
    }

    /// Invoke a producer source.
    pub fn invoke(&self) -> Result<Source> {
        match self {
            Source::Producer(producer) => Ok(producer.invoke()),
            other => Err(SerializeError::Type(format!(
                "{} is not callable",
                other.describe()
            ))),
        }
    }

    /// The elements of a sequence source, in order.
    pub fn items(&self) -> Result<Vec<Cow<'_, Source>>> {
        match self {
            Source::List(items) => Ok(items.iter().map(Cow::Borrowed).collect()),
            Source::Value(Value::Array(items)) => Ok(items
                .iter()
                .map(|item| Cow::Owned(Source::Value(item.clone())))
                .collect()),
            other => Err(SerializeError::Type(format!(
                "expected a sequence, found {}",
                other.describe()
            ))),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Source::Record(_) => f.write_str("Record(..)"),
            Source::List(items) => f.debug_tuple("List").field(items).finish(),
            Source::Producer(producer) => producer.fmt(f),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::null()
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Source::Value(value)
    }
}

impl From<Map<String, Value>> for Source {
    fn from(map: Map<String, Value>) -> Self {
        Source::Value(Value::Object(map))
    }
}

impl From<Vec<Source>> for Source {
    fn from(items: Vec<Source>) -> Self {
        Source::List(items)
    }
}

impl From<SharedRecord> for Source {
    fn from(record: SharedRecord) -> Self {
        Source::Record(record)
    }
}

impl From<Producer> for Source {
    fn from(producer: Producer) -> Self {
        Source::Producer(producer)
    }
}
