//! Serializers bind a schema to a source and produce its output mapping.
//!
//! The output is computed on the first call to [`Serializer::data`] and
//! cached for the lifetime of the instance.

mod options;

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Result, SerializeError};
use crate::field::Field;
use crate::schema::Schema;
use crate::source::Source;

pub use options::SerializeOptions;

/// A schema bound to a concrete source.
///
/// ```
/// use barq::{Field, Schema, Serializer};
/// use serde_json::json;
///
/// let schema = Schema::builder("Point")
///     .field("x", Field::int())
///     .field("y", Field::int().label("@y"))
///     .build()
///     .unwrap();
///
/// let serializer = Serializer::new(schema, json!({"x": "1", "y": 2.7}));
/// assert_eq!(serializer.data().unwrap(), &json!({"x": 1, "@y": 2}));
/// ```
pub struct Serializer {
    schema: Arc<Schema>,
    source: Source,
    options: SerializeOptions,
    attributes: Map<String, Value>,
    data: OnceLock<Value>,
}

impl Serializer {
    pub fn new(schema: Arc<Schema>, source: impl Into<Source>) -> Self {
        Self::with_options(schema, source, SerializeOptions::default())
    }

    pub fn with_options(
        schema: Arc<Schema>,
        source: impl Into<Source>,
        options: SerializeOptions,
    ) -> Self {
        Self {
            schema,
            source: source.into(),
            options,
            attributes: Map::new(),
            data: OnceLock::new(),
        }
    }

    /// A serializer with a `null` source, for schemas that only read
    /// serializer-level attributes.
    pub fn empty(schema: Arc<Schema>) -> Self {
        Self::new(schema, Source::null())
    }

    pub fn many(mut self, many: bool) -> Self {
        self.options.many = many;
        self
    }

    pub fn call(mut self, call: bool) -> Self {
        self.options.call = call;
        self
    }

    /// Set an instance attribute, shadowing the schema attribute of the same
    /// name.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn options(&self) -> &SerializeOptions {
        &self.options
    }

    /// Instance attribute, falling back to the schema's attributes.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .get(name)
            .or_else(|| self.schema.attribute(name))
    }

    /// Whether the output has been computed and cached.
    pub fn is_computed(&self) -> bool {
        self.data.get().is_some()
    }

    /// The serialized output: one mapping, or an array of mappings in `many`
    /// mode.
    ///
    /// Computed on first access; later calls return the same cached value
    /// without looking at the source again. Errors are not cached.
    ///
    /// If several threads race on an uncomputed instance, each may compute
    /// but only the first stored value is kept and returned to all of them.
    pub fn data(&self) -> Result<&Value> {
        if let Some(data) = self.data.get() {
            return Ok(data);
        }
        let computed = self.compute()?;
        Ok(self.data.get_or_init(|| computed))
    }

    /// Consume the serializer, returning its output.
    pub fn into_data(mut self) -> Result<Value> {
        match self.data.take() {
            Some(data) => Ok(data),
            None => self.compute(),
        }
    }

    fn compute(&self) -> Result<Value> {
        trace!(
            schema = %self.schema.name(),
            many = self.options.many,
            call = self.options.call,
            "Computing serializer data"
        );

        let source = if self.options.call {
            Cow::Owned(self.source.invoke()?)
        } else {
            Cow::Borrowed(&self.source)
        };

        if self.options.many {
            source
                .items()?
                .iter()
                .map(|item| self.serialize_one(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        } else {
            self.serialize_one(&source)
        }
    }

    fn serialize_one(&self, object: &Source) -> Result<Value> {
        let mut output = Map::with_capacity(self.schema.field_count());
        for (name, field) in self.schema.fields() {
            let value = self.resolve_field(name, field, object)?;
            output.insert(field.resolve_label(name).to_string(), value);
        }
        Ok(Value::Object(output))
    }

    fn resolve_field(&self, name: &str, field: &Field, object: &Source) -> Result<Value> {
        let getter = field.as_getter(Some(name), Some(self))?.ok_or_else(|| {
            SerializeError::AttributeLookup(format!("field '{}' has no getter", name))
        })?;

        match getter.get(object).map_err(|e| e.in_field(name))? {
            None => match field.default_value() {
                Some(default) => Ok(default.clone()),
                None if !field.is_required() => Ok(Value::Null),
                None => Err(SerializeError::MissingKey(format!(
                    "'{}' not found on {}",
                    field.source_attr().unwrap_or(name),
                    object.describe()
                ))),
            },
            Some(Value::Null) => {
                if field.is_required() && field.is_coercion_overridden() {
                    Err(SerializeError::Type(format!(
                        "field '{}' is required but got null",
                        name
                    )))
                } else {
                    Ok(Value::Null)
                }
            }
            Some(raw) => field.to_value(raw).map_err(|e| e.in_field(name)),
        }
    }
}

impl std::fmt::Debug for Serializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Serializer")
            .field("schema", &self.schema.name())
            .field("source", &self.source)
            .field("options", &self.options)
            .field("computed", &self.is_computed())
            .finish()
    }
}
