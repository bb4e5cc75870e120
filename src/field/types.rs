//! Field descriptors.
//!
//! A [`Field`] declares how one output value is read from a source and how it
//! is coerced. Fields are configured with builder methods and are immutable
//! once placed in a schema.

use std::sync::Arc;

use serde_json::Value;

use super::coerce::{Coerce, Coercion, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
use crate::error::Result;
use crate::schema::Schema;
use crate::serializer::Serializer;
use crate::source::Source;

/// How a field obtains its raw value.
#[derive(Debug, Clone)]
pub enum Access {
    /// Attribute or key lookup on the source object.
    Attribute,
    /// Attribute lookup on the owning serializer instead of the source.
    SelfAttribute,
    /// Invoke a method registered on the owning serializer's schema.
    /// `None` derives the method name as `get_<declared name>`.
    Method { name: Option<String> },
    /// Serialize a sub-object with another schema.
    Nested(NestedField),
}

/// A schema used as a field.
#[derive(Debug, Clone)]
pub struct NestedField {
    /// Schema applied to the sub-object.
    pub schema: Arc<Schema>,
    /// Treat the sub-object as a sequence.
    pub many: bool,
    /// Invoke the sub-object as a zero-argument producer first.
    pub call: bool,
}

impl NestedField {
    /// Serialize a sub-object, returning the nested serializer's data.
    ///
    /// A `null` sub-object stays `null` rather than being serialized.
    pub fn resolve(&self, child: Source) -> Result<Value> {
        let child = if self.call { child.invoke()? } else { child };
        if child.is_null() {
            return Ok(Value::Null);
        }
        Serializer::new(Arc::clone(&self.schema), child)
            .many(self.many)
            .into_data()
    }
}

/// Declarative accessor and converter for one output value.
#[derive(Debug, Clone)]
pub struct Field {
    pub(crate) access: Access,
    pub(crate) coerce: Coerce,
    attr: Option<String>,
    label: Option<String>,
    required: bool,
    default: Option<Value>,
}

impl Field {
    fn with_parts(access: Access, coerce: Coerce) -> Self {
        Self {
            access,
            coerce,
            attr: None,
            label: None,
            required: true,
            default: None,
        }
    }

    /// A pass-through field.
    pub fn new() -> Self {
        Self::with_parts(Access::Attribute, Coerce::Identity)
    }

    /// Converts the raw value to its string representation.
    pub fn str() -> Self {
        Self::with_parts(Access::Attribute, Coerce::Str)
    }

    /// Converts ints, truncated floats and integer strings to an integer.
    pub fn int() -> Self {
        Self::with_parts(Access::Attribute, Coerce::Int)
    }

    /// Converts numbers and numeric strings to a float.
    pub fn float() -> Self {
        Self::with_parts(Access::Attribute, Coerce::Float)
    }

    /// Converts the raw value to its truthiness.
    pub fn bool() -> Self {
        Self::with_parts(Access::Attribute, Coerce::Bool)
    }

    /// Reads an attribute of the owning serializer rather than the source.
    pub fn self_attr() -> Self {
        Self::with_parts(Access::SelfAttribute, Coerce::Identity)
    }

    /// Parses a date string and emits it as `YYYY-MM-DD`.
    pub fn date() -> Self {
        Self::with_parts(
            Access::Attribute,
            Coerce::Date {
                format: DEFAULT_DATE_FORMAT.to_string(),
            },
        )
    }

    /// Parses a datetime string and emits it as `YYYY-MM-DDTHH:MM:SS`.
    pub fn datetime() -> Self {
        Self::with_parts(
            Access::Attribute,
            Coerce::DateTime {
                format: DEFAULT_DATETIME_FORMAT.to_string(),
            },
        )
    }

    /// Gets its value from the `get_<declared name>` method of the schema.
    pub fn method() -> Self {
        Self::with_parts(Access::Method { name: None }, Coerce::Identity)
    }

    /// Gets its value from the named method of the schema.
    pub fn method_named(name: impl Into<String>) -> Self {
        Self::with_parts(
            Access::Method {
                name: Some(name.into()),
            },
            Coerce::Identity,
        )
    }

    /// Serializes the sub-object with `schema`.
    pub fn nested(schema: &Arc<Schema>) -> Self {
        Self::with_parts(
            Access::Nested(NestedField {
                schema: Arc::clone(schema),
                many: false,
                call: false,
            }),
            Coerce::Identity,
        )
    }

    /// A pass-through field with a custom coercion.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new().with_coercion(f)
    }

    /// Replace the coercion, keeping the access kind.
    pub fn with_coercion<C: Coercion + 'static>(mut self, coercion: C) -> Self {
        self.coerce = Coerce::Custom(Arc::new(coercion));
        self
    }

    /// Read from `attr` instead of the declared name.
    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attr = Some(attr.into());
        self
    }

    /// Emit under `label` instead of the declared name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Shorthand for `required(false)`.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Value used when the source lacks the attribute entirely.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Input pattern of a date or datetime field. Ignored by other fields.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        match &mut self.coerce {
            Coerce::Date { format: current } | Coerce::DateTime { format: current } => {
                *current = format.into();
            }
            _ => {}
        }
        self
    }

    /// Serialize the nested sub-object as a sequence. Ignored by non-nested fields.
    pub fn many(mut self, many: bool) -> Self {
        if let Access::Nested(nested) = &mut self.access {
            nested.many = many;
        }
        self
    }

    /// Invoke the nested sub-object before serializing it. Ignored by
    /// non-nested fields.
    pub fn call(mut self, call: bool) -> Self {
        if let Access::Nested(nested) = &mut self.access {
            nested.call = call;
        }
        self
    }

    pub fn access(&self) -> &Access {
        &self.access
    }

    pub fn coercion(&self) -> &Coerce {
        &self.coerce
    }

    pub fn source_attr(&self) -> Option<&str> {
        self.attr.as_deref()
    }

    /// The configured output label, if any.
    pub fn output_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether this field performs real conversion.
    ///
    /// Identity fields skip coercion entirely and let `null` through even
    /// when required.
    pub fn is_coercion_overridden(&self) -> bool {
        !self.coerce.is_identity()
    }

    /// Whether getters of this field are bound to the owning serializer.
    pub fn getter_takes_serializer(&self) -> bool {
        matches!(self.access, Access::Method { .. })
    }

    /// Output key: the label if set, else the declared name.
    pub fn resolve_label<'a>(&'a self, declared_name: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(declared_name)
    }

    /// Convert a raw value. `null` is returned as is, before any coercion.
    pub fn to_value(&self, raw: Value) -> Result<Value> {
        if raw.is_null() {
            return Ok(Value::Null);
        }
        self.coerce.apply(raw)
    }

    /// Name of the method a method field calls, given its declared name.
    pub(crate) fn method_name(&self, declared_name: &str) -> Option<String> {
        match &self.access {
            Access::Method { name: Some(name) } => Some(name.clone()),
            Access::Method { name: None } => Some(format!("get_{}", declared_name)),
            _ => None,
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}
