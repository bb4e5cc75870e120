//! Raw value getters bound from fields.

use serde_json::Value;

use super::types::{Access, Field, NestedField};
use crate::error::{Result, SerializeError};
use crate::schema::MethodFn;
use crate::serializer::Serializer;
use crate::source::Source;

/// A field's raw value accessor, bound to a declared name and an owning
/// serializer.
pub enum Getter<'a> {
    /// Key or attribute lookup on the source.
    Attribute { name: &'a str },
    /// Attribute lookup on the owning serializer.
    SelfAttribute {
        serializer: &'a Serializer,
        name: &'a str,
    },
    /// Method of the owning serializer's schema.
    Method {
        serializer: &'a Serializer,
        method: &'a MethodFn,
    },
    /// Sub-object serialized with another schema.
    Nested {
        name: &'a str,
        nested: &'a NestedField,
    },
}

impl Getter<'_> {
    /// Whether the getter is already bound to the owning serializer.
    pub fn takes_serializer(&self) -> bool {
        matches!(self, Getter::Method { .. })
    }

    /// Read the raw value from `source`.
    ///
    /// `Ok(None)` means the attribute is absent, which is distinct from a
    /// present `null`.
    pub fn get(&self, source: &Source) -> Result<Option<Value>> {
        match self {
            Getter::Attribute { name } => source.get(name)?.map(Source::into_value).transpose(),
            Getter::SelfAttribute { serializer, name } => Ok(serializer.attribute(name).cloned()),
            Getter::Method { serializer, method } => {
                let method: &MethodFn = method;
                method(*serializer, source).map(Some)
            }
            Getter::Nested { name, nested } => match source.get(name)? {
                Some(child) => nested.resolve(child).map(Some),
                None => Ok(None),
            },
        }
    }
}

impl Field {
    /// Bind this field to a declared name and an owning serializer.
    ///
    /// Returns `Ok(None)` for a bare field with neither. Method fields look
    /// their method up in the serializer's schema and fail with an
    /// attribute lookup error when it is not registered.
    pub fn as_getter<'a>(
        &'a self,
        declared_name: Option<&'a str>,
        serializer: Option<&'a Serializer>,
    ) -> Result<Option<Getter<'a>>> {
        if declared_name.is_none() && serializer.is_none() {
            return Ok(None);
        }

        let getter = match &self.access {
            Access::Attribute => Getter::Attribute {
                name: self.lookup_name(declared_name)?,
            },
            Access::SelfAttribute => Getter::SelfAttribute {
                serializer: attached(serializer, "self field")?,
                name: self.lookup_name(declared_name)?,
            },
            Access::Method { .. } => {
                let serializer = attached(serializer, "method field")?;
                let method_name = self.method_name(declared_name.unwrap_or_default());
                let method = method_name
                    .as_deref()
                    .and_then(|name| serializer.schema().method(name))
                    .ok_or_else(|| {
                        SerializeError::AttributeLookup(format!(
                            "schema '{}' has no method '{}'",
                            serializer.schema().name(),
                            method_name.as_deref().unwrap_or_default()
                        ))
                    })?;
                Getter::Method { serializer, method }
            }
            Access::Nested(nested) => Getter::Nested {
                name: self.lookup_name(declared_name)?,
                nested,
            },
        };

        Ok(Some(getter))
    }

    fn lookup_name<'a>(&'a self, declared_name: Option<&'a str>) -> Result<&'a str> {
        self.source_attr().or(declared_name).ok_or_else(|| {
            SerializeError::AttributeLookup("field has neither a declared name nor an attr".into())
        })
    }
}

fn attached<'a>(serializer: Option<&'a Serializer>, what: &str) -> Result<&'a Serializer> {
    serializer.ok_or_else(|| {
        SerializeError::AttributeLookup(format!("{} is not attached to a serializer", what))
    })
}
