//! Schema definitions and the schema builder.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::composition::{check_methods, linearize, merge_attributes, merge_fields, merge_methods};
use crate::error::Result;
use crate::field::Field;
use crate::serializer::Serializer;
use crate::source::Source;

/// A method callable by method fields.
///
/// Receives the owning serializer and the source object being serialized.
pub type MethodFn = Arc<dyn Fn(&Serializer, &Source) -> Result<Value> + Send + Sync>;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// A named, ordered set of fields, composed from zero or more base schemas.
///
/// Schemas are immutable once built and are shared as `Arc<Schema>`. All
/// composition happens in [`SchemaBuilder::build`], so serializing never walks
/// the hierarchy.
pub struct Schema {
    id: u64,
    name: String,
    bases: Vec<Arc<Schema>>,
    /// Linearized ancestry, most specific first, excluding this schema.
    ancestors: Vec<Arc<Schema>>,

    declared_fields: Vec<(String, Field)>,
    declared_methods: HashMap<String, MethodFn>,
    declared_attributes: Map<String, Value>,

    fields: Vec<(String, Field)>,
    methods: HashMap<String, MethodFn>,
    attributes: Map<String, Value>,
}

impl Schema {
    /// Start declaring a schema.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Process-unique identity, used to recognize shared ancestors.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct bases, in declared order.
    pub fn bases(&self) -> &[Arc<Schema>] {
        &self.bases
    }

    /// Linearized ancestry, most specific first, excluding this schema.
    pub fn ancestors(&self) -> &[Arc<Schema>] {
        &self.ancestors
    }

    /// Names of this schema and its ancestors in resolution order.
    pub fn linearization(&self) -> Vec<&str> {
        std::iter::once(self.name())
            .chain(self.ancestors.iter().map(|a| a.name()))
            .collect()
    }

    /// Every field visible in this schema, in output order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, field)| field)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn method(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    /// A serializer-level attribute, as read by self fields.
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Fields declared directly on this schema, excluding inherited ones.
    pub fn declared_fields(&self) -> &[(String, Field)] {
        &self.declared_fields
    }

    pub(crate) fn declared_methods(&self) -> &HashMap<String, MethodFn> {
        &self.declared_methods
    }

    pub(crate) fn declared_attributes(&self) -> &Map<String, Value> {
        &self.declared_attributes
    }

    /// Whether `other` is this schema or one of its ancestors.
    pub fn extends(&self, other: &Schema) -> bool {
        self.id == other.id || self.ancestors.iter().any(|a| a.id == other.id)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields.iter().map(|(name, _)| name.as_str()).collect();
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("bases", &self.bases.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("fields", &fields)
            .field("methods", &methods)
            .finish()
    }
}

/// Declares a schema: bases, fields, methods and attributes.
///
/// ```
/// use barq::{Field, Schema, Serializer};
/// use serde_json::json;
///
/// let a = Schema::builder("A").field("a", Field::new()).build().unwrap();
/// let ab = Schema::builder("AB")
///     .extends(&a)
///     .field("b", Field::int())
///     .build()
///     .unwrap();
///
/// let data = Serializer::new(ab, json!({"a": 1, "b": "2"})).into_data().unwrap();
/// assert_eq!(data, json!({"b": 2, "a": 1}));
/// ```
pub struct SchemaBuilder {
    name: String,
    bases: Vec<Arc<Schema>>,
    fields: Vec<(String, Field)>,
    methods: HashMap<String, MethodFn>,
    attributes: Map<String, Value>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            methods: HashMap::new(),
            attributes: Map::new(),
        }
    }

    /// Compose with `base`. Earlier bases take priority over later ones.
    pub fn extends(mut self, base: &Arc<Schema>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Declare a field. Re-declaring a name replaces the field in place.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(declared, _)| *declared == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Register a method for method fields.
    pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&Serializer, &Source) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Declare a serializer-level attribute, readable by self fields.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Resolve the composed field, method and attribute tables.
    ///
    /// # Errors
    /// - `Composition` if the bases cannot be linearized or repeat.
    /// - `AttributeLookup` if a method field names a method that neither this
    ///   schema nor any ancestor registers.
    pub fn build(self) -> Result<Arc<Schema>> {
        let ancestors = linearize(&self.name, &self.bases)?;
        let fields = merge_fields(&self.fields, &ancestors);
        let methods = merge_methods(&self.methods, &ancestors);
        let attributes = merge_attributes(&self.attributes, &ancestors);
        check_methods(&self.name, &fields, &methods)?;

        let schema = Schema {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            name: self.name,
            bases: self.bases,
            ancestors,
            declared_fields: self.fields,
            declared_methods: self.methods,
            declared_attributes: self.attributes,
            fields,
            methods,
            attributes,
        };

        debug!(
            schema = %schema.name,
            linearization = ?schema.linearization(),
            fields = schema.fields.len(),
            "Built schema"
        );

        Ok(Arc::new(schema))
    }
}
