//! Error types for schema composition and serialization

use thiserror::Error;

/// Errors raised while composing schemas or serializing a source.
///
/// Serialization stops at the first failing field, so a single error is
/// always reported for a given `data()` access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SerializeError {
    /// A value could not be coerced, or `null` reached a required field
    /// whose coercion does real work.
    #[error("Type error: {0}")]
    Type(String),
    /// A required field without a default found no such attribute or key.
    #[error("Missing key: {0}")]
    MissingKey(String),
    /// A method or attribute referenced by a field does not exist.
    #[error("Attribute lookup failed: {0}")]
    AttributeLookup(String),
    /// The schema hierarchy cannot be linearized.
    #[error("Invalid composition: {0}")]
    Composition(String),
}

/// Coarse classification of a [`SerializeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Type,
    MissingKey,
    AttributeLookup,
    Composition,
}

impl SerializeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SerializeError::Type(_) => ErrorKind::Type,
            SerializeError::MissingKey(_) => ErrorKind::MissingKey,
            SerializeError::AttributeLookup(_) => ErrorKind::AttributeLookup,
            SerializeError::Composition(_) => ErrorKind::Composition,
        }
    }

    /// Prefix the message with the name of the field that failed.
    pub fn in_field(self, field: &str) -> Self {
        match self {
            SerializeError::Type(msg) => SerializeError::Type(format!("field '{}': {}", field, msg)),
            SerializeError::MissingKey(msg) => {
                SerializeError::MissingKey(format!("field '{}': {}", field, msg))
            }
            SerializeError::AttributeLookup(msg) => {
                SerializeError::AttributeLookup(format!("field '{}': {}", field, msg))
            }
            // Composition errors never originate from a single field.
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SerializeError>;
