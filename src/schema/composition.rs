//! Schema composition.
//!
//! A schema's ancestry is linearized with C3, the same ordering used for
//! multiple inheritance method resolution: every schema precedes its bases,
//! direct bases keep their declared order, and a shared ancestor comes after
//! every schema deriving from it. Field, method and attribute tables are then
//! merged along that order with the first (most specific) writer winning.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::types::{MethodFn, Schema};
use crate::error::{Result, SerializeError};
use crate::field::Field;

/// Linearize the ancestry of a schema with the given direct bases.
///
/// The result excludes the schema itself, which always comes first.
pub(crate) fn linearize(name: &str, bases: &[Arc<Schema>]) -> Result<Vec<Arc<Schema>>> {
    let mut seen = HashSet::new();
    for base in bases {
        if !seen.insert(base.id()) {
            return Err(SerializeError::Composition(format!(
                "schema '{}' lists base '{}' more than once",
                name,
                base.name()
            )));
        }
    }

    let mut sequences: Vec<VecDeque<Arc<Schema>>> = bases
        .iter()
        .map(|base| {
            let mut sequence = VecDeque::with_capacity(base.ancestors().len() + 1);
            sequence.push_back(Arc::clone(base));
            sequence.extend(base.ancestors().iter().cloned());
            sequence
        })
        .collect();
    sequences.push(bases.iter().cloned().collect());

    let mut linearization = Vec::new();
    loop {
        sequences.retain(|sequence| !sequence.is_empty());
        if sequences.is_empty() {
            return Ok(linearization);
        }

        // A good head is one that appears in no other sequence's tail.
        let next = sequences
            .iter()
            .filter_map(|sequence| sequence.front())
            .find(|head| {
                !sequences
                    .iter()
                    .any(|sequence| sequence.iter().skip(1).any(|s| s.id() == head.id()))
            })
            .cloned();

        let Some(next) = next else {
            return Err(SerializeError::Composition(format!(
                "cannot linearize bases of schema '{}': inconsistent ordering",
                name
            )));
        };

        for sequence in sequences.iter_mut() {
            if sequence.front().is_some_and(|head| head.id() == next.id()) {
                sequence.pop_front();
            }
        }
        linearization.push(next);
    }
}

/// Merge directly declared fields along the linearization.
///
/// The schema's own fields come first, then each ancestor's fields that are
/// not already present, in linearization order.
pub(crate) fn merge_fields(
    own: &[(String, Field)],
    ancestors: &[Arc<Schema>],
) -> Vec<(String, Field)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();

    let layers = std::iter::once(own).chain(ancestors.iter().map(|a| a.declared_fields()));
    for layer in layers {
        for (name, field) in layer {
            if seen.insert(name.as_str()) {
                merged.push((name.clone(), field.clone()));
            }
        }
    }
    merged
}

pub(crate) fn merge_methods(
    own: &HashMap<String, MethodFn>,
    ancestors: &[Arc<Schema>],
) -> HashMap<String, MethodFn> {
    let mut merged = own.clone();
    for ancestor in ancestors {
        for (name, method) in ancestor.declared_methods() {
            merged
                .entry(name.clone())
                .or_insert_with(|| Arc::clone(method));
        }
    }
    merged
}

pub(crate) fn merge_attributes(
    own: &Map<String, Value>,
    ancestors: &[Arc<Schema>],
) -> Map<String, Value> {
    let mut merged = own.clone();
    for ancestor in ancestors {
        for (name, value) in ancestor.declared_attributes() {
            if !merged.contains_key(name) {
                merged.insert(name.clone(), value.clone());
            }
        }
    }
    merged
}

/// Check that every method field refers to a registered method.
pub(crate) fn check_methods(
    name: &str,
    fields: &[(String, Field)],
    methods: &HashMap<String, MethodFn>,
) -> Result<()> {
    for (declared, field) in fields {
        if let Some(method) = field.method_name(declared) {
            if !methods.contains_key(&method) {
                return Err(SerializeError::AttributeLookup(format!(
                    "schema '{}' has no method '{}' for field '{}'",
                    name, method, declared
                )));
            }
        }
    }
    Ok(())
}
