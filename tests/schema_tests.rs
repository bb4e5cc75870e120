//! Tests for schema declaration and composition.

use std::sync::Arc;

use barq::*;
use serde_json::json;

fn leaf(name: &str, fields: &[&str]) -> Arc<Schema> {
    fields
        .iter()
        .fold(Schema::builder(name), |builder, field| {
            builder.field(*field, Field::new())
        })
        .build()
        .unwrap()
}

fn field_names(schema: &Schema) -> Vec<&str> {
    schema.fields().map(|(name, _)| name).collect()
}

// ============================================================================
// Field Set Merging
// ============================================================================

#[test]
fn test_direct_fields_only() {
    let schema = leaf("A", &["a", "b"]);
    assert_eq!(field_names(&schema), vec!["a", "b"]);
    assert_eq!(schema.declared_fields().len(), 2);
    assert!(schema.bases().is_empty());
}

#[test]
fn test_most_derived_first_order() {
    let a = leaf("A", &["a"]);
    let ab = Schema::builder("AB")
        .extends(&a)
        .field("b", Field::new())
        .build()
        .unwrap();
    let c = leaf("C", &["c"]);
    let abc = Schema::builder("ABC").extends(&ab).extends(&c).build().unwrap();

    assert_eq!(field_names(&ab), vec!["b", "a"]);
    assert_eq!(field_names(&abc), vec!["b", "a", "c"]);
    assert!(abc.declared_fields().is_empty());
}

#[test]
fn test_direct_declaration_beats_every_base() {
    let a = Schema::builder("A")
        .field("x", Field::int())
        .build()
        .unwrap();
    let b = Schema::builder("B")
        .field("x", Field::float())
        .build()
        .unwrap();
    let derived = Schema::builder("Derived")
        .extends(&a)
        .extends(&b)
        .field("x", Field::str())
        .build()
        .unwrap();

    let data = Serializer::new(derived, json!({"x": 1})).into_data().unwrap();
    assert_eq!(data, json!({"x": "1"}));
}

#[test]
fn test_no_duplicate_fields_from_shared_ancestor() {
    let base = leaf("Base", &["id"]);
    let left = Schema::builder("Left").extends(&base).build().unwrap();
    let right = Schema::builder("Right").extends(&base).build().unwrap();
    let both = Schema::builder("Both")
        .extends(&left)
        .extends(&right)
        .build()
        .unwrap();

    assert_eq!(field_names(&both), vec!["id"]);
}

#[test]
fn test_diamond_override_follows_linearization() {
    let base = Schema::builder("Base")
        .field("kind", Field::new().with_default("base"))
        .build()
        .unwrap();
    let left = Schema::builder("Left").extends(&base).build().unwrap();
    let right = Schema::builder("Right")
        .extends(&base)
        .field("kind", Field::new().with_default("right"))
        .build()
        .unwrap();
    let diamond = Schema::builder("Diamond")
        .extends(&left)
        .extends(&right)
        .build()
        .unwrap();

    let data = Serializer::new(diamond, json!({})).into_data().unwrap();
    assert_eq!(data, json!({"kind": "right"}));
}

#[test]
fn test_deep_chain() {
    let mut schema = leaf("L0", &["f0"]);
    for depth in 1..6 {
        schema = Schema::builder(format!("L{}", depth))
            .extends(&schema)
            .field(format!("f{}", depth), Field::new())
            .build()
            .unwrap();
    }

    assert_eq!(
        field_names(&schema),
        vec!["f5", "f4", "f3", "f2", "f1", "f0"]
    );
    assert_eq!(schema.linearization(), vec!["L5", "L4", "L3", "L2", "L1", "L0"]);
}

// ============================================================================
// Composition Errors
// ============================================================================

#[test]
fn test_inconsistent_hierarchy() {
    let a = leaf("A", &[]);
    let b = leaf("B", &[]);
    let ab = Schema::builder("AB").extends(&a).extends(&b).build().unwrap();
    let ba = Schema::builder("BA").extends(&b).extends(&a).build().unwrap();

    let err = Schema::builder("Broken")
        .extends(&ab)
        .extends(&ba)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);
}

#[test]
fn test_base_listed_before_its_descendant() {
    let a = leaf("A", &["a"]);
    let b = Schema::builder("B").extends(&a).build().unwrap();

    let err = Schema::builder("Bad")
        .extends(&a)
        .extends(&b)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);

    // The other way round is fine.
    assert!(Schema::builder("Good").extends(&b).extends(&a).build().is_ok());
}

#[test]
fn test_duplicate_base() {
    let a = leaf("A", &["a"]);
    let err = Schema::builder("Twice")
        .extends(&a)
        .extends(&a)
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Composition);
}

#[test]
fn test_missing_method_fails_fast() {
    let err = Schema::builder("A")
        .field("a", Field::method())
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttributeLookup);
    assert!(err.to_string().contains("get_a"));

    let err = Schema::builder("A")
        .field("a", Field::method_named("compute"))
        .method("get_a", |_, _| Ok(json!(1)))
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttributeLookup);
}

#[test]
fn test_method_fields_inherit_methods() {
    let base = Schema::builder("Base")
        .field("a", Field::method())
        .method("get_a", |_, _| Ok(json!("base")))
        .build()
        .unwrap();
    let derived = Schema::builder("Derived")
        .extends(&base)
        .method("get_a", |_, _| Ok(json!("derived")))
        .build()
        .unwrap();

    let data = Serializer::new(Arc::clone(&base), json!({})).into_data().unwrap();
    assert_eq!(data, json!({"a": "base"}));
    let data = Serializer::new(derived, json!({})).into_data().unwrap();
    assert_eq!(data, json!({"a": "derived"}));
}
