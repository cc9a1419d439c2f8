use std::collections::BTreeMap;

use serde_json::json;

use super::create_arena;
use crate::{
  generator::{
    errors::GenerationError,
    model::TypeCategory,
    options::GenerateOptions,
    type_resolver::{SchemaAnalysis, TypeResolver},
  },
  tests::common::{create_schema, default_options},
};

#[test]
fn test_primitive_types() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let cases = [
    (json!({"type": "string"}), "str"),
    (json!({"type": "integer"}), "int"),
    (json!({"type": "number"}), "float"),
    (json!({"type": "boolean"}), "bool"),
    (json!({"type": "string", "format": "date-time"}), "str"),
    (json!({"type": "integer", "format": "int64"}), "int"),
    (json!({"type": "number", "format": "double"}), "float"),
    (json!({"type": ["string", "integer"]}), "int | str"),
    (json!({"type": ["integer", "string"]}), "int | str"),
    (json!({"type": "string", "format": "int-or-string"}), "int | str"),
    (json!({"x-kubernetes-int-or-string": true}), "int | str"),
  ];
  for (input, expected) in cases {
    let resolved = resolver.resolve_schema(&create_schema(input.clone()), true, false).unwrap();
    assert!(resolved.is_primitive, "failed for input {input:?}");
    assert_eq!(resolved.kcl_type, expected, "failed for input {input:?}");
    assert_eq!(resolved.category(), TypeCategory::Primitive, "failed for input {input:?}");
  }
}

#[test]
fn test_container_types() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let cases = [
    (json!({"type": "array", "items": {"type": "string"}}), "[str]", TypeCategory::Array),
    (json!({"type": "array"}), "[any]", TypeCategory::Array),
    (
      json!({"type": "array", "items": {"type": "array", "items": {"type": "integer"}}}),
      "[[int]]",
      TypeCategory::Array,
    ),
    (
      json!({"type": "object", "additionalProperties": {"type": "integer"}}),
      "{str:int}",
      TypeCategory::Map,
    ),
    (json!({"type": "object"}), "any", TypeCategory::Map),
    (json!({}), "any", TypeCategory::Map),
  ];
  for (input, expected, category) in cases {
    let resolved = resolver.resolve_schema(&create_schema(input.clone()), true, false).unwrap();
    assert_eq!(resolved.kcl_type, expected, "failed for input {input:?}");
    assert_eq!(resolved.category(), category, "failed for input {input:?}");
  }
}

#[test]
fn test_anonymous_object_with_properties() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");
  let schema = create_schema(json!({"type": "object", "properties": {"id": {"type": "integer"}}}));

  let resolved = resolver.resolve_schema(&schema, true, false).unwrap();
  assert!(resolved.is_complex_object);
  assert!(resolved.is_anonymous);
  assert!(resolved.is_nullable);
  assert!(resolved.kcl_type.is_empty());
  assert_eq!(resolved.category(), TypeCategory::ComplexObject);
}

#[test]
fn test_tuple_is_not_an_array() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");
  let schema = create_schema(json!({"type": "array", "items": [{"type": "string"}, {"type": "integer"}]}));

  let resolved = resolver.resolve_schema(&schema, true, false).unwrap();
  assert!(resolved.is_tuple);
  assert!(!resolved.is_array);
  assert_eq!(resolved.category(), TypeCategory::Tuple);
}

#[test]
fn test_reference_resolves_to_definition_name() {
  let arena = create_arena(json!({
    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
    "io.k8s.api.core.v1.Pod": {"type": "object", "properties": {"spec": {"type": "object"}}},
    "cron-tab": {"type": "object", "properties": {"schedule": {"type": "string"}}},
    "Renamed": {"type": "object", "x-kcl-name": "Animal", "properties": {"name": {"type": "string"}}},
  }));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let cases = [
    ("Pet", "Pet", "models", "pet"),
    ("io.k8s.api.core.v1.Pod", "Pod", "models.io.k8s.api.core.v1", "pod"),
    ("cron-tab", "cron_tab", "models", "cron_tab"),
    ("Renamed", "Animal", "models", "renamed"),
  ];
  for (name, kcl_type, pkg, module) in cases {
    let schema = create_schema(json!({"$ref": format!("#/definitions/{name}")}));
    let resolved = resolver.resolve_schema(&schema, true, false).unwrap();
    assert_eq!(resolved.kcl_type, kcl_type, "failed for input {name:?}");
    assert_eq!(resolved.pkg, pkg, "failed for input {name:?}");
    assert_eq!(resolved.module, module, "failed for input {name:?}");
    assert!(resolved.is_complex_object, "failed for input {name:?}");
  }
}

#[test]
fn test_package_map_rewrites_namespace() {
  let arena = create_arena(json!({
    "io.k8s.api.core.v1.Pod": {"type": "object", "properties": {"spec": {"type": "object"}}},
  }));
  let options = GenerateOptions::builder()
    .package_map(BTreeMap::from([(
      "io.k8s.api.core.v1".to_string(),
      "k8s.api.core.v1".to_string(),
    )]))
    .build();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let schema = create_schema(json!({"$ref": "#/definitions/io.k8s.api.core.v1.Pod"}));
  let resolved = resolver.resolve_schema(&schema, true, false).unwrap();
  assert_eq!(resolved.pkg, "models.k8s.api.core.v1");
  assert_eq!(resolved.pkg_alias, "v1");
}

#[test]
fn test_kcl_type_override() {
  let arena = create_arena(json!({
    "Quantity": {
      "type": "string",
      "x-kcl-type": {
        "type": "Quantity",
        "import": {"package": "k8s.apimachinery.pkg.api.resource.quantity", "alias": "resource"},
      },
    },
    "Local": {"type": "object", "x-kcl-type": {"type": "Existing"}},
  }));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let quantity = resolver
    .resolve_schema(&create_schema(json!({"$ref": "#/definitions/Quantity"})), true, false)
    .unwrap();
  assert_eq!(quantity.kcl_type, "Quantity");
  assert_eq!(quantity.pkg, "k8s.apimachinery.pkg.api.resource");
  assert_eq!(quantity.pkg_alias, "resource");
  assert_eq!(quantity.module, "resource");
  assert!(quantity.is_primitive);

  let local = resolver
    .resolve_schema(&create_schema(json!({"$ref": "#/definitions/Local"})), true, false)
    .unwrap();
  assert_eq!(local.kcl_type, "Existing");
  assert!(local.pkg.is_empty());
}

#[test]
fn test_recursive_map_terminates() {
  let arena = create_arena(json!({
    "Tree": {"type": "object", "additionalProperties": {"$ref": "#/definitions/Tree"}},
  }));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let resolved = resolver
    .resolve_schema(&create_schema(json!({"$ref": "#/definitions/Tree"})), true, false)
    .unwrap();
  assert_eq!(resolved.kcl_type, "Tree");
  assert_eq!(resolved.elem_type.as_ref().unwrap().kcl_type, "Tree");
}

#[test]
fn test_named_map_is_spelled_structurally() {
  let arena = create_arena(json!({
    "Labels": {"type": "object", "additionalProperties": {"type": "string"}},
  }));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Labels");
  let schema = arena.get("Labels").unwrap();

  let resolved = resolver.resolve_schema(schema, false, true).unwrap();
  assert!(resolved.is_map);
  assert_eq!(resolved.kcl_type, "{str:str}");
  assert!(resolved.pkg.is_empty());
  assert_eq!(resolver.model_type_name(), "Labels");
}

#[test]
fn test_unsupported_type_list() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Bad").at("\"Bad\".\"value\"");
  let schema = create_schema(json!({"type": ["string", "boolean"]}));

  let err = resolver.resolve_schema(&schema, true, false).unwrap_err();
  let GenerationError::UnsupportedTypes { path, types, format } = err else {
    panic!("expected UnsupportedTypes, got {err:?}");
  };
  assert_eq!(path, "\"Bad\".\"value\"");
  assert_eq!(types, ["string", "boolean"]);
  assert_eq!(format, None);
}

#[test]
fn test_unresolved_and_remote_references() {
  let arena = create_arena(json!({}));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "Test");

  let missing = resolver
    .resolve_schema(&create_schema(json!({"$ref": "#/definitions/Missing"})), true, false)
    .unwrap_err();
  assert!(matches!(missing, GenerationError::UnresolvedReference { .. }));

  let remote = resolver
    .resolve_schema(&create_schema(json!({"$ref": "other.json#/definitions/Pet"})), true, false)
    .unwrap_err();
  assert!(matches!(remote, GenerationError::RemoteReference { .. }));
}

#[test]
fn test_model_type_name_uses_short_name() {
  let arena = create_arena(json!({
    "stable.example.com.v1.CronTab": {"type": "object"},
  }));
  let options = default_options();
  let resolver = TypeResolver::new(&arena, &options, "stable.example.com.v1.CronTab");
  assert_eq!(resolver.model_type_name(), "CronTab");
}

#[test]
fn test_schema_analysis() {
  let arena = create_arena(json!({
    "Names": {"type": "array", "items": {"type": "string"}},
    "Labels": {"type": "object", "additionalProperties": {"type": "string"}},
    "Pets": {"type": "object", "additionalProperties": {"$ref": "#/definitions/Pet"}},
    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}},
    "Animal": {"type": "object", "discriminator": "kind", "properties": {"kind": {"type": "string"}}},
    "Empty": {"type": "object"},
  }));

  let analyze = |name: &str| {
    let schema = create_schema(json!({"$ref": format!("#/definitions/{name}")}));
    SchemaAnalysis::analyze(&schema, &arena).unwrap()
  };

  let names = analyze("Names");
  assert!(names.is_array && names.is_simple_schema);

  let labels = analyze("Labels");
  assert!(labels.is_map && labels.is_simple_schema);

  let pets = analyze("Pets");
  assert!(pets.is_map && !pets.is_simple_schema);

  let pet = analyze("Pet");
  assert!(!pet.is_known_type && !pet.is_simple_schema);

  let animal = analyze("Animal");
  assert!(animal.is_base_type);

  let empty = analyze("Empty");
  assert!(empty.is_known_type && empty.is_simple_schema);
}
