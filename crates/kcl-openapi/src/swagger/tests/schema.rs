use serde_json::json;

use crate::{
  generator::errors::GenerationError,
  swagger::{
    SwaggerDocument,
    schema::{Schema, SchemaItems, SchemaOrBool, TypeOverride},
  },
  tests::common::create_schema,
};

#[test]
fn test_type_keyword_forms() {
  let single = create_schema(json!({"type": "string"}));
  assert_eq!(single.schema_type.as_slice(), ["string"]);

  let many = create_schema(json!({"type": ["string", "integer"]}));
  assert_eq!(many.schema_type.as_slice().len(), 2);
  assert!(many.is_type("integer"));

  let none = create_schema(json!({}));
  assert!(none.schema_type.is_empty());
  assert!(none.is_object_type());
}

#[test]
fn test_items_and_additional_forms() {
  let schema = create_schema(json!({
    "type": "array",
    "items": [{"type": "string"}, {"type": "integer"}],
    "additionalItems": false,
  }));
  assert!(matches!(schema.items, Some(SchemaItems::Tuple(ref items)) if items.len() == 2));
  assert_eq!(schema.tuple_items().map(<[Schema]>::len), Some(2));
  assert!(schema.single_items().is_none());
  assert!(!schema.has_additional_items());

  let map = create_schema(json!({"additionalProperties": {"type": "string"}}));
  assert!(map.has_additional_properties());
  assert!(matches!(map.additional_properties, Some(SchemaOrBool::Schema(_))));

  let open = create_schema(json!({"additionalProperties": true}));
  assert!(open.has_additional_properties());
  assert!(open.additional_properties.as_ref().unwrap().as_schema().is_none());

  let closed = create_schema(json!({"additionalProperties": false}));
  assert!(closed.additional_properties.as_ref().unwrap().is_denied());
}

#[test]
fn test_vendor_hints() {
  let schema = create_schema(json!({
    "type": "object",
    "x-kcl-name": "Renamed",
    "x-schema": "dog",
    "x-order": "2",
    "x-omitempty": false,
    "x-kubernetes-int-or-string": true,
    "x-kcl-type": {"type": "Quantity", "import": {"package": "k8s.api.resource.quantity", "alias": "res"}},
    "x-unrelated": 1,
    "unknownKeyword": 1,
  }));

  let hints = &schema.hints;
  assert_eq!(hints.kcl_name.as_deref(), Some("Renamed"));
  assert_eq!(hints.discriminator_value.as_deref(), Some("dog"));
  assert_eq!(hints.order, Some(2.0));
  assert_eq!(hints.omit_empty, Some(false));
  assert!(hints.int_or_string);
  assert_eq!(
    hints.type_override,
    TypeOverride::UseExisting {
      name: "Quantity".to_string(),
      import_path: Some("k8s.api.resource.quantity".to_string()),
      import_alias: Some("res".to_string()),
    }
  );
  assert!(schema.extensions.contains_key("x-unrelated"));
  assert!(!schema.extensions.contains_key("unknownKeyword"));
  assert_eq!(schema.kcl_name_or("Fallback"), "Renamed");
}

#[test]
fn test_invalid_extensions_are_rejected() {
  let cases = [
    json!({"x-order": "first"}),
    json!({"x-order": [1]}),
    json!({"x-kcl-type": {"import": {"package": "a.b"}}}),
  ];
  for input in cases {
    let err = serde_json::from_value::<Schema>(input.clone()).unwrap_err();
    assert!(err.to_string().contains("invalid x-"), "failed for input {input:?}: {err}");
  }
}

#[test]
fn test_empty_strings_are_absent() {
  let schema = create_schema(json!({"format": "", "pattern": "", "discriminator": ""}));
  assert_eq!(schema.format, None);
  assert_eq!(schema.pattern, None);
  assert_eq!(schema.discriminator, None);
}

#[test]
fn test_reference_helpers() {
  let schema = Schema::reference_to("io.k8s.api.core.v1.Pod");
  assert_eq!(schema.reference.as_deref(), Some("#/definitions/io.k8s.api.core.v1.Pod"));
  assert_eq!(schema.reference_name(), Some("io.k8s.api.core.v1.Pod"));
  assert!(!schema.is_object_type());

  let deep = create_schema(json!({"$ref": "#/definitions/Pet/properties/tag"}));
  assert_eq!(deep.reference_name(), None);
}

#[test]
fn test_document() {
  let document: SwaggerDocument = serde_json::from_value(json!({
    "swagger": "2.0",
    "info": {"title": "Petstore", "version": "1.0"},
    "paths": {},
    "definitions": {
      "B": {"type": "string"},
      "A": {"type": "integer"},
    },
  }))
  .unwrap();
  assert_eq!(document.info.map(|info| info.title).as_deref(), Some("Petstore"));
  assert_eq!(document.definitions.keys().collect::<Vec<_>>(), ["B", "A"]);

  let untitled: SwaggerDocument = serde_json::from_value(json!({"swagger": "2.0"})).unwrap();
  assert_eq!(untitled.info, None);
  assert!(untitled.definitions.is_empty());
}

#[test]
fn test_invalid_extension_error_type() {
  let err = GenerationError::InvalidExtension {
    extension: "x-order".to_string(),
    reason: "expected a number".to_string(),
  };
  assert_eq!(err.to_string(), "invalid x-order extension: expected a number");
}
