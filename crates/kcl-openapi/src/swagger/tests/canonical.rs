use serde_json::json;

use crate::{
  generator::errors::GenerationError,
  swagger::canonical::canonicalize,
  tests::common::create_definitions,
};

#[test]
fn test_local_references_are_kept() {
  let definitions = create_definitions(json!({
    "Pet": {"type": "object", "properties": {"owner": {"$ref": "#/definitions/Owner"}}},
    "Owner": {"type": "object"},
  }));
  let output = canonicalize(definitions.clone()).unwrap();
  assert_eq!(output, definitions);
}

#[test]
fn test_deep_pointer_is_relocated() {
  let definitions = create_definitions(json!({
    "Pet": {
      "type": "object",
      "properties": {"tag": {"type": "object", "properties": {"name": {"type": "string"}}}},
    },
    "Store": {
      "type": "object",
      "properties": {
        "featured": {"$ref": "#/definitions/Pet/properties/tag"},
        "again": {"$ref": "#/definitions/Pet/properties/tag"},
      },
    },
  }));

  let output = canonicalize(definitions).unwrap();
  assert_eq!(output.keys().collect::<Vec<_>>(), ["Pet", "Store", "PetTag"]);
  let store = &output["Store"];
  assert_eq!(store.properties["featured"].reference_name(), Some("PetTag"));
  assert_eq!(store.properties["again"].reference_name(), Some("PetTag"));
  assert!(output["PetTag"].properties.contains_key("name"));
}

#[test]
fn test_relocated_name_avoids_collisions() {
  let definitions = create_definitions(json!({
    "PetTag": {"type": "string"},
    "Pet": {
      "type": "object",
      "properties": {"tag": {"type": "integer"}},
    },
    "Store": {"$ref": "#/definitions/Pet/properties/tag"},
  }));

  let output = canonicalize(definitions).unwrap();
  assert_eq!(output["Store"].reference_name(), Some("PetTag1"));
  assert!(output["PetTag1"].is_type("integer"));
}

#[test]
fn test_item_pointers() {
  let definitions = create_definitions(json!({
    "Pets": {"type": "array", "items": {"type": "object", "properties": {"id": {"type": "integer"}}}},
    "First": {"$ref": "#/definitions/Pets/items"},
  }));

  let output = canonicalize(definitions).unwrap();
  assert_eq!(output["First"].reference_name(), Some("Pets1"));
  assert!(output["Pets1"].properties.contains_key("id"));
}

#[test]
fn test_reference_errors() {
  let cases = [
    (json!({"A": {"$ref": "other.json#/definitions/B"}}), "remote"),
    (json!({"A": {"$ref": "#/definitions/Missing"}}), "unresolved"),
    (json!({"A": {"$ref": "#/definitions/B/properties/x"}, "B": {"type": "object"}}), "unresolved"),
    (json!({"A": {"$ref": "#/parameters/limit"}}), "unresolved"),
    (json!({"A": {"$ref": "#/definitions/B"}, "B": {"$ref": "#/definitions/A"}}), "cyclic"),
  ];

  for (input, expected) in cases {
    let err = canonicalize(create_definitions(input.clone())).unwrap_err();
    let matched = match expected {
      "remote" => matches!(err, GenerationError::RemoteReference { .. }),
      "unresolved" => matches!(err, GenerationError::UnresolvedReference { .. }),
      _ => matches!(err, GenerationError::CyclicReference { .. }),
    };
    assert!(matched, "failed for input {input:?}: {err}");
  }
}

#[test]
fn test_reference_to_content_is_not_a_loop() {
  let definitions = create_definitions(json!({
    "Alias": {"$ref": "#/definitions/Other"},
    "Other": {"$ref": "#/definitions/Pet"},
    "Pet": {"type": "object", "properties": {"self": {"$ref": "#/definitions/Pet"}}},
  }));
  assert!(canonicalize(definitions).is_ok());
}
