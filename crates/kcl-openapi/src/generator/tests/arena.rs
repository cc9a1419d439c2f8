use serde_json::json;

use super::create_arena;
use crate::{generator::errors::GenerationError, swagger::schema::Schema};

#[test]
fn test_allocate_name() {
  let mut arena = create_arena(json!({
    "PetCategory": {"type": "string"},
    "PetCategory1": {"type": "string"},
  }));

  assert_eq!(arena.allocate_name("PetOwner"), "PetOwner");
  assert_eq!(arena.allocate_name("PetOwner"), "PetOwner1");
  assert_eq!(arena.allocate_name("PetCategory"), "PetCategory2");
}

#[test]
fn test_hoist() {
  let mut arena = create_arena(json!({"Pet": {"type": "object"}}));

  let name = arena.hoist("PetTag", Schema::typed("string"));
  assert_eq!(name, "PetTag");
  assert!(arena.is_hoisted("PetTag"));
  assert!(!arena.is_hoisted("Pet"));
  assert_eq!(arena.get("PetTag"), Some(&Schema::typed("string")));
  assert_eq!(arena.hoisted(), ["PetTag"]);

  assert_eq!(arena.hoist("PetTag", Schema::typed("integer")), "PetTag1");
}

#[test]
fn test_resolve_ref_follows_chains() {
  let arena = create_arena(json!({
    "A": {"$ref": "#/definitions/B"},
    "B": {"$ref": "#/definitions/C"},
    "C": {"type": "integer"},
  }));

  let resolved = arena.resolve_ref("#/definitions/A").unwrap();
  assert!(resolved.is_type("integer"));

  let direct = arena.lookup("#/definitions/A").unwrap();
  assert_eq!(direct.reference_name(), Some("B"));
}

#[test]
fn test_resolve_ref_errors() {
  let arena = create_arena(json!({
    "Loop": {"$ref": "#/definitions/Loop2"},
    "Loop2": {"$ref": "#/definitions/Loop"},
  }));

  let cases = [
    "#/definitions/Loop",
    "#/definitions/Missing",
    "remote.json#/definitions/Pet",
  ];
  for reference in cases {
    let err = arena.resolve_ref(reference).unwrap_err();
    let ok = match reference {
      "#/definitions/Loop" => matches!(err, GenerationError::CyclicReference { .. }),
      "#/definitions/Missing" => matches!(err, GenerationError::UnresolvedReference { .. }),
      _ => matches!(err, GenerationError::RemoteReference { .. }),
    };
    assert!(ok, "failed for input {reference:?}: {err}");
  }
}
