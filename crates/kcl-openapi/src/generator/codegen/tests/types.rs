use serde_json::json;

use crate::generator::{
  codegen::types::{alias_target, attribute_type, is_type_alias, literal_union, type_expression},
  model::{GenSchema, ResolvedType, SharedValidations},
};

fn typed(kcl_type: &str) -> GenSchema {
  GenSchema {
    resolved: ResolvedType {
      kcl_type: kcl_type.to_string(),
      ..Default::default()
    },
    ..Default::default()
  }
}

#[test]
fn test_literal_union() {
  assert_eq!(literal_union(&[json!("a"), json!(1), json!(true)]), "\"a\" | 1 | True");
}

#[test]
fn test_attribute_type() {
  assert_eq!(attribute_type(&typed("str")), "str");
  assert_eq!(type_expression(&typed("")), "any");

  let mut read_only = typed("str");
  read_only.read_only = true;
  read_only.default = Some(json!("apps/v1"));
  assert_eq!(attribute_type(&read_only), "\"apps/v1\"");

  let mut enumerated = typed("str");
  enumerated.validations = SharedValidations {
    enum_values: vec![json!("a"), json!("b")],
    ..Default::default()
  };
  assert_eq!(attribute_type(&enumerated), "\"a\" | \"b\"");

  let mut object_enum = typed("Pet");
  object_enum.validations.enum_values = vec![json!("a")];
  assert_eq!(attribute_type(&object_enum), "Pet");

  let mut array = typed("[str]");
  array.resolved.is_array = true;
  array.items = Some(Box::new(typed("str")));
  array.items_enum = vec![json!("x"), json!("y")];
  assert_eq!(attribute_type(&array), "[\"x\" | \"y\"]");
}

#[test]
fn test_alias_target() {
  let mut int_enum = typed("int");
  int_enum.validations.enum_values = vec![json!(1), json!(2)];
  assert_eq!(alias_target(&int_enum), "1 | 2");
  assert_eq!(alias_target(&typed("{str:str}")), "{str:str}");
}

#[test]
fn test_is_type_alias() {
  assert!(is_type_alias(&typed("str"), "Name"));
  assert!(is_type_alias(&typed("Names"), "Foo"));
  assert!(!is_type_alias(&typed("Foo"), "Foo"));
  assert!(!is_type_alias(&typed(""), "Foo"));

  let mut object = typed("Pet");
  object.properties.push(typed("str"));
  assert!(!is_type_alias(&object, "Pet"));

  let mut tuple = typed("Point");
  tuple.resolved.is_tuple = true;
  assert!(!is_type_alias(&tuple, "Other"));
}
