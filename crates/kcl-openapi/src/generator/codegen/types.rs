use itertools::Itertools;
use serde_json::Value;

use super::values::{quote_string, to_kcl_value};
use crate::generator::{
  formats::{ANY_TYPE, INT_OR_STRING_TYPE},
  model::GenSchema,
};

const SCALAR_TYPES: &[&str] = &["str", "int", "float", "bool", INT_OR_STRING_TYPE];

fn is_scalar(kcl_type: &str) -> bool {
  SCALAR_TYPES.contains(&kcl_type)
}

/// `"a" | "b" | 1`
pub(crate) fn literal_union(values: &[Value]) -> String {
  values.iter().map(to_kcl_value).join(" | ")
}

/// The type expression written after an attribute name.
///
/// Enums over scalars become literal unions and read-only string defaults pin the
/// attribute to that literal.
pub(crate) fn attribute_type(schema: &GenSchema) -> String {
  if schema.read_only
    && let Some(Value::String(fixed)) = &schema.default
  {
    return quote_string(fixed);
  }
  if !schema.validations.enum_values.is_empty() && is_scalar(&schema.resolved.kcl_type) {
    return literal_union(&schema.validations.enum_values);
  }
  if schema.resolved.is_array
    && !schema.items_enum.is_empty()
    && schema
      .items
      .as_deref()
      .is_some_and(|items| is_scalar(&items.resolved.kcl_type))
  {
    return format!("[{}]", literal_union(&schema.items_enum));
  }
  type_expression(schema)
}

/// The plain KCL type of a schema, `any` when nothing more specific is known.
pub(crate) fn type_expression(schema: &GenSchema) -> String {
  if schema.resolved.kcl_type.is_empty() {
    ANY_TYPE.to_string()
  } else {
    schema.resolved.kcl_type.clone()
  }
}

/// Right-hand side of `type Name = ...` for definitions that are not schemas.
pub(crate) fn alias_target(schema: &GenSchema) -> String {
  if !schema.validations.enum_values.is_empty() && is_scalar(&schema.resolved.kcl_type) {
    return literal_union(&schema.validations.enum_values);
  }
  attribute_type(schema)
}

/// True when a definition renders as `type Name = T` rather than a schema.
pub(crate) fn is_type_alias(schema: &GenSchema, declared_name: &str) -> bool {
  schema.properties.is_empty()
    && schema.all_of.is_empty()
    && !schema.is_additional_properties
    && !schema.resolved.is_tuple
    && !schema.resolved.kcl_type.is_empty()
    && schema.resolved.kcl_type != declared_name
}
