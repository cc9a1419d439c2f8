use std::{cmp::Ordering, collections::BTreeMap};

use serde_json::Value;
use strum::Display;

use super::{
  errors::{GenerationError, GenerationResult},
  formats::{self, ANY_TYPE},
};
use crate::swagger::schema::Schema;

/// The primary structural category of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TypeCategory {
  #[strum(to_string = "primitive")]
  Primitive,
  #[strum(to_string = "array")]
  Array,
  #[strum(to_string = "tuple")]
  Tuple,
  #[strum(to_string = "map")]
  Map,
  #[strum(to_string = "object")]
  ComplexObject,
}

/// What the type classifier decided about a schema.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ResolvedType {
  pub is_anonymous: bool,
  pub is_array: bool,
  pub is_map: bool,
  pub is_tuple: bool,
  pub is_primitive: bool,
  pub is_complex_object: bool,
  pub is_base_type: bool,
  pub has_discriminator: bool,
  pub has_additional_items: bool,
  pub is_nullable: bool,
  pub kcl_type: String,
  /// Package the type lives in, empty for builtins and types local to the file.
  pub pkg: String,
  pub pkg_alias: String,
  pub module: String,
  pub swagger_type: String,
  pub swagger_format: String,
  pub elem_type: Option<Box<ResolvedType>>,
}

impl ResolvedType {
  pub fn any() -> Self {
    Self {
      kcl_type: ANY_TYPE.to_string(),
      ..Default::default()
    }
  }

  /// Tuple, array and map win over the scalar and object flags.
  pub fn category(&self) -> TypeCategory {
    if self.is_tuple {
      TypeCategory::Tuple
    } else if self.is_array {
      TypeCategory::Array
    } else if self.is_map {
      TypeCategory::Map
    } else if self.is_primitive {
      TypeCategory::Primitive
    } else {
      TypeCategory::ComplexObject
    }
  }
}

/// Validation constraints carried over from a schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SharedValidations {
  pub maximum: Option<f64>,
  pub exclusive_maximum: bool,
  pub minimum: Option<f64>,
  pub exclusive_minimum: bool,
  pub multiple_of: Option<f64>,
  pub max_length: Option<u64>,
  pub min_length: Option<u64>,
  pub pattern: Option<String>,
  pub max_items: Option<u64>,
  pub min_items: Option<u64>,
  pub unique_items: bool,
  pub enum_values: Vec<Value>,
  pub has_validations: bool,
  pub has_slice_validations: bool,
}

impl SharedValidations {
  /// Copies constraints from `schema`. Length and pattern are dropped for formats that
  /// serialize as opaque strings. Enum values are taken as given; see [`prune_enum`].
  pub fn from_schema(schema: &Schema) -> Self {
    let drop_string_checks = schema.format.as_deref().is_some_and(formats::drops_string_validations);
    let mut validations = Self {
      maximum: schema.maximum,
      exclusive_maximum: schema.exclusive_maximum,
      minimum: schema.minimum,
      exclusive_minimum: schema.exclusive_minimum,
      multiple_of: schema.multiple_of,
      max_length: schema.max_length.filter(|_| !drop_string_checks),
      min_length: schema.min_length.filter(|_| !drop_string_checks),
      pattern: schema.pattern.clone().filter(|_| !drop_string_checks),
      max_items: schema.max_items,
      min_items: schema.min_items,
      unique_items: schema.unique_items,
      enum_values: schema.enum_values.clone(),
      has_validations: false,
      has_slice_validations: false,
    };
    validations.refresh_flags();
    validations
  }

  /// Recomputes the presence flags after constraints were edited.
  pub fn refresh_flags(&mut self) {
    self.has_slice_validations =
      self.max_items.is_some() || self.min_items.is_some() || self.unique_items || !self.enum_values.is_empty();
    self.has_validations = self.has_scalar_constraints() || self.has_slice_validations;
  }

  fn has_scalar_constraints(&self) -> bool {
    self.maximum.is_some()
      || self.minimum.is_some()
      || self.multiple_of.is_some()
      || self.max_length.is_some()
      || self.min_length.is_some()
      || self.pattern.is_some()
  }

  /// Fills every unset constraint from `other`.
  pub fn inherit_from(&mut self, other: &SharedValidations) {
    if self.maximum.is_none() {
      self.maximum = other.maximum;
      self.exclusive_maximum = other.exclusive_maximum;
    }
    if self.minimum.is_none() {
      self.minimum = other.minimum;
      self.exclusive_minimum = other.exclusive_minimum;
    }
    self.multiple_of = self.multiple_of.or(other.multiple_of);
    self.max_length = self.max_length.or(other.max_length);
    self.min_length = self.min_length.or(other.min_length);
    if self.pattern.is_none() {
      self.pattern.clone_from(&other.pattern);
    }
    self.max_items = self.max_items.or(other.max_items);
    self.min_items = self.min_items.or(other.min_items);
    self.unique_items |= other.unique_items;
    if self.enum_values.is_empty() {
      self.enum_values.clone_from(&other.enum_values);
    }
    self.has_validations |= other.has_validations;
    self.has_slice_validations |= other.has_slice_validations;
  }
}

/// True when the schema declares any constraint that needs a check.
pub(crate) fn has_validations(schema: &Schema) -> bool {
  SharedValidations::from_schema(schema).has_validations
}

pub(crate) fn has_slice_validations(schema: &Schema) -> bool {
  schema.max_items.is_some() || schema.min_items.is_some() || schema.unique_items || !schema.enum_values.is_empty()
}

/// Drops `null` entries from an enum and rejects values without a scalar literal form.
///
/// Returns the kept values and whether a null entry was removed.
pub(crate) fn prune_enum(values: &[Value], path: &str) -> GenerationResult<(Vec<Value>, bool)> {
  let mut kept = Vec::with_capacity(values.len());
  let mut dropped_null = false;
  for value in values {
    match value {
      Value::Null => dropped_null = true,
      Value::Array(_) | Value::Object(_) => {
        return Err(GenerationError::ComplexEnumValue { path: path.to_string() });
      }
      scalar => kept.push(scalar.clone()),
    }
  }
  Ok((kept, dropped_null))
}

/// Sorts object keys recursively unless document order should be kept.
pub(crate) fn order_value(value: &Value, keep_order: bool) -> Value {
  if keep_order {
    return value.clone();
  }
  match value {
    Value::Object(map) => {
      let mut entries = map.iter().collect::<Vec<_>>();
      entries.sort_by(|(a, _), (b, _)| a.cmp(b));
      Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), order_value(v, false))).collect())
    }
    Value::Array(items) => Value::Array(items.iter().map(|item| order_value(item, false)).collect()),
    other => other.clone(),
  }
}

/// One node of the generation model, consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenSchema {
  pub resolved: ResolvedType,
  pub validations: SharedValidations,
  /// Definition this node refers to, when it was built from a `$ref`.
  pub reference: Option<String>,
  pub original_name: String,
  pub name: String,
  pub escaped_name: String,
  pub suffix: String,
  pub path: String,
  pub value_expression: String,
  pub index_var: String,
  pub key_var: String,
  pub receiver_name: String,
  pub title: Option<String>,
  pub description: Option<String>,
  pub required: bool,
  pub read_only: bool,
  pub is_exported: bool,
  pub is_virtual: bool,
  pub items: Option<Box<GenSchema>>,
  pub has_additional_items: bool,
  pub additional_items: Option<Box<GenSchema>>,
  pub properties: Vec<GenSchema>,
  pub all_of: Vec<GenSchema>,
  pub has_additional_properties: bool,
  pub is_additional_properties: bool,
  pub additional_properties_denied: bool,
  pub additional_properties: Option<Box<GenSchema>>,
  pub strict_additional_properties: bool,
  pub is_base_type: bool,
  pub has_base_type: bool,
  pub is_sub_type: bool,
  pub discriminator_field: Option<String>,
  pub discriminator_value: Option<String>,
  /// Discriminator value to concrete type name, for polymorphic bases.
  pub discriminates: BTreeMap<String, String>,
  pub default: Option<Value>,
  pub example: Option<Value>,
  pub items_enum: Vec<Value>,
  pub extensions: BTreeMap<String, Value>,
  pub order: Option<f64>,
  pub position: usize,
}

impl GenSchema {
  /// True when validations are present here or on a structural child.
  pub fn carries_validations(&self) -> bool {
    self.validations.has_validations
      || self
        .additional_properties
        .as_ref()
        .is_some_and(|ap| ap.validations.has_validations)
      || self
        .additional_items
        .as_ref()
        .is_some_and(|ai| ai.validations.has_validations)
      || self.all_of.iter().any(|branch| branch.validations.has_validations)
  }
}

/// Index of the composition branch rendered as the parent schema: the first referenced
/// polymorphic base, otherwise the first referenced object.
pub(crate) fn parent_branch(schema: &GenSchema) -> Option<usize> {
  let referenced = |branch: &GenSchema| branch.reference.is_some() && branch.resolved.is_complex_object;
  schema
    .all_of
    .iter()
    .position(|branch| referenced(branch) && branch.is_base_type)
    .or_else(|| schema.all_of.iter().position(referenced))
}

/// Orders properties: explicit `x-order` first, then declaration order or name.
pub(crate) fn sort_properties(properties: &mut [GenSchema], keep_order: bool) {
  let fallback = |a: &GenSchema, b: &GenSchema| {
    if keep_order {
      a.position.cmp(&b.position)
    } else {
      a.name.cmp(&b.name)
    }
  };
  properties.sort_by(|a, b| match (a.order, b.order) {
    (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| fallback(a, b)),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => fallback(a, b),
  });
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportStmt {
  pub import_path: String,
  pub as_name: String,
  pub must_as_name: bool,
}

/// Everything the renderer needs for one output file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenDefinition {
  pub package: String,
  /// Package path the definition lives in; imports are computed relative to it.
  pub pkg: String,
  pub schema: GenSchema,
  pub extra_schemas: Vec<GenSchema>,
  pub depends_on: Vec<String>,
  pub imports: Vec<ImportStmt>,
}
