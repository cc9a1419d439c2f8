use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{generator::errors::GenerationError, utils::refs};

pub(crate) const EXT_KCL_NAME: &str = "x-kcl-name";
pub(crate) const EXT_KCL_TYPE: &str = "x-kcl-type";
pub(crate) const EXT_DISCRIMINATOR_VALUE: &str = "x-schema";
pub(crate) const EXT_ORDER: &str = "x-order";
pub(crate) const EXT_OMIT_EMPTY: &str = "x-omitempty";
pub(crate) const EXT_INT_OR_STRING: &str = "x-kubernetes-int-or-string";

/// The `type` keyword, which may hold a single name or a list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct TypeSet(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
  One(String),
  Many(Vec<String>),
}

impl From<OneOrMany> for TypeSet {
  fn from(value: OneOrMany) -> Self {
    match value {
      OneOrMany::One(single) => Self(vec![single]),
      OneOrMany::Many(many) => Self(many),
    }
  }
}

impl TypeSet {
  pub fn single(name: &str) -> Self {
    Self(vec![name.to_string()])
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn first(&self) -> Option<&str> {
    self.0.first().map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.iter().any(|t| t == name)
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }
}

/// `items` is either one schema shared by every element or a positional tuple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
  Tuple(Vec<Schema>),
  Single(Box<Schema>),
}

/// `additionalProperties` and `additionalItems` accept a flag or a nested schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
  Bool(bool),
  Schema(Box<Schema>),
}

impl SchemaOrBool {
  /// True when extra entries are allowed, either unconstrained or by a schema.
  pub fn is_enabled(&self) -> bool {
    match self {
      Self::Bool(allows) => *allows,
      Self::Schema(_) => true,
    }
  }

  pub fn as_schema(&self) -> Option<&Schema> {
    match self {
      Self::Bool(_) => None,
      Self::Schema(schema) => Some(schema),
    }
  }

  pub fn is_denied(&self) -> bool {
    matches!(self, Self::Bool(false))
  }
}

/// Declares that a schema maps onto an existing KCL type instead of a generated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeOverride {
  #[default]
  None,
  UseExisting {
    name: String,
    import_path: Option<String>,
    import_alias: Option<String>,
  },
}

/// Vendor extensions the generator understands, decoded once per schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorHints {
  pub kcl_name: Option<String>,
  pub discriminator_value: Option<String>,
  pub order: Option<f64>,
  pub omit_empty: Option<bool>,
  pub int_or_string: bool,
  pub type_override: TypeOverride,
}

#[derive(Deserialize)]
struct KclTypeExtension {
  #[serde(rename = "type")]
  name: String,
  #[serde(default)]
  import: Option<KclImportExtension>,
}

#[derive(Deserialize)]
struct KclImportExtension {
  package: String,
  #[serde(default)]
  alias: Option<String>,
}

impl VendorHints {
  fn from_extensions(extensions: &BTreeMap<String, Value>) -> Result<Self, GenerationError> {
    let type_override = match extensions.get(EXT_KCL_TYPE) {
      None | Some(Value::Null) => TypeOverride::None,
      Some(raw) => {
        let ext: KclTypeExtension =
          serde_json::from_value(raw.clone()).map_err(|err| GenerationError::InvalidExtension {
            extension: EXT_KCL_TYPE.to_string(),
            reason: err.to_string(),
          })?;
        TypeOverride::UseExisting {
          name: ext.name,
          import_path: ext.import.as_ref().map(|i| i.package.clone()),
          import_alias: ext.import.and_then(|i| i.alias),
        }
      }
    };

    let order = match extensions.get(EXT_ORDER) {
      None => None,
      Some(Value::Number(n)) => n.as_f64(),
      Some(Value::String(s)) => Some(s.parse::<f64>().map_err(|err| GenerationError::InvalidExtension {
        extension: EXT_ORDER.to_string(),
        reason: err.to_string(),
      })?),
      Some(other) => {
        return Err(GenerationError::InvalidExtension {
          extension: EXT_ORDER.to_string(),
          reason: format!("expected a number, found {other}"),
        });
      }
    };

    Ok(Self {
      kcl_name: string_extension(extensions, EXT_KCL_NAME),
      discriminator_value: string_extension(extensions, EXT_DISCRIMINATOR_VALUE),
      order,
      omit_empty: extensions.get(EXT_OMIT_EMPTY).and_then(Value::as_bool),
      int_or_string: extensions
        .get(EXT_INT_OR_STRING)
        .and_then(Value::as_bool)
        .unwrap_or_default(),
      type_override,
    })
  }
}

fn string_extension(extensions: &BTreeMap<String, Value>, key: &str) -> Option<String> {
  extensions
    .get(key)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
}

/// A Swagger 2.0 schema object.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawSchema")]
pub struct Schema {
  pub reference: Option<String>,
  pub schema_type: TypeSet,
  pub format: Option<String>,
  pub title: Option<String>,
  pub description: Option<String>,
  pub default: Option<Value>,
  pub example: Option<Value>,
  pub discriminator: Option<String>,
  pub read_only: bool,
  pub required: Vec<String>,
  pub properties: IndexMap<String, Schema>,
  pub items: Option<SchemaItems>,
  pub additional_properties: Option<SchemaOrBool>,
  pub additional_items: Option<SchemaOrBool>,
  pub all_of: Vec<Schema>,
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
  pub extensions: BTreeMap<String, Value>,
  pub hints: VendorHints,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
  #[serde(rename = "$ref", default)]
  reference: Option<String>,
  #[serde(rename = "type", default)]
  schema_type: TypeSet,
  #[serde(default)]
  format: Option<String>,
  #[serde(default)]
  title: Option<String>,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  default: Option<Value>,
  #[serde(default)]
  example: Option<Value>,
  #[serde(default)]
  discriminator: Option<String>,
  #[serde(default)]
  read_only: bool,
  #[serde(default)]
  required: Vec<String>,
  #[serde(default)]
  properties: IndexMap<String, Schema>,
  #[serde(default)]
  items: Option<SchemaItems>,
  #[serde(default)]
  additional_properties: Option<SchemaOrBool>,
  #[serde(default)]
  additional_items: Option<SchemaOrBool>,
  #[serde(default)]
  all_of: Vec<Schema>,
  #[serde(default)]
  maximum: Option<f64>,
  #[serde(default)]
  exclusive_maximum: bool,
  #[serde(default)]
  minimum: Option<f64>,
  #[serde(default)]
  exclusive_minimum: bool,
  #[serde(default)]
  multiple_of: Option<f64>,
  #[serde(default)]
  max_length: Option<u64>,
  #[serde(default)]
  min_length: Option<u64>,
  #[serde(default)]
  pattern: Option<String>,
  #[serde(default)]
  max_items: Option<u64>,
  #[serde(default)]
  min_items: Option<u64>,
  #[serde(default)]
  unique_items: bool,
  #[serde(rename = "enum", default)]
  enum_values: Vec<Value>,
  #[serde(flatten)]
  rest: BTreeMap<String, Value>,
}

impl TryFrom<RawSchema> for Schema {
  type Error = GenerationError;

  fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
    let extensions: BTreeMap<String, Value> = raw.rest.into_iter().filter(|(k, _)| k.starts_with("x-")).collect();
    let hints = VendorHints::from_extensions(&extensions)?;

    Ok(Self {
      reference: raw.reference,
      schema_type: raw.schema_type,
      format: raw.format.filter(|f| !f.is_empty()),
      title: raw.title,
      description: raw.description,
      default: raw.default,
      example: raw.example,
      discriminator: raw.discriminator.filter(|d| !d.is_empty()),
      read_only: raw.read_only,
      required: raw.required,
      properties: raw.properties,
      items: raw.items,
      additional_properties: raw.additional_properties,
      additional_items: raw.additional_items,
      all_of: raw.all_of,
      maximum: raw.maximum,
      exclusive_maximum: raw.exclusive_maximum,
      minimum: raw.minimum,
      exclusive_minimum: raw.exclusive_minimum,
      multiple_of: raw.multiple_of,
      max_length: raw.max_length,
      min_length: raw.min_length,
      pattern: raw.pattern.filter(|p| !p.is_empty()),
      max_items: raw.max_items,
      min_items: raw.min_items,
      unique_items: raw.unique_items,
      enum_values: raw.enum_values,
      extensions,
      hints,
    })
  }
}

impl Schema {
  /// A bare `$ref` to a top-level definition.
  pub fn reference_to(name: &str) -> Self {
    Self {
      reference: Some(refs::definition_ref(name)),
      ..Default::default()
    }
  }

  pub fn typed(type_name: &str) -> Self {
    Self {
      schema_type: TypeSet::single(type_name),
      ..Default::default()
    }
  }

  /// Name of the referenced definition, if this schema is a local reference.
  pub fn reference_name(&self) -> Option<&str> {
    self.reference.as_deref().and_then(refs::parse_definition_ref)
  }

  pub fn is_type(&self, type_name: &str) -> bool {
    self.schema_type.contains(type_name)
  }

  /// True for an untyped schema or one whose types include `object`.
  pub fn is_object_type(&self) -> bool {
    self.reference.is_none() && (self.schema_type.is_empty() || self.is_type("object"))
  }

  pub fn has_additional_properties(&self) -> bool {
    self.additional_properties.as_ref().is_some_and(SchemaOrBool::is_enabled)
  }

  pub fn has_additional_items(&self) -> bool {
    self.additional_items.as_ref().is_some_and(SchemaOrBool::is_enabled)
  }

  pub fn tuple_items(&self) -> Option<&[Schema]> {
    match &self.items {
      Some(SchemaItems::Tuple(items)) => Some(items),
      _ => None,
    }
  }

  pub fn single_items(&self) -> Option<&Schema> {
    match &self.items {
      Some(SchemaItems::Single(item)) => Some(item),
      _ => None,
    }
  }

  /// The `x-kcl-name` override if present, otherwise `fallback`.
  pub fn kcl_name_or(&self, fallback: impl Into<String>) -> String {
    self.hints.kcl_name.clone().unwrap_or_else(|| fallback.into())
  }
}
