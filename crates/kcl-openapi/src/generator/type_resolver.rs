use super::{
  arena::DefinitionArena,
  errors::{GenerationError, GenerationResult},
  formats::{self, ANY_TYPE, INT_OR_STRING_FORMAT, INT_OR_STRING_TYPE},
  model::ResolvedType,
  naming::identifiers::{last_segment, mangle_model_name, split_definition_name, to_file_name},
  options::GenerateOptions,
};
use crate::{
  swagger::schema::{Schema, SchemaOrBool, TypeOverride},
  utils::refs,
};

const MAX_ANALYSIS_DEPTH: usize = 32;

/// The KCL name and home package of a named definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct KnownType {
  pub kcl_type: String,
  pub pkg: String,
  pub pkg_alias: String,
  pub module: String,
}

impl KnownType {
  fn local(kcl_type: String) -> Self {
    Self {
      kcl_type,
      ..Default::default()
    }
  }

  fn apply(self, resolved: &mut ResolvedType) {
    resolved.kcl_type = self.kcl_type;
    resolved.pkg = self.pkg;
    resolved.pkg_alias = self.pkg_alias;
    resolved.module = self.module;
  }
}

/// Classifies schemas into KCL types.
///
/// `model_name` is the definition currently being generated; named objects resolve to it.
pub(crate) struct TypeResolver<'a> {
  arena: &'a DefinitionArena,
  options: &'a GenerateOptions,
  model_name: &'a str,
  path: &'a str,
}

impl<'a> TypeResolver<'a> {
  pub(crate) fn new(arena: &'a DefinitionArena, options: &'a GenerateOptions, model_name: &'a str) -> Self {
    Self {
      arena,
      options,
      model_name,
      path: model_name,
    }
  }

  /// Sets the schema path reported in errors.
  pub(crate) fn at(mut self, path: &'a str) -> Self {
    self.path = path;
    self
  }

  pub(crate) fn resolve_schema(
    &self,
    schema: &Schema,
    is_anonymous: bool,
    is_required: bool,
  ) -> GenerationResult<ResolvedType> {
    let mut visiting = vec![];
    self.resolve_with(schema, is_anonymous, is_required, &mut visiting)
  }

  /// Like [`Self::resolve_schema`], with an absent schema meaning "anything".
  pub(crate) fn resolve_optional(
    &self,
    schema: Option<&Schema>,
    is_anonymous: bool,
    is_required: bool,
  ) -> GenerationResult<ResolvedType> {
    match schema {
      Some(schema) => self.resolve_schema(schema, is_anonymous, is_required),
      None => Ok(ResolvedType::any()),
    }
  }

  fn resolve_with(
    &self,
    schema: &Schema,
    is_anonymous: bool,
    is_required: bool,
    visiting: &mut Vec<String>,
  ) -> GenerationResult<ResolvedType> {
    if let Some(reference) = &schema.reference {
      return self.resolve_reference(reference, is_anonymous, is_required, visiting);
    }

    if let Some(resolved) = Self::resolve_format(schema) {
      return Ok(resolved);
    }

    if schema.hints.int_or_string {
      return Ok(Self::int_or_string(schema));
    }

    let mut result = match self.first_type(schema)? {
      "array" => self.resolve_array(schema, is_anonymous, visiting)?,
      "object" => self.resolve_object(schema, is_anonymous, visiting)?,
      INT_OR_STRING_FORMAT => Self::int_or_string(schema),
      other => {
        let Some(kcl_type) = formats::primitive_type(other) else {
          return Err(self.unsupported(schema));
        };
        ResolvedType {
          is_primitive: true,
          kcl_type: kcl_type.to_string(),
          swagger_type: other.to_string(),
          ..Default::default()
        }
      }
    };
    result.is_nullable = !is_required && !result.is_primitive;
    Ok(result)
  }

  fn resolve_reference(
    &self,
    reference: &str,
    is_anonymous: bool,
    is_required: bool,
    visiting: &mut Vec<String>,
  ) -> GenerationResult<ResolvedType> {
    let direct = self.arena.lookup(reference)?;
    let name = refs::parse_definition_ref(reference).unwrap_or_default();
    let known = self.known_definition_type(name, direct);

    if visiting.iter().any(|v| v == reference) {
      let mut recursive = ResolvedType {
        is_complex_object: true,
        swagger_type: "object".to_string(),
        ..Default::default()
      };
      known.apply(&mut recursive);
      return Ok(recursive);
    }

    visiting.push(reference.to_string());
    let target = self.arena.resolve_ref(reference)?;
    let mut result = self.resolve_with(target, false, is_required, visiting)?;
    visiting.pop();

    known.apply(&mut result);
    result.is_base_type = result.has_discriminator;
    if !is_anonymous {
      result.is_map = false;
      result.is_complex_object = true;
    }
    Ok(result)
  }

  fn resolve_format(schema: &Schema) -> Option<ResolvedType> {
    let format = schema.format.as_deref()?;
    let swagger_type = schema.schema_type.first().unwrap_or("string");
    let kcl_type = formats::format_type(swagger_type, format)?;
    Some(ResolvedType {
      is_primitive: true,
      kcl_type: kcl_type.to_string(),
      swagger_type: swagger_type.to_string(),
      swagger_format: format.to_string(),
      ..Default::default()
    })
  }

  fn int_or_string(schema: &Schema) -> ResolvedType {
    ResolvedType {
      is_primitive: true,
      kcl_type: INT_OR_STRING_TYPE.to_string(),
      swagger_type: schema.schema_type.first().unwrap_or("string").to_string(),
      swagger_format: schema.format.clone().unwrap_or_default(),
      ..Default::default()
    }
  }

  /// An empty type list means `object`; `[string, integer]` in either order is the int-or-string union.
  fn first_type<'s>(&self, schema: &'s Schema) -> GenerationResult<&'s str> {
    match schema.schema_type.as_slice() {
      [] => Ok("object"),
      [single] => Ok(single.as_str()),
      [a, b] if is_int_or_string_pair(a, b) => Ok(INT_OR_STRING_FORMAT),
      _ => Err(self.unsupported(schema)),
    }
  }

  fn unsupported(&self, schema: &Schema) -> GenerationError {
    GenerationError::UnsupportedTypes {
      path: self.path.to_string(),
      types: schema.schema_type.as_slice().to_vec(),
      format: schema.format.clone(),
    }
  }

  fn resolve_array(
    &self,
    schema: &Schema,
    is_anonymous: bool,
    visiting: &mut Vec<String>,
  ) -> GenerationResult<ResolvedType> {
    let mut result = ResolvedType {
      is_anonymous,
      is_array: true,
      has_additional_items: schema.has_additional_items(),
      swagger_type: "array".to_string(),
      ..Default::default()
    };

    if schema.tuple_items().is_some() {
      result.is_array = false;
      result.is_tuple = true;
      return Ok(result);
    }

    let element = match schema.single_items() {
      Some(item) => self.resolve_with(item, true, false, visiting)?,
      None => ResolvedType::any(),
    };
    result.kcl_type = format!("[{}]", element.kcl_type);
    result.elem_type = Some(Box::new(element));
    Ok(result)
  }

  fn resolve_object(
    &self,
    schema: &Schema,
    is_anonymous: bool,
    visiting: &mut Vec<String>,
  ) -> GenerationResult<ResolvedType> {
    let mut result = ResolvedType {
      is_anonymous,
      is_base_type: schema.discriminator.is_some(),
      has_discriminator: schema.discriminator.is_some(),
      swagger_type: "object".to_string(),
      ..Default::default()
    };

    if !is_anonymous {
      self.known_definition_type(self.model_name, schema).apply(&mut result);
    }

    if !schema.all_of.is_empty() {
      if is_anonymous {
        result.kcl_type = mangle_model_name(self.model_name);
      }
      result.is_complex_object = true;
      return Ok(result);
    }

    if !schema.properties.is_empty() {
      result.is_complex_object = true;
    }

    if let Some(SchemaOrBool::Schema(value)) = &schema.additional_properties {
      let element = self.resolve_with(value, value.reference.is_none(), false, visiting)?;
      if !result.is_complex_object {
        // A map is spelled structurally, not by the definition's name.
        result.is_map = true;
        result.kcl_type = format!("{{str:{}}}", element.kcl_type);
        result.pkg.clear();
        result.pkg_alias.clear();
        result.module.clear();
      }
      result.elem_type = Some(Box::new(element));
      return Ok(result);
    }

    if !schema.properties.is_empty() {
      return Ok(result);
    }

    if is_anonymous {
      result.kcl_type = ANY_TYPE.to_string();
      result.is_map = true;
    }
    Ok(result)
  }

  /// KCL type for a named definition, honoring `x-kcl-name` and `x-kcl-type`.
  pub(crate) fn known_definition_type(&self, name: &str, schema: &Schema) -> KnownType {
    match &schema.hints.type_override {
      TypeOverride::UseExisting {
        name: kcl_type,
        import_path: Some(import_path),
        import_alias,
      } => {
        let pkg = import_path
          .rsplit_once('.')
          .map_or(import_path.as_str(), |(head, _)| head);
        return KnownType {
          kcl_type: kcl_type.clone(),
          pkg: pkg.to_string(),
          pkg_alias: last_segment(pkg).to_string(),
          module: import_alias
            .clone()
            .unwrap_or_else(|| last_segment(import_path).to_string()),
        };
      }
      TypeOverride::UseExisting { name: kcl_type, .. } => return KnownType::local(kcl_type.clone()),
      TypeOverride::None => {}
    }

    let kcl_type = mangle_model_name(&schema.kcl_name_or(name));
    if self.arena.is_hoisted(name) || name.is_empty() {
      return KnownType::local(kcl_type);
    }

    let pkg = self.options.package_of(name);
    let (_, short) = split_definition_name(name);
    KnownType {
      kcl_type,
      pkg_alias: last_segment(&pkg).to_string(),
      module: to_file_name(short),
      pkg,
    }
  }

  /// Type name used for the definition currently being generated.
  pub(crate) fn model_type_name(&self) -> String {
    match self.arena.get(self.model_name) {
      Some(schema) => self.known_definition_type(self.model_name, schema).kcl_type,
      None => mangle_model_name(self.model_name),
    }
  }
}

fn is_int_or_string_pair(a: &str, b: &str) -> bool {
  matches!((a, b), ("string", "integer") | ("integer", "string"))
}

/// Shape facts about a schema, following references, used to decide between aliasing and
/// composition and whether map values must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct SchemaAnalysis {
  pub is_known_type: bool,
  pub is_array: bool,
  pub is_tuple: bool,
  pub is_map: bool,
  pub is_base_type: bool,
  pub is_simple_schema: bool,
}

impl SchemaAnalysis {
  pub(crate) fn analyze(schema: &Schema, arena: &DefinitionArena) -> GenerationResult<Self> {
    Self::analyze_at(schema, arena, 0)
  }

  fn analyze_at(schema: &Schema, arena: &DefinitionArena, depth: usize) -> GenerationResult<Self> {
    let schema = match &schema.reference {
      Some(reference) => arena.resolve_ref(reference)?,
      None => schema,
    };
    if depth > MAX_ANALYSIS_DEPTH {
      return Ok(Self::default());
    }

    let is_object = schema.is_object_type();
    let has_props = !schema.properties.is_empty();
    let has_all_of = !schema.all_of.is_empty();
    let has_additional_props = schema.has_additional_properties();
    let is_known_type = schema.hints.int_or_string
      || ["boolean", "integer", "number", "string"]
        .iter()
        .any(|t| schema.is_type(t))
      || schema
        .format
        .as_deref()
        .is_some_and(|f| formats::format_type("string", f).is_some())
      || (is_object && !has_props && !has_all_of && !has_additional_props && schema.additional_items.is_none());

    let is_tuple = schema.is_type("array") && schema.tuple_items().is_some();
    let is_array = schema.is_type("array") && !is_tuple;
    let is_map = is_object && !has_props && !has_all_of && has_additional_props;

    let is_simple_array = is_array
      && match schema.single_items() {
        Some(item) => Self::analyze_at(item, arena, depth + 1)?.is_simple_schema,
        None => true,
      };
    let is_simple_map = is_map
      && match schema.additional_properties.as_ref().and_then(SchemaOrBool::as_schema) {
        Some(value) => Self::analyze_at(value, arena, depth + 1)?.is_simple_schema,
        None => true,
      };

    Ok(Self {
      is_known_type,
      is_array,
      is_tuple,
      is_map,
      is_base_type: schema.discriminator.is_some(),
      is_simple_schema: is_known_type || is_simple_array || is_simple_map,
    })
  }
}
