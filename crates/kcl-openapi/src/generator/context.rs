use std::collections::BTreeMap;

use super::{
  discriminator::DiscriminatorInfo,
  model::GenSchema,
  naming::identifiers::pascalize,
};
use crate::swagger::schema::Schema;

/// The per-node half of schema generation: position bookkeeping, the source schema and
/// the accumulators filled while building it.
///
/// Child contexts copy the positional fields and start with empty accumulators; their
/// results reach the parent only through [`SchemaGenContext::merge_result`].
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct SchemaGenContext {
  pub(crate) required: bool,
  pub(crate) named: bool,
  pub(crate) is_virtual: bool,
  pub(crate) is_tuple: bool,
  pub(crate) index: usize,
  pub(crate) path: String,
  pub(crate) name: String,
  /// Definition the resolver treats as "the current model".
  pub(crate) model_name: String,
  pub(crate) receiver: String,
  pub(crate) index_var: String,
  pub(crate) key_var: String,
  pub(crate) value_expr: String,
  pub(crate) container: String,
  pub(crate) schema: Schema,
  pub(crate) gen_schema: GenSchema,
  pub(crate) dependencies: Vec<String>,
  pub(crate) extra_schemas: BTreeMap<String, GenSchema>,
}

impl SchemaGenContext {
  /// Context for a top-level definition.
  pub(crate) fn root(name: &str, schema: Schema, container: &str) -> Self {
    Self {
      path: format!("\"{name}\""),
      name: name.to_string(),
      model_name: name.to_string(),
      receiver: "m".to_string(),
      index_var: "i".to_string(),
      value_expr: "m".to_string(),
      container: container.to_string(),
      named: true,
      schema,
      ..Default::default()
    }
  }

  /// Context for a freshly hoisted definition named `name`.
  pub(crate) fn hoisted(&self, name: &str, schema: Schema) -> Self {
    Self {
      model_name: if schema.reference.is_none() {
        name.to_string()
      } else {
        self.model_name.clone()
      },
      path: self.path.clone(),
      name: name.to_string(),
      receiver: self.receiver.clone(),
      index_var: "i".to_string(),
      value_expr: self.receiver.clone(),
      container: self.container.clone(),
      named: true,
      schema,
      ..Default::default()
    }
  }

  /// Copies position and flags; accumulators start empty.
  pub(crate) fn shallow_clone(&self) -> Self {
    Self {
      required: self.required,
      named: self.named,
      is_virtual: self.is_virtual,
      is_tuple: self.is_tuple,
      index: self.index,
      path: self.path.clone(),
      name: self.name.clone(),
      model_name: self.model_name.clone(),
      receiver: self.receiver.clone(),
      index_var: self.index_var.clone(),
      key_var: self.key_var.clone(),
      value_expr: self.value_expr.clone(),
      container: self.container.clone(),
      schema: self.schema.clone(),
      ..Default::default()
    }
  }

  /// Named, empty-bodied copy used when a definition is a pure alias of another.
  pub(crate) fn alias_of(&self) -> Self {
    let mut alias = self.shallow_clone();
    alias.schema = Schema {
      title: self.schema.title.clone(),
      description: self.schema.description.clone(),
      extensions: self.schema.extensions.clone(),
      hints: self.schema.hints.clone(),
      ..Default::default()
    };
    alias.named = true;
    alias
  }

  pub(crate) fn new_composition_branch(&self, schema: Schema, index: usize) -> Self {
    let mut branch = self.shallow_clone();
    branch.schema = schema;
    branch.name = if self.name == self.model_name {
      format!("AO{index}")
    } else {
      format!("{}AO{index}", self.name)
    };
    branch.index = index;
    branch.named = false;
    branch
  }

  pub(crate) fn new_schema_branch(&self, name: &str, schema: Schema) -> Self {
    let mut branch = self.shallow_clone();
    branch.path = join_path(&self.path, name);
    branch.name = name.to_string();
    branch.value_expr = format!("{}.{}", self.value_expr, pascalize(name));
    branch.required = self.schema.required.iter().any(|r| r == name) || (schema.default.is_some() && schema.read_only);
    branch.schema = schema;
    branch.named = false;
    branch
  }

  /// Value context of a map; the key variable gets another `k` per nesting level.
  pub(crate) fn new_additional_property(&self, schema: Schema) -> Self {
    let mut branch = self.shallow_clone();
    branch.schema = schema;
    branch.key_var = format!("{}k", self.key_var);
    branch.path = format!("{}.{}", self.path, branch.key_var);
    branch.value_expr = format!("{}[{}]", self.value_expr, branch.key_var);
    branch.name = format!("{}Value", self.name);
    branch.named = false;
    branch.required = false;
    branch
  }

  /// Element context of an array; the index variable gets another `i` per nesting level.
  pub(crate) fn new_array_branch(&mut self, schema: Schema, discrimination: &DiscriminatorInfo) -> Self {
    let mut branch = self.shallow_clone();
    branch.path = format!("{}.{}", self.path, self.index_var);
    branch.index_var = format!("{}i", self.index_var);
    branch.value_expr = format!("{}[{}]", self.value_expr, self.index_var);
    branch.required = true;
    branch.named = false;

    if let Some(reference) = &schema.reference
      && discrimination.is_base(reference)
    {
      self.gen_schema.is_base_type = true;
      branch.value_expr = format!("{}.{}()", branch.value_expr, pascalize(&self.name));
    }
    branch.schema = schema;
    branch
  }

  pub(crate) fn new_tuple_element(&self, schema: Schema, index: usize) -> Self {
    let mut branch = self.shallow_clone();
    branch.path = format!("{}.{index}", self.path);
    branch.value_expr = format!("{}.p{index}", self.value_expr);
    branch.required = true;
    branch.is_tuple = true;
    branch.named = false;
    branch.index = index;
    branch.schema = schema;
    branch
  }

  pub(crate) fn new_additional_items(&self, schema: Schema) -> Self {
    let mut branch = self.shallow_clone();
    branch.name = format!("{} items", self.name);
    let offset = self.schema.tuple_items().map_or(0, <[Schema]>::len);
    branch.path = if offset > 0 {
      format!("{}.({}+{offset})", self.path, self.index_var)
    } else {
      format!("{}.{}", self.path, self.index_var)
    };
    branch.value_expr = format!("{}.{}[{}]", self.value_expr, pascalize(&branch.name), self.index_var);
    branch.required = false;
    branch.named = false;
    branch.schema = schema;
    branch
  }

  /// Folds a finished child into this context.
  ///
  /// Validation presence, hoisted schemas, dependencies and the base-type flag always
  /// propagate. The required flag propagates only when `lifts_required` is set.
  pub(crate) fn merge_result(&mut self, child: &SchemaGenContext, lifts_required: bool) {
    if child.gen_schema.carries_validations() {
      self.gen_schema.validations.has_validations = true;
    }
    if lifts_required
      && (child.gen_schema.required
        || child
          .gen_schema
          .additional_properties
          .as_ref()
          .is_some_and(|ap| ap.required))
    {
      self.gen_schema.required = true;
    }
    if child.gen_schema.has_base_type {
      self.gen_schema.has_base_type = true;
    }
    self.dependencies.extend(child.dependencies.iter().cloned());
    self
      .extra_schemas
      .extend(child.extra_schemas.iter().map(|(k, v)| (k.clone(), v.clone())));
  }

  /// Records the gen schema of a hoisted child under its definition name.
  pub(crate) fn add_extra_schema(&mut self, hoisted: &SchemaGenContext) {
    self.merge_result(hoisted, false);
    self
      .extra_schemas
      .insert(hoisted.name.clone(), hoisted.gen_schema.clone());
  }
}

fn join_path(parent: &str, name: &str) -> String {
  if parent.is_empty() {
    format!("\"{name}\"")
  } else {
    format!("{parent}.\"{name}\"")
  }
}
