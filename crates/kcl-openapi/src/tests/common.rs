use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::{
  generator::{
    codegen::{self, RenderedFile},
    metrics::GenerationWarning,
    model::{GenDefinition, GenSchema},
    options::GenerateOptions,
    orchestrator::Orchestrator,
  },
  swagger::{SwaggerDocument, schema::Schema},
};

pub(crate) fn create_test_document(definitions: Value) -> SwaggerDocument {
  serde_json::from_value(json!({
    "swagger": "2.0",
    "info": { "title": "Test API", "version": "1.0.0" },
    "definitions": definitions,
  }))
  .unwrap()
}

pub(crate) fn create_definitions(definitions: Value) -> IndexMap<String, Schema> {
  serde_json::from_value(definitions).unwrap()
}

pub(crate) fn create_schema(schema: Value) -> Schema {
  serde_json::from_value(schema).unwrap()
}

pub(crate) fn default_options() -> GenerateOptions {
  GenerateOptions::default()
}

pub(crate) fn create_orchestrator(definitions: Value, options: GenerateOptions) -> Orchestrator {
  Orchestrator::new(create_test_document(definitions), options).unwrap()
}

/// Generation model of `name` with default options.
pub(crate) fn generate(definitions: Value, name: &str) -> GenDefinition {
  generate_with_warnings(definitions, name, default_options()).0
}

pub(crate) fn generate_with_warnings(
  definitions: Value,
  name: &str,
  options: GenerateOptions,
) -> (GenDefinition, Vec<GenerationWarning>) {
  create_orchestrator(definitions, options)
    .generate_definition(name)
    .unwrap_or_else(|err| panic!("generation of '{name}' failed: {err}"))
}

pub(crate) fn render(definitions: Value, name: &str) -> RenderedFile {
  codegen::render_definition(&generate(definitions, name))
}

pub(crate) fn property<'a>(schema: &'a GenSchema, name: &str) -> &'a GenSchema {
  schema
    .properties
    .iter()
    .find(|p| p.name == name)
    .unwrap_or_else(|| panic!("property '{name}' not found in {}", schema.name))
}

pub(crate) fn property_names(schema: &GenSchema) -> Vec<&str> {
  schema.properties.iter().map(|p| p.name.as_str()).collect()
}

pub(crate) fn extra<'a>(definition: &'a GenDefinition, name: &str) -> &'a GenSchema {
  definition
    .extra_schemas
    .iter()
    .find(|s| s.name == name)
    .unwrap_or_else(|| {
      let names = definition.extra_schemas.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
      panic!("extra schema '{name}' not found, have {names:?}")
    })
}
