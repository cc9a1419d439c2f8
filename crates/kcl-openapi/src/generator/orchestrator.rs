//! Drives one generation run over a Swagger document.

use std::collections::BTreeSet;

use anyhow::Context;
use indexmap::IndexMap;
use strum::Display;

use super::{
  arena::DefinitionArena,
  builder::SchemaBuilder,
  codegen::{self, RenderedFile},
  definition::make_gen_definition,
  discriminator::DiscriminatorInfo,
  errors::{GenerationError, GenerationResult},
  graph::ReferenceGraph,
  metrics::{GenerationStats, GenerationWarning},
  model::{GenDefinition, TypeCategory},
  naming::identifiers::model_name_needs_mangling,
  options::GenerateOptions,
  type_resolver::TypeResolver,
};
use crate::{
  swagger::{
    Info, SwaggerDocument, canonical,
    schema::{Schema, TypeOverride},
  },
  utils::refs,
};

/// Canonicalized definitions plus everything derived from them once per run.
pub struct Orchestrator {
  definitions: IndexMap<String, Schema>,
  discrimination: DiscriminatorInfo,
  graph: ReferenceGraph,
  options: GenerateOptions,
  info: Option<Info>,
}

/// Metadata about the input document, for logging.
#[derive(Debug, Clone, Default)]
pub struct CodeMetadata {
  pub title: String,
  pub version: String,
  pub description: Option<String>,
  pub definition_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PolymorphicRole {
  #[strum(to_string = "base")]
  Base,
  #[strum(to_string = "subtype")]
  Subtype,
  #[strum(to_string = "-")]
  None,
}

/// One row of `list definitions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionSummary {
  pub name: String,
  pub kcl_type: String,
  pub category: TypeCategory,
  pub role: PolymorphicRole,
  pub fields: usize,
  /// Mapped onto an existing KCL type through `x-kcl-type`; never generated.
  pub external: bool,
}

impl Orchestrator {
  /// Canonicalizes the document and analyzes its discriminators.
  pub fn new(document: SwaggerDocument, options: GenerateOptions) -> anyhow::Result<Self> {
    let definitions = canonical::canonicalize(document.definitions).context("failed to canonicalize definitions")?;
    let discrimination = DiscriminatorInfo::analyze(&definitions);
    let graph = ReferenceGraph::new(&definitions);
    Ok(Self {
      definitions,
      discrimination,
      graph,
      options,
      info: document.info,
    })
  }

  pub fn metadata(&self) -> CodeMetadata {
    let info = self.info.clone().unwrap_or_default();
    CodeMetadata {
      title: info.title,
      version: info.version,
      description: info.description,
      definition_count: self.definitions.len(),
    }
  }

  /// Definitions this run generates, sorted by name.
  ///
  /// Requested models pull in every definition they reference so the generated imports
  /// resolve. Definitions mapped onto existing KCL types are never generated.
  pub fn definition_names(&self) -> anyhow::Result<Vec<String>> {
    let mut names = if self.options.names.is_empty() {
      self.definitions.keys().cloned().collect::<Vec<_>>()
    } else {
      for name in &self.options.names {
        if !self.definitions.contains_key(name) {
          return Err(GenerationError::UnknownDefinition(name.clone())).context("invalid --model selection");
        }
      }
      self
        .graph
        .closure(self.options.names.iter().map(String::as_str))
        .into_iter()
        .collect()
    };
    names.retain(|name| !self.is_external(name));
    names.sort();
    Ok(names)
  }

  fn is_external(&self, name: &str) -> bool {
    self
      .definitions
      .get(name)
      .is_some_and(|schema| matches!(schema.hints.type_override, TypeOverride::UseExisting { .. }))
  }

  /// Builds the generation model of one definition in a fresh arena.
  pub fn generate_definition(&self, name: &str) -> GenerationResult<(GenDefinition, Vec<GenerationWarning>)> {
    self.generate_reserving(name, &mut BTreeSet::new())
  }

  /// Like [`Self::generate_definition`], but never hoists under a name in `taken`. The names
  /// this definition hoists are added to `taken`.
  fn generate_reserving(
    &self,
    name: &str,
    taken: &mut BTreeSet<String>,
  ) -> GenerationResult<(GenDefinition, Vec<GenerationWarning>)> {
    let mut arena = DefinitionArena::new(self.definitions.clone()).with_reserved(taken.iter().cloned());
    let mut builder = SchemaBuilder::new(&mut arena, &self.discrimination, &self.options);
    let definition = make_gen_definition(&mut builder, name).map_err(|err| err.in_definition(name))?;

    let mut warnings = builder.take_warnings();
    taken.extend(arena.hoisted().iter().cloned());
    if model_name_needs_mangling(name) {
      warnings.push(GenerationWarning::ModelNameMangled {
        name: name.to_string(),
        mangled: definition.schema.escaped_name.clone(),
      });
    }
    Ok((definition, warnings))
  }

  /// Generates every selected definition. The first failure aborts the run.
  ///
  /// Hoisted names are unique across the whole run, not just within one file.
  pub fn generate(&self) -> anyhow::Result<(Vec<GenDefinition>, GenerationStats)> {
    let mut stats = GenerationStats::default();
    stats.record_cycles(self.graph.detect_cycles());

    let names = self.definition_names()?;
    let mut definitions = Vec::with_capacity(names.len());
    let mut hoisted = BTreeSet::new();
    for name in &names {
      let (definition, warnings) = self
        .generate_reserving(name, &mut hoisted)
        .with_context(|| format!("failed to generate model '{name}'"))?;
      stats.record_definition(&definition);
      stats.record_warnings(warnings);
      definitions.push(definition);
    }
    Ok((definitions, stats))
  }

  /// Generates and renders every selected definition into KCL files.
  pub fn render(&self) -> anyhow::Result<(Vec<RenderedFile>, GenerationStats)> {
    let (definitions, stats) = self.generate()?;
    let files = definitions.iter().map(codegen::render_definition).collect();
    Ok((files, stats))
  }

  /// Classifies every definition without generating it.
  pub fn summaries(&self) -> anyhow::Result<Vec<DefinitionSummary>> {
    let arena = DefinitionArena::new(self.definitions.clone());
    let mut names = self.definitions.keys().collect::<Vec<_>>();
    names.sort();

    names
      .into_iter()
      .map(|name| {
        let schema = &self.definitions[name.as_str()];
        let resolver = TypeResolver::new(&arena, &self.options, name);
        let resolved = resolver
          .resolve_schema(schema, false, true)
          .with_context(|| format!("failed to classify '{name}'"))?;
        let reference = refs::definition_ref(name);
        let role = if self.discrimination.is_base(&reference) {
          PolymorphicRole::Base
        } else if self.discrimination.is_subtype(&reference) {
          PolymorphicRole::Subtype
        } else {
          PolymorphicRole::None
        };
        Ok(DefinitionSummary {
          name: name.clone(),
          kcl_type: resolver.model_type_name(),
          category: resolved.category(),
          role,
          fields: schema.properties.len() + schema.all_of.iter().map(|b| b.properties.len()).sum::<usize>(),
          external: self.is_external(name),
        })
      })
      .collect()
  }
}
