use strum::Display;

use crate::generator::model::GenDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub definitions_generated: usize,
  pub extra_schemas_generated: usize,
  pub type_aliases_generated: usize,
  pub imports_generated: usize,
  pub polymorphic_bases: usize,
  pub polymorphic_subtypes: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_definition(&mut self, definition: &GenDefinition) {
    self.definitions_generated += 1;
    self.extra_schemas_generated += definition.extra_schemas.len();
    self.imports_generated += definition.imports.len();

    let schema = &definition.schema;
    if schema.properties.is_empty() && schema.all_of.is_empty() && !schema.resolved.is_complex_object {
      self.type_aliases_generated += 1;
    }
    if schema.is_base_type {
      self.polymorphic_bases += 1;
    }
    if schema.is_sub_type {
      self.polymorphic_subtypes += 1;
    }
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  /// Records a warning once; rebuilding a hoisted schema can raise the same one again.
  pub fn record_warning(&mut self, warning: GenerationWarning) {
    if !self.warnings.contains(&warning) {
      self.warnings.push(warning);
    }
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    for warning in warnings {
      self.record_warning(warning);
    }
  }

  pub fn total_schemas(&self) -> usize {
    self.definitions_generated + self.extra_schemas_generated
  }
}

/// Non-fatal findings. Generation continues and the output is still valid KCL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "'{container}': allOf mixes array and non-array branches; the result may not be satisfiable")]
  ConflictingArrayComposition { container: String },
  #[strum(to_string = "{path}: null enum value dropped")]
  NullEnumValue { path: String },
  #[strum(to_string = "import alias for package '{package}' mangled to '{alias}'")]
  ImportAliasMangled { package: String, alias: String },
  #[strum(to_string = "model name '{name}' is not a valid KCL identifier and was mangled to '{mangled}'")]
  ModelNameMangled { name: String, mangled: String },
}

impl GenerationWarning {
  /// Warnings that mean the generated model may reject data the document accepts.
  pub fn is_lossy(&self) -> bool {
    matches!(
      self,
      Self::ConflictingArrayComposition { .. } | Self::NullEnumValue { .. }
    )
  }
}
