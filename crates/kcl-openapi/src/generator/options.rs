use std::collections::BTreeMap;

use super::naming::identifiers::split_definition_name;

pub(crate) const DEFAULT_MODEL_PACKAGE: &str = "models";

/// Knobs that shape one generation run.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GenerateOptions {
  /// Keep properties, defaults and examples in document order instead of sorting by name.
  #[builder(default = true)]
  pub keep_order: bool,
  /// Render `additionalProperties: false` objects as closed schemas.
  #[builder(default)]
  pub strict_additional_properties: bool,
  /// Root package every generated definition lives under.
  #[builder(default = String::from(DEFAULT_MODEL_PACKAGE))]
  pub model_package: String,
  /// Rewrites a definition namespace (`io.k8s.api.core.v1`) to a package path (`k8s.api.core.v1`).
  #[builder(default)]
  pub package_map: BTreeMap<String, String>,
  /// Definitions to generate; empty means all of them.
  #[builder(default)]
  pub names: Vec<String>,
}

impl Default for GenerateOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GenerateOptions {
  /// Package path of a definition: the model package joined with its mapped namespace.
  pub fn package_of(&self, definition: &str) -> String {
    let (namespace, _) = split_definition_name(definition);
    let mapped = self.package_map.get(namespace).map_or(namespace, String::as_str);
    match (self.model_package.is_empty(), mapped.is_empty()) {
      (true, _) => mapped.to_string(),
      (false, true) => self.model_package.clone(),
      (false, false) => format!("{}.{mapped}", self.model_package),
    }
  }
}
