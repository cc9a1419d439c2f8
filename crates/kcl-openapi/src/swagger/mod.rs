use indexmap::IndexMap;
use serde::Deserialize;

pub mod canonical;
pub mod crd;
pub mod schema;

#[cfg(test)]
mod tests;

use schema::Schema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Info {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub version: String,
  #[serde(default)]
  pub description: Option<String>,
}

/// The parts of a Swagger 2.0 document the model generator reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SwaggerDocument {
  #[serde(default)]
  pub swagger: String,
  #[serde(default)]
  pub info: Option<Info>,
  #[serde(default)]
  pub definitions: IndexMap<String, Schema>,
}
