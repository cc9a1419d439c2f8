pub mod generate;
pub mod list;

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::Context;

pub use generate::{GenerateConfig, generate_code};
pub use list::list_definitions;

use crate::{
  swagger::{SwaggerDocument, crd},
  utils::spec::SpecLoader,
};

/// Reads a Swagger document, or converts the CRDs in `input` into one.
pub(crate) async fn load_document(input: &Path, is_crd: bool) -> anyhow::Result<SwaggerDocument> {
  let loader = SpecLoader::open(input).await?;
  if is_crd {
    let documents = loader.parse_all()?;
    crd::crd_to_swagger(documents).with_context(|| format!("failed to convert CRD {}", input.display()))
  } else {
    loader
      .parse()
      .with_context(|| format!("failed to parse Swagger document {}", input.display()))
  }
}
