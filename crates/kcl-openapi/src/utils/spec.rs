use std::{ffi::OsStr, path::Path};

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::swagger::SwaggerDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  /// Deserializes one document, reporting the path of the field that failed.
  pub fn parse<T: DeserializeOwned>(self, content: &str) -> anyhow::Result<T> {
    match self {
      Self::Json => {
        let mut de = serde_json::Deserializer::from_str(content);
        serde_path_to_error::deserialize(&mut de).map_err(|err| {
          let path = err.path().to_string();
          anyhow::anyhow!(err.into_inner()).context(format!("invalid document at '{path}'"))
        })
      }
      Self::Yaml => {
        let de = serde_yaml::Deserializer::from_str(content);
        serde_path_to_error::deserialize(de).map_err(|err| {
          let path = err.path().to_string();
          anyhow::anyhow!(err.into_inner()).context(format!("invalid document at '{path}'"))
        })
      }
    }
  }

  /// Splits a (possibly multi-document) input into generic values.
  pub fn parse_all(self, content: &str) -> anyhow::Result<Vec<Value>> {
    match self {
      Self::Json => Ok(vec![serde_json::from_str(content)?]),
      Self::Yaml => {
        let mut documents = vec![];
        for document in serde_yaml::Deserializer::from_str(content) {
          let value = Value::deserialize(document)?;
          if !value.is_null() {
            documents.push(value);
          }
        }
        Ok(documents)
      }
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  fn content(&self) -> anyhow::Result<&str> {
    Ok(std::str::from_utf8(self.file.as_slice())?)
  }

  pub fn parse(&self) -> anyhow::Result<SwaggerDocument> {
    self.format.parse(self.content()?)
  }

  pub fn parse_all(&self) -> anyhow::Result<Vec<Value>> {
    self.format.parse_all(self.content()?)
  }
}
