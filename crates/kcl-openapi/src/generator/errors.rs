use thiserror::Error;

/// Fatal conditions raised while compiling schemas into generation models.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("reference '{reference}' does not resolve to a definition")]
  UnresolvedReference { reference: String },
  #[error("reference chain starting at '{reference}' loops back on itself")]
  CyclicReference { reference: String },
  #[error("remote reference '{reference}' is not supported, only local '#/definitions/' references are")]
  RemoteReference { reference: String },
  #[error("unsupported type list {types:?} (format {format:?}) at '{path}'")]
  UnsupportedTypes {
    path: String,
    types: Vec<String>,
    format: Option<String>,
  },
  #[error("single schema '{path}' can't have additional items")]
  MixedItems { path: String },
  #[error("enum values in '{path}' contain a complex value which has no KCL literal form")]
  ComplexEnumValue { path: String },
  #[error("invalid {extension} extension: {reason}")]
  InvalidExtension { extension: String, reason: String },
  #[error("definition '{0}' does not exist")]
  UnknownDefinition(String),
  #[error("could not generate schema for '{name}'")]
  Definition {
    name: String,
    #[source]
    source: Box<GenerationError>,
  },
}

impl GenerationError {
  pub(crate) fn in_definition(self, name: &str) -> Self {
    match self {
      already @ Self::Definition { .. } => already,
      other => Self::Definition {
        name: name.to_string(),
        source: Box::new(other),
      },
    }
  }
}

pub(crate) type GenerationResult<T> = Result<T, GenerationError>;
