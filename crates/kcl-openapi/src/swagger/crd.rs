//! Turns Kubernetes `CustomResourceDefinition` manifests into a Swagger document with one
//! definition per served version.

use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{
  Info, SwaggerDocument,
  schema::{Schema, TypeSet},
};

const CRD_KIND: &str = "CustomResourceDefinition";
const CRD_TITLE: &str = "Kubernetes CRD Swagger";
const CRD_VERSION: &str = "v0.1.0";

pub(crate) const OBJECT_META: &str = "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta";
const OBJECT_META_PACKAGE: &str = "k8s.apimachinery.pkg.apis.meta.v1.object_meta";

const API_VERSION_DESCRIPTION: &str = "APIVersion defines the versioned schema of this representation of an object. \
Servers should convert recognized schemas to the latest internal value, and may reject unrecognized values. \
More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#resources";
const KIND_DESCRIPTION: &str = "Kind is a string value representing the REST resource this object represents. \
Servers may infer this from the endpoint the client submits requests to. Cannot be updated. In CamelCase. \
More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds";
const METADATA_DESCRIPTION: &str = "Standard object's metadata. \
More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#metadata";

#[derive(Debug, Deserialize)]
struct CustomResourceDefinition {
  spec: CrdSpec,
}

#[derive(Debug, Deserialize)]
struct CrdSpec {
  group: String,
  names: CrdNames,
  #[serde(default)]
  version: Option<String>,
  #[serde(default)]
  validation: Option<CrdValidation>,
  #[serde(default)]
  versions: Vec<CrdVersion>,
}

#[derive(Debug, Deserialize)]
struct CrdNames {
  kind: String,
}

#[derive(Debug, Deserialize)]
struct CrdValidation {
  #[serde(rename = "openAPIV3Schema", default)]
  open_api_v3_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CrdVersion {
  name: String,
  #[serde(default)]
  schema: Option<CrdValidation>,
}

pub fn is_crd(document: &Value) -> bool {
  document.get("kind").and_then(Value::as_str) == Some(CRD_KIND)
}

/// Merges every CRD in `documents` into one Swagger document.
pub fn crd_to_swagger(documents: Vec<Value>) -> anyhow::Result<SwaggerDocument> {
  if documents.is_empty() {
    bail!("no CustomResourceDefinition found in the input");
  }

  let mut definitions = IndexMap::new();
  for (index, document) in documents.into_iter().enumerate() {
    if !is_crd(&document) {
      bail!("document #{index} is not a {CRD_KIND}");
    }
    let crd: CustomResourceDefinition =
      serde_json::from_value(document).with_context(|| format!("invalid {CRD_KIND} in document #{index}"))?;

    for (version, raw) in version_schemas(&crd.spec)? {
      let name = format!("{}.{version}.{}", crd.spec.group, crd.spec.names.kind);
      let schema: Schema =
        serde_json::from_value(raw).with_context(|| format!("invalid openAPIV3Schema for '{name}'"))?;
      let schema = set_kube_native(schema, &crd.spec.group, version, &crd.spec.names.kind)?;
      definitions.insert(name, schema);
    }
  }
  definitions.insert(OBJECT_META.to_string(), object_meta()?);

  Ok(SwaggerDocument {
    swagger: "2.0".to_string(),
    info: Some(Info {
      title: CRD_TITLE.to_string(),
      version: CRD_VERSION.to_string(),
      description: None,
    }),
    definitions,
  })
}

/// `spec.validation` covers every version of a v1beta1 CRD. Otherwise each version carries
/// its own schema.
fn version_schemas(spec: &CrdSpec) -> anyhow::Result<Vec<(&str, Value)>> {
  if let Some(schema) = spec.validation.as_ref().and_then(|v| v.open_api_v3_schema.clone()) {
    let version = spec
      .version
      .as_deref()
      .or_else(|| spec.versions.first().map(|v| v.name.as_str()))
      .with_context(|| format!("CRD for group '{}' declares no version", spec.group))?;
    return Ok(vec![(version, schema)]);
  }

  let schemas = spec
    .versions
    .iter()
    .filter_map(|version| {
      let schema = version.schema.as_ref()?.open_api_v3_schema.clone()?;
      Some((version.name.as_str(), schema))
    })
    .collect::<Vec<_>>();
  if schemas.is_empty() {
    bail!(
      "no openapi schema found in the crd file, please check the spec.validation or spec.versions[].schema field of kind '{}'",
      spec.names.kind
    );
  }
  Ok(schemas)
}

/// Declares `apiVersion`, `kind` and `metadata` ahead of the CRD's own properties.
fn set_kube_native(schema: Schema, group: &str, version: &str, kind: &str) -> anyhow::Result<Schema> {
  let api_version: Schema = serde_json::from_value(json!({
    "type": "string",
    "readOnly": true,
    "default": format!("{group}/{version}"),
    "description": API_VERSION_DESCRIPTION,
  }))?;
  let kind_schema: Schema = serde_json::from_value(json!({
    "type": "string",
    "readOnly": true,
    "default": kind,
    "description": KIND_DESCRIPTION,
  }))?;
  let mut metadata = Schema::reference_to(OBJECT_META);
  metadata.description = Some(METADATA_DESCRIPTION.to_string());

  let mut schema = schema;
  if schema.schema_type.is_empty() {
    schema.schema_type = TypeSet::single("object");
  }
  let mut properties = IndexMap::with_capacity(schema.properties.len() + 3);
  properties.insert("apiVersion".to_string(), api_version);
  properties.insert("kind".to_string(), kind_schema);
  properties.insert("metadata".to_string(), metadata);
  for (name, property) in std::mem::take(&mut schema.properties) {
    properties.entry(name).or_insert(property);
  }
  schema.properties = properties;

  for field in ["apiVersion", "kind"] {
    if !schema.required.iter().any(|r| r == field) {
      schema.required.push(field.to_string());
    }
  }
  Ok(schema)
}

fn object_meta() -> anyhow::Result<Schema> {
  serde_json::from_value(json!({
    "type": "object",
    "description": "ObjectMeta is metadata that all persisted resources must have.",
    "x-kcl-type": {
      "type": "ObjectMeta",
      "import": { "package": OBJECT_META_PACKAGE, "alias": "v1" },
    },
  }))
  .context("invalid ObjectMeta definition")
}
