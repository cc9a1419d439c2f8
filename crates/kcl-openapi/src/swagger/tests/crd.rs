use serde_json::{Value, json};

use crate::swagger::{
  crd::{OBJECT_META, crd_to_swagger, is_crd},
  schema::TypeOverride,
};

fn cron_tab(versions: Value) -> Value {
  json!({
    "apiVersion": "apiextensions.k8s.io/v1",
    "kind": "CustomResourceDefinition",
    "metadata": {"name": "crontabs.stable.example.com"},
    "spec": {
      "group": "stable.example.com",
      "names": {"kind": "CronTab", "plural": "crontabs"},
      "scope": "Namespaced",
      "versions": versions,
    },
  })
}

fn cron_tab_schema() -> Value {
  json!({
    "type": "object",
    "required": ["spec"],
    "properties": {
      "spec": {
        "type": "object",
        "properties": {
          "cronSpec": {"type": "string"},
          "replicas": {"type": "integer"},
        },
      },
      "kind": {"type": "string", "description": "overridden"},
    },
  })
}

#[test]
fn test_is_crd() {
  assert!(is_crd(&cron_tab(json!([]))));
  assert!(!is_crd(&json!({"kind": "Deployment"})));
  assert!(!is_crd(&json!({"swagger": "2.0"})));
}

#[test]
fn test_versions_become_definitions() {
  let document = crd_to_swagger(vec![cron_tab(json!([
    {"name": "v1", "served": true, "schema": {"openAPIV3Schema": cron_tab_schema()}},
    {"name": "v2", "served": true, "schema": {"openAPIV3Schema": {"type": "object"}}},
  ]))])
  .unwrap();

  assert_eq!(document.swagger, "2.0");
  assert_eq!(document.info.as_ref().map(|info| info.title.as_str()), Some("Kubernetes CRD Swagger"));
  assert_eq!(
    document.definitions.keys().collect::<Vec<_>>(),
    ["stable.example.com.v1.CronTab", "stable.example.com.v2.CronTab", OBJECT_META]
  );

  let cron_tab = &document.definitions["stable.example.com.v1.CronTab"];
  assert_eq!(
    cron_tab.properties.keys().collect::<Vec<_>>(),
    ["apiVersion", "kind", "metadata", "spec"]
  );
  assert_eq!(cron_tab.required, ["spec", "apiVersion", "kind"]);

  let api_version = &cron_tab.properties["apiVersion"];
  assert!(api_version.read_only);
  assert_eq!(api_version.default, Some(json!("stable.example.com/v1")));
  assert_eq!(cron_tab.properties["kind"].default, Some(json!("CronTab")));
  assert_eq!(cron_tab.properties["metadata"].reference_name(), Some(OBJECT_META));

  let v2 = &document.definitions["stable.example.com.v2.CronTab"];
  assert_eq!(v2.properties["apiVersion"].default, Some(json!("stable.example.com/v2")));
}

#[test]
fn test_object_meta_maps_to_existing_type() {
  let document = crd_to_swagger(vec![cron_tab(json!([
    {"name": "v1", "schema": {"openAPIV3Schema": cron_tab_schema()}},
  ]))])
  .unwrap();

  let TypeOverride::UseExisting {
    name,
    import_path,
    import_alias,
  } = &document.definitions[OBJECT_META].hints.type_override
  else {
    panic!("ObjectMeta should map to an existing type");
  };
  assert_eq!(name, "ObjectMeta");
  assert_eq!(import_path.as_deref(), Some("k8s.apimachinery.pkg.apis.meta.v1.object_meta"));
  assert_eq!(import_alias.as_deref(), Some("v1"));
}

#[test]
fn test_v1beta1_validation() {
  let document = crd_to_swagger(vec![json!({
    "apiVersion": "apiextensions.k8s.io/v1beta1",
    "kind": "CustomResourceDefinition",
    "spec": {
      "group": "stable.example.com",
      "version": "v1beta1",
      "names": {"kind": "CronTab"},
      "validation": {"openAPIV3Schema": {"properties": {"spec": {"type": "object"}}}},
    },
  })])
  .unwrap();

  let cron_tab = &document.definitions["stable.example.com.v1beta1.CronTab"];
  assert!(cron_tab.is_type("object"));
  assert_eq!(
    cron_tab.properties["apiVersion"].default,
    Some(json!("stable.example.com/v1beta1"))
  );
}

#[test]
fn test_multiple_documents_merge() {
  let mut other = cron_tab(json!([{"name": "v1", "schema": {"openAPIV3Schema": {"type": "object"}}}]));
  other["spec"]["names"]["kind"] = json!("Backup");

  let document = crd_to_swagger(vec![
    cron_tab(json!([{"name": "v1", "schema": {"openAPIV3Schema": cron_tab_schema()}}])),
    other,
  ])
  .unwrap();
  assert!(document.definitions.contains_key("stable.example.com.v1.CronTab"));
  assert!(document.definitions.contains_key("stable.example.com.v1.Backup"));
}

#[test]
fn test_conversion_errors() {
  let cases = [
    (vec![], "no CustomResourceDefinition found"),
    (vec![json!({"kind": "Deployment"})], "is not a CustomResourceDefinition"),
    (vec![cron_tab(json!([{"name": "v1"}]))], "no openapi schema found"),
    (
      vec![json!({"kind": "CustomResourceDefinition", "spec": {"group": "g"}})],
      "invalid CustomResourceDefinition",
    ),
  ];

  for (input, expected) in cases {
    let err = crd_to_swagger(input.clone()).unwrap_err();
    assert!(
      format!("{err:#}").contains(expected),
      "failed for input {input:?}: {err:#}"
    );
  }
}
