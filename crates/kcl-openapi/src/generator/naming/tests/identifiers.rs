use crate::generator::naming::identifiers::{
  last_segment, mangle_model_name, mangle_package_name, mangle_property_name, model_name_needs_mangling, pascalize,
  split_definition_name, to_file_name,
};

#[test]
fn test_pascalize() {
  let cases = [
    ("Pet category", "PetCategory"),
    ("PetCategory", "PetCategory"),
    ("petAllOf1", "PetAllOf1"),
    ("Foo items0", "FooItems0"),
    ("stable.example.com.v1.CronTab spec", "StableExampleComV1CronTabSpec"),
    ("x-forwarded-for", "XForwardedFor"),
    ("123abc", "Nr123abc"),
    ("", "Unnamed"),
    ("  ", "Unnamed"),
  ];
  for (input, expected) in cases {
    assert_eq!(pascalize(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_model_names() {
  let cases = [
    ("Pet", "Pet"),
    ("io.k8s.api.core.v1.Pod", "Pod"),
    ("cron-tab", "cron_tab"),
    ("stable.example.com.v1.cron-tab", "cron_tab"),
    ("schema", "$schema"),
    ("a.b.type", "$type"),
  ];
  for (input, expected) in cases {
    assert_eq!(mangle_model_name(input), expected, "failed for input {input:?}");
  }
  assert!(model_name_needs_mangling("a.b.cron-tab"));
  assert!(!model_name_needs_mangling("cron.tab"));
}

#[test]
fn test_property_names() {
  let cases = [
    ("name", "name"),
    ("_private", "_private"),
    ("x-forwarded-for", "\"x-forwarded-for\""),
    ("1st", "\"1st\""),
    ("check", "$check"),
    ("filter", "$filter"),
    ("a\"b", "\"a\\\"b\""),
  ];
  for (input, expected) in cases {
    assert_eq!(mangle_property_name(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_package_and_file_names() {
  assert_eq!(mangle_package_name("k8s.api.apps", "models"), "apps");
  assert_eq!(mangle_package_name("github.com/acme/MyModels", "models"), "my_models");
  assert_eq!(mangle_package_name("", "models"), "models");
  assert_eq!(to_file_name("CronTabSpec"), "cron_tab_spec");
  assert_eq!(split_definition_name("a.b.Kind"), ("a.b", "Kind"));
  assert_eq!(split_definition_name("Kind"), ("", "Kind"));
  assert_eq!(last_segment("k8s.api.core.v1"), "v1");
}
