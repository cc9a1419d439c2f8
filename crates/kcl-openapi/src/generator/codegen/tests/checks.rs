use serde_json::json;

use crate::{generator::codegen::checks::CheckBlock, tests::common::generate};

fn limits_checks() -> CheckBlock {
  let definition = generate(
    json!({
      "Limits": {
        "type": "object",
        "required": ["name"],
        "properties": {
          "name": {"type": "string", "maxLength": 63, "minLength": 1, "pattern": "^[a-z]+$"},
          "replicas": {"type": "integer", "minimum": 0, "maximum": 10, "exclusiveMaximum": true},
          "tags": {
            "type": "array",
            "items": {"type": "string", "maxLength": 5},
            "maxItems": 3,
            "uniqueItems": true,
          },
          "labels": {"type": "object", "additionalProperties": {"type": "string", "maxLength": 10}},
          "factor": {"type": "number", "multipleOf": 2},
          "ratio": {"type": "number", "multipleOf": 0.5},
          "x-weird": {"type": "string", "maxLength": 3},
        },
      },
    }),
    "Limits",
  );
  let attributes = definition.schema.properties.iter().collect::<Vec<_>>();
  CheckBlock::for_attributes(&attributes)
}

#[test]
fn test_check_lines() {
  let checks = limits_checks();
  assert_eq!(
    checks.lines,
    [
      "len(name) <= 63",
      "len(name) >= 1",
      "regex.match(name, r\"^[a-z]+$\")",
      "replicas < 10 if replicas is not None",
      "replicas >= 0 if replicas is not None",
      "len(tags) <= 3 if tags is not None",
      "isunique(tags) if tags is not None",
      "all item in tags { len(item) <= 5 } if tags is not None",
      "all _, value in labels { len(value) <= 10 } if labels is not None",
      "multiplyof(int(factor), 2) if factor is not None",
    ]
  );
  assert!(checks.uses_regex);
}

#[test]
fn test_no_checks_without_validations() {
  let definition = generate(
    json!({"Plain": {"type": "object", "properties": {"name": {"type": "string"}}}}),
    "Plain",
  );
  let attributes = definition.schema.properties.iter().collect::<Vec<_>>();
  let checks = CheckBlock::for_attributes(&attributes);
  assert!(checks.lines.is_empty());
  assert!(!checks.uses_regex);
}
