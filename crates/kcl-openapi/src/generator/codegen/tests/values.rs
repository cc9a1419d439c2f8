use serde_json::json;

use crate::generator::codegen::values::{number_literal, quote_string, regex_literal, to_kcl_value};

#[test]
fn test_to_kcl_value() {
  let cases = [
    (json!(null), "None"),
    (json!(true), "True"),
    (json!(false), "False"),
    (json!(3), "3"),
    (json!(1.5), "1.5"),
    (json!("text"), "\"text\""),
    (json!(["a", 1]), "[\"a\", 1]"),
    (json!({"b": 1, "a": [true]}), "{\"b\": 1, \"a\": [True]}"),
    (json!({}), "{}"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_kcl_value(&input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_quote_string() {
  let cases = [
    ("plain", "\"plain\""),
    ("say \"hi\"", "\"say \\\"hi\\\"\""),
    ("back\\slash", "\"back\\\\slash\""),
    ("two\nlines", "\"two\\nlines\""),
    ("tab\there", "\"tab\\there\""),
    ("{braces}", "\"{braces}\""),
  ];
  for (input, expected) in cases {
    assert_eq!(quote_string(input), expected, "failed for input {input:?}");
  }
}

#[test]
fn test_regex_literal() {
  assert_eq!(regex_literal("^[a-z]+$"), "r\"^[a-z]+$\"");
  assert_eq!(regex_literal("\\d+"), "r\"\\d+\"");
  assert_eq!(regex_literal("say \"x\""), "\"say \\\"x\\\"\"");
}

#[test]
fn test_number_literal() {
  let cases = [(10.0, "10"), (-3.0, "-3"), (0.5, "0.5"), (1e20, "100000000000000000000")];
  for (input, expected) in cases {
    assert_eq!(number_literal(input), expected, "failed for input {input:?}");
  }
}
