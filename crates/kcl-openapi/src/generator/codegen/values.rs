use itertools::Itertools;
use serde_json::Value;

/// KCL literal for a JSON value.
pub(crate) fn to_kcl_value(value: &Value) -> String {
  match value {
    Value::Null => "None".to_string(),
    Value::Bool(true) => "True".to_string(),
    Value::Bool(false) => "False".to_string(),
    Value::Number(n) => n.to_string(),
    Value::String(s) => quote_string(s),
    Value::Array(items) => format!("[{}]", items.iter().map(to_kcl_value).join(", ")),
    Value::Object(map) => {
      let entries = map
        .iter()
        .map(|(k, v)| format!("{}: {}", quote_string(k), to_kcl_value(v)))
        .join(", ");
      format!("{{{entries}}}")
    }
  }
}

/// Double-quoted KCL string literal.
pub(crate) fn quote_string(s: &str) -> String {
  let mut quoted = String::with_capacity(s.len() + 2);
  quoted.push('"');
  for c in s.chars() {
    match c {
      '"' => quoted.push_str("\\\""),
      '\\' => quoted.push_str("\\\\"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      other => quoted.push(other),
    }
  }
  quoted.push('"');
  quoted
}

/// Regex literal: raw when possible so patterns stay readable.
pub(crate) fn regex_literal(pattern: &str) -> String {
  if pattern.contains('"') || pattern.contains('\n') {
    quote_string(pattern)
  } else {
    format!("r\"{pattern}\"")
  }
}

/// Number literal that keeps integral bounds integral, `10.0` becomes `10`.
pub(crate) fn number_literal(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    n.to_string()
  }
}
