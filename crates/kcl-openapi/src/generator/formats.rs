//! Swagger type and format names mapped onto KCL types.

pub(crate) const ANY_TYPE: &str = "any";
pub(crate) const INT_OR_STRING_TYPE: &str = "int | str";
pub(crate) const INT_OR_STRING_FORMAT: &str = "intorstring";

/// Formats whose values are serialized strings, which makes length and pattern checks meaningless.
const FORMATS_WITHOUT_STRING_VALIDATIONS: &[&str] = &["date", "datetime", "uuid", "bsonobjectid", "base64", "duration"];

const STRING_FORMATS: &[&str] = &[
  "date", "datetime", "time", "duration", "uuid", "byte", "binary", "password", "email", "hostname", "ipv4", "ipv6",
  "uri", "bsonobjectid", "base64",
];

const INTEGER_FORMATS: &[&str] = &["int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64"];

/// Normalizes a format name for lookup: dashes are dropped, so `date-time` and `datetime` match.
pub(crate) fn normalize_format(format: &str) -> String {
  format.replace('-', "").to_ascii_lowercase()
}

/// KCL type for a plain Swagger type name.
pub(crate) fn primitive_type(swagger_type: &str) -> Option<&'static str> {
  match swagger_type {
    "string" => Some("str"),
    "boolean" => Some("bool"),
    "integer" => Some("int"),
    "number" => Some("float"),
    INT_OR_STRING_FORMAT => Some(INT_OR_STRING_TYPE),
    _ => None,
  }
}

/// KCL type for a `(type, format)` pair, if the format has a dedicated mapping.
///
/// Format names that are themselves type names (such as `int-or-string`) map like the type.
pub(crate) fn format_type(swagger_type: &str, format: &str) -> Option<&'static str> {
  let format = normalize_format(format);
  let mapped = match swagger_type {
    "number" if format == "float" || format == "double" => Some("float"),
    "number" | "integer" if INTEGER_FORMATS.contains(&format.as_str()) => Some("int"),
    "string" if STRING_FORMATS.contains(&format.as_str()) => Some("str"),
    _ => None,
  };
  mapped.or_else(|| primitive_type(&format))
}

/// True when length and pattern constraints should be dropped for this format.
pub(crate) fn drops_string_validations(format: &str) -> bool {
  FORMATS_WITHOUT_STRING_VALIDATIONS.contains(&normalize_format(format).as_str())
}
