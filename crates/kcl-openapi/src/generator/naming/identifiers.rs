use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

/// Keywords and builtin names that cannot be used bare as KCL identifiers.
pub(crate) static KCL_RESERVED_WORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "import", "as", "rule", "schema", "mixin", "protocol", "relaxed", "check", "for", "assert", "if", "elif", "else",
    "or", "and", "not", "in", "is", "final", "lambda", "all", "filter", "map", "type",
  ]
  .into_iter()
  .collect()
});

static WORD_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap());
static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Builds a PascalCase type name from free-form text.
///
/// Words are split on anything that is not an ASCII letter or digit; each word gets an
/// uppercase first letter and keeps the case of the rest, so `"Pet category"` becomes
/// `"PetCategory"` and `"stable.example.com.v1.CronTab spec"` becomes
/// `"StableExampleComV1CronTabSpec"`. Names starting with a digit get an `Nr` prefix.
pub(crate) fn pascalize(name: &str) -> String {
  let ascii = any_ascii(name);
  let mut ident = WORD_SPLIT_RE
    .split(&ascii)
    .filter(|word| !word.is_empty())
    .map(capitalize)
    .collect::<String>();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert_str(0, "Nr");
  }
  ident
}

/// Uppercases the first character and leaves the rest untouched.
pub(crate) fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    None => String::new(),
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
  }
}

/// File stem for a generated model, e.g. `CronTabSpec` -> `cron_tab_spec`.
pub(crate) fn to_file_name(name: &str) -> String {
  pascalize(name).to_snake_case()
}

/// Splits `group.version.Kind` into its namespace and short name.
pub(crate) fn split_definition_name(name: &str) -> (&str, &str) {
  name.rsplit_once('.').unwrap_or(("", name))
}

/// True when the short part of a model name contains characters KCL rejects in schema names.
pub(crate) fn model_name_needs_mangling(name: &str) -> bool {
  let (_, short) = split_definition_name(name);
  short.contains('-')
}

/// Escapes a model name for use as a KCL schema name.
///
/// Only the segment after the last dot is the schema name; `-` there becomes `_`,
/// and a reserved word gets a `$` prefix.
pub(crate) fn mangle_model_name(name: &str) -> String {
  let (_, short) = split_definition_name(name);
  let short = short.replace('-', "_");
  if KCL_RESERVED_WORDS.contains(short.as_str()) {
    format!("${short}")
  } else {
    short
  }
}

/// Escapes a property name for use as a KCL attribute name.
pub(crate) fn mangle_property_name(name: &str) -> String {
  if !IDENTIFIER_RE.is_match(name) {
    return format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""));
  }
  if KCL_RESERVED_WORDS.contains(name) {
    return format!("${name}");
  }
  name.to_string()
}

/// Turns the last segment of a package path into a snake_case identifier, falling back to `default`.
pub(crate) fn mangle_package_name(name: &str, default: &str) -> String {
  let last = name.rsplit(['/', '.']).next().unwrap_or_default();
  let cleaned = INVALID_CHARS_RE.replace_all(&any_ascii(last), "_").to_snake_case();
  let cleaned = cleaned.trim_matches('_');
  if cleaned.is_empty() {
    default.to_string()
  } else {
    cleaned.to_string()
  }
}

/// Last dotted segment of a package path.
pub(crate) fn last_segment(path: &str) -> &str {
  path.rsplit('.').next().unwrap_or(path)
}

/// Replaces every run of characters that cannot appear in an identifier with `_`.
pub(crate) fn sanitize_identifier(name: &str) -> String {
  let cleaned = INVALID_CHARS_RE.replace_all(&any_ascii(name), "_").into_owned();
  if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
    format!("_{cleaned}")
  } else {
    cleaned
  }
}
