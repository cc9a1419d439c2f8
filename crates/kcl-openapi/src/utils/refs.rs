pub(crate) const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";

/// Builds the local `$ref` pointer for a top-level definition.
pub(crate) fn definition_ref(name: &str) -> String {
  format!("{DEFINITIONS_REF_PREFIX}{name}")
}

/// Parses a `$ref` pointing at a top-level definition and returns the definition name.
///
/// Returns `None` for remote references (anything not starting with `#/`) and for
/// deep pointers into a definition, e.g. `#/definitions/Pet/properties/tag`.
pub(crate) fn parse_definition_ref(ref_path: &str) -> Option<&str> {
  let name = ref_path.strip_prefix(DEFINITIONS_REF_PREFIX)?;
  if name.is_empty() || name.contains('/') {
    return None;
  }
  Some(name)
}

/// True when the reference points inside the current document.
pub(crate) fn is_local_ref(ref_path: &str) -> bool {
  ref_path.starts_with("#/")
}

/// Splits a local JSON pointer into its unescaped tokens.
///
/// `#/definitions/a~1b/properties/c` becomes `["definitions", "a/b", "properties", "c"]`.
pub(crate) fn pointer_tokens(ref_path: &str) -> Vec<String> {
  ref_path
    .trim_start_matches('#')
    .split('/')
    .filter(|token| !token.is_empty())
    .map(unescape_pointer_token)
    .collect()
}

fn unescape_pointer_token(token: &str) -> String {
  token.replace("~1", "/").replace("~0", "~")
}
