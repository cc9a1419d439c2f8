//! Normalizes the definitions of a document before generation.
//!
//! After [`canonicalize`] every `$ref` is a local `#/definitions/<name>` reference to an
//! existing definition, and no definition is part of a loop made only of references.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use indexmap::IndexMap;

use super::schema::{Schema, SchemaItems, SchemaOrBool};
use crate::{
  generator::{
    errors::{GenerationError, GenerationResult},
    naming::identifiers::pascalize,
  },
  utils::refs,
};

const DEFINITIONS_TOKEN: &str = "definitions";
/// Pointer tokens that name a keyword rather than a user-chosen key.
const KEYWORD_TOKENS: &[&str] = &["properties", "items", "allOf", "additionalProperties", "additionalItems"];

pub fn canonicalize(definitions: IndexMap<String, Schema>) -> GenerationResult<IndexMap<String, Schema>> {
  let original = definitions.clone();
  let mut canonicalizer = Canonicalizer::new(&original);

  let mut output = IndexMap::with_capacity(definitions.len());
  for (name, mut schema) in definitions {
    canonicalizer.rewrite(&mut schema)?;
    output.insert(name, schema);
  }
  while let Some((name, mut schema)) = canonicalizer.pending.pop_front() {
    canonicalizer.rewrite(&mut schema)?;
    output.insert(name, schema);
  }

  reject_reference_loops(&output)?;
  Ok(output)
}

struct Canonicalizer<'a> {
  original: &'a IndexMap<String, Schema>,
  /// Deep pointer to the definition it was moved to.
  relocated: BTreeMap<String, String>,
  taken: BTreeSet<String>,
  pending: VecDeque<(String, Schema)>,
}

impl<'a> Canonicalizer<'a> {
  fn new(original: &'a IndexMap<String, Schema>) -> Self {
    Self {
      original,
      relocated: BTreeMap::new(),
      taken: original.keys().cloned().collect(),
      pending: VecDeque::new(),
    }
  }

  fn rewrite(&mut self, schema: &mut Schema) -> GenerationResult<()> {
    if let Some(reference) = schema.reference.take() {
      schema.reference = Some(self.canonical_ref(&reference)?);
    }
    for property in schema.properties.values_mut() {
      self.rewrite(property)?;
    }
    for branch in &mut schema.all_of {
      self.rewrite(branch)?;
    }
    match &mut schema.items {
      Some(SchemaItems::Single(item)) => self.rewrite(item)?,
      Some(SchemaItems::Tuple(items)) => {
        for item in items {
          self.rewrite(item)?;
        }
      }
      None => {}
    }
    if let Some(SchemaOrBool::Schema(value)) = &mut schema.additional_properties {
      self.rewrite(value)?;
    }
    if let Some(SchemaOrBool::Schema(value)) = &mut schema.additional_items {
      self.rewrite(value)?;
    }
    Ok(())
  }

  fn canonical_ref(&mut self, reference: &str) -> GenerationResult<String> {
    if !refs::is_local_ref(reference) {
      return Err(GenerationError::RemoteReference {
        reference: reference.to_string(),
      });
    }
    if let Some(name) = refs::parse_definition_ref(reference) {
      return if self.original.contains_key(name) {
        Ok(reference.to_string())
      } else {
        Err(unresolved(reference))
      };
    }
    if let Some(name) = self.relocated.get(reference) {
      return Ok(refs::definition_ref(name));
    }

    let tokens = refs::pointer_tokens(reference);
    let [root, owner, rest @ ..] = tokens.as_slice() else {
      return Err(unresolved(reference));
    };
    if root != DEFINITIONS_TOKEN || rest.is_empty() {
      return Err(unresolved(reference));
    }
    let target = self
      .original
      .get(owner)
      .and_then(|schema| resolve_pointer(schema, rest))
      .ok_or_else(|| unresolved(reference))?
      .clone();

    let suffix = rest
      .iter()
      .filter(|token| !KEYWORD_TOKENS.contains(&token.as_str()))
      .map(|token| pascalize(token))
      .collect::<String>();
    let name = self.unique_name(&format!("{owner}{suffix}"));
    self.relocated.insert(reference.to_string(), name.clone());
    self.pending.push_back((name.clone(), target));
    Ok(refs::definition_ref(&name))
  }

  fn unique_name(&mut self, base: &str) -> String {
    let name = (0..)
      .map(|i| if i == 0 { base.to_string() } else { format!("{base}{i}") })
      .find(|candidate| !self.taken.contains(candidate))
      .unwrap_or_else(|| base.to_string());
    self.taken.insert(name.clone());
    name
  }
}

fn unresolved(reference: &str) -> GenerationError {
  GenerationError::UnresolvedReference {
    reference: reference.to_string(),
  }
}

/// Walks `properties/<name>`, `items[/<index>]`, `allOf/<index>`, `additionalProperties`
/// and `additionalItems` tokens down from `schema`.
fn resolve_pointer<'s>(schema: &'s Schema, tokens: &[String]) -> Option<&'s Schema> {
  let mut current = schema;
  let mut tokens = tokens.iter();
  while let Some(token) = tokens.next() {
    current = match token.as_str() {
      "properties" => current.properties.get(tokens.next()?)?,
      "items" => match current.items.as_ref()? {
        SchemaItems::Single(item) => item.as_ref(),
        SchemaItems::Tuple(items) => items.get(tokens.next()?.parse::<usize>().ok()?)?,
      },
      "allOf" => current.all_of.get(tokens.next()?.parse::<usize>().ok()?)?,
      "additionalProperties" => current.additional_properties.as_ref()?.as_schema()?,
      "additionalItems" => current.additional_items.as_ref()?.as_schema()?,
      _ => return None,
    };
  }
  Some(current)
}

/// A definition that is only a `$ref` must eventually reach a definition with content.
fn reject_reference_loops(definitions: &IndexMap<String, Schema>) -> GenerationResult<()> {
  for (name, schema) in definitions {
    let mut visited = BTreeSet::from([name.as_str()]);
    let mut current = schema;
    while let Some(next) = current.reference_name() {
      if !visited.insert(next) {
        return Err(GenerationError::CyclicReference {
          reference: refs::definition_ref(name),
        });
      }
      let Some(target) = definitions.get(next) else {
        break;
      };
      current = target;
    }
  }
  Ok(())
}
